//! Guards around JSON decoding of request data.
//!
//! The codec itself is `serde_json`; query strings go through
//! `serde_urlencoded`. What lives here is the policy: content-type checks,
//! the body-size cap, and the bridge from untyped path parameters to a
//! typed value.

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::request::Request;

/// Default cap on a request body, in bytes.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 << 20;

/// Whether a content-type header value names JSON, including structured
/// `+json` types. Parameters and case are ignored.
pub fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Decodes the request body as JSON.
///
/// Fails with [`Error::NotJson`] unless the declared content type is JSON,
/// and with [`Error::BodyTooLarge`] when the body is longer than `limit` or
/// was already cut off by the server.
pub fn read_json<T: DeserializeOwned>(req: &Request, limit: usize) -> Result<T, Error> {
    if !req.header("content-type").is_some_and(is_json) {
        return Err(Error::NotJson);
    }
    if req.body_over_limit() || req.body().len() > limit {
        return Err(Error::BodyTooLarge { limit });
    }
    Ok(serde_json::from_slice(req.body())?)
}

/// Decodes the URI query into `T`. A missing query decodes like an empty one.
pub fn read_query<T: DeserializeOwned>(req: &Request) -> Result<T, Error> {
    Ok(serde_urlencoded::from_str(req.uri().query().unwrap_or(""))?)
}

/// Re-reads the router's path parameters as `T`.
///
/// Parameters are strings, so numeric fields in `T` will not decode from
/// them; use string fields or `FromStr` afterwards.
pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, Error> {
    let value = serde_json::to_value(req.params())?;
    Ok(serde_json::from_value(value)?)
}
