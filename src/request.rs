//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::fields::LogFields;
use crate::json::{self, DEFAULT_MAX_BODY_SIZE};

/// An incoming HTTP request with its body already collected.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: Option<SocketAddr>,
    pub(crate) fields: LogFields,
    pub(crate) body_limit: usize,
    pub(crate) body_over_limit: bool,
}

impl Request {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            uri,
            headers,
            body: body.into(),
            params: HashMap::new(),
            remote_addr: None,
            fields: LogFields::new(),
            body_limit: DEFAULT_MAX_BODY_SIZE,
            body_over_limit: false,
        }
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Marks the body as cut off at the size cap. The request still runs;
    /// [`json`](Request::json) reports it as [`Error::BodyTooLarge`].
    pub fn with_body_over_limit(mut self) -> Self {
        self.body = Bytes::new();
        self.body_over_limit = true;
        self
    }

    /// Whether the client sent more body than the server accepts.
    pub fn body_over_limit(&self) -> bool { self.body_over_limit }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn params(&self) -> &HashMap<String, String> { &self.params }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }

    /// This request's log fields.
    pub fn fields(&self) -> &LogFields { &self.fields }

    /// Header lookup; names are case-insensitive. Non-text values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes a JSON body, enforcing the router's body-size limit.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        json::read_json(self, self.body_limit)
    }

    /// Decodes the query string.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, Error> {
        json::read_query(self)
    }

    /// Decodes the path parameters into a typed value.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        json::parse_params(self)
    }
}

/// Builds a request from an `http` request whose body is already collected.
impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }
}
