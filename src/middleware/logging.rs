//! The access-log middleware.
//!
//! Wraps the writer in a [`CaptureWriter`], runs the chain, then writes one
//! record per request holding whatever the handler added to its
//! [`LogFields`](crate::LogFields) plus two groups built here:
//!
//! ```json
//! {
//!   "http/request":  {"method": "POST", "remote": "10.0.0.7:51234", "user-agent": "curl/8.5.0",
//!                     "content-length": 12, "content-type": "application/json",
//!                     "request-uri": "/items", "referer": "", "body": {"name": "x"}},
//!   "http/response": {"status": 200, "content-type": "application/json",
//!                     "body": {"id": 1, "name": "x"}}
//! }
//! ```
//!
//! Request bodies are included only when the request declares JSON.
//! Response bodies are included only when the capture writer kept them.
//! A body that does not parse, or that the server cut off at the size cap,
//! is logged as a string describing the error.

use std::sync::Arc;
use std::time::Instant;

use http::header::{CONTENT_LENGTH, CONTENT_TYPE, REFERER, USER_AGENT};
use serde_json::{Value, json};

use super::{Middleware, Next};
use crate::capture::{CaptureWriter, DEFAULT_CAPTURE_LIMIT};
use crate::error::Error;
use crate::handler::BoxFuture;
use crate::json::is_json;
use crate::log::Logger;
use crate::request::Request;
use crate::writer::ResponseWriter;

/// Writes one structured record per request to a [`Logger`].
#[derive(Debug)]
pub struct AccessLog {
    logger: Arc<Logger>,
    capture_limit: usize,
}

impl AccessLog {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger, capture_limit: DEFAULT_CAPTURE_LIMIT }
    }

    /// Responses of this many bytes or more are logged without their body.
    pub fn capture_limit(mut self, limit: usize) -> Self {
        self.capture_limit = limit;
        self
    }
}

impl Middleware for AccessLog {
    fn handle<'a>(
        &'a self,
        req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = request_group(&req);
            let fields = req.fields().clone();

            let start = Instant::now();
            let mut capture = CaptureWriter::new(w, self.capture_limit);
            next.run(req, &mut capture).await;
            let took = start.elapsed().as_millis();

            fields.set("http/request", request);
            fields.set("http/response", response_group(&capture));
            self.logger.write(format!("handled api took {took} (ms)"), fields.take());
        })
    }
}

fn request_group(req: &Request) -> Value {
    let content_type = req.header(CONTENT_TYPE.as_str()).unwrap_or_default();
    let content_length = req
        .header(CONTENT_LENGTH.as_str())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(req.body().len() as u64);
    let request_uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path(), |pq| pq.as_str());

    let mut group = json!({
        "method": req.method().as_str(),
        "remote": req.remote_addr().map(|a| a.to_string()).unwrap_or_default(),
        "user-agent": req.header(USER_AGENT.as_str()).unwrap_or_default(),
        "content-length": content_length,
        "content-type": content_type,
        "request-uri": request_uri,
        "referer": req.header(REFERER.as_str()).unwrap_or_default(),
    });
    if is_json(content_type) {
        group["body"] = if req.body_over_limit() {
            let e = Error::BodyTooLarge { limit: req.body_limit };
            Value::String(format!("cannot decode request body: {e}"))
        } else {
            decode_body(req.body(), "request")
        };
    }
    group
}

fn response_group(capture: &CaptureWriter<'_>) -> Value {
    let mut group = json!({
        "status": capture.status().as_u16(),
        "content-type": capture.content_type().unwrap_or_default(),
    });
    if let Some(body) = capture.body() {
        group["body"] = decode_body(body, "response");
    }
    group
}

fn decode_body(bytes: &[u8], what: &str) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|e| Value::String(format!("cannot decode {what} body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecodable_bodies_become_placeholders() {
        let v = decode_body(b"plain words", "response");
        assert!(v.as_str().unwrap().starts_with("cannot decode response body:"));
    }

    #[test]
    fn cut_off_request_bodies_are_placeholders() {
        use http::{HeaderMap, HeaderValue, Method, Uri};

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("31"));
        let mut req = Request::new(Method::POST, Uri::from_static("/items"), headers, "")
            .with_body_over_limit();
        req.body_limit = 8;

        let group = request_group(&req);
        assert_eq!(group["content-length"], 31);
        assert_eq!(group["body"], "cannot decode request body: request body exceeds 8 bytes");
    }

    #[test]
    fn decodable_bodies_keep_their_shape() {
        assert_eq!(decode_body(br#"[1,2]"#, "request"), json!([1, 2]));
    }
}
