//! Response capture for access logging.
//!
//! [`CaptureWriter`] sits between the chain and the real response stream.
//! It forwards every call unchanged and, on the side, remembers the status
//! and keeps a copy of small text or JSON bodies so they can be logged.

use std::io;

use bytes::BytesMut;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};

use crate::sniff::{is_loggable, sniff};
use crate::writer::ResponseWriter;

/// Bodies whose size reaches this many bytes are not kept for logging.
pub const DEFAULT_CAPTURE_LIMIT: usize = 2 << 20;

#[derive(Debug)]
enum Body {
    Empty,
    Buffered(BytesMut),
    /// A chunk was binary or the body grew past the limit. Stays this way
    /// for the rest of the response.
    Dropped,
}

/// A [`ResponseWriter`] that observes what passes through it.
pub struct CaptureWriter<'a> {
    inner: &'a mut dyn ResponseWriter,
    status: Option<StatusCode>,
    body: Body,
    limit: usize,
}

impl<'a> CaptureWriter<'a> {
    pub fn new(inner: &'a mut dyn ResponseWriter, limit: usize) -> Self {
        Self { inner, status: None, body: Body::Empty, limit }
    }

    /// The status written through this writer, `200 OK` until one is.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// The buffered body, if every chunk was loggable and the total stayed
    /// under the limit.
    pub fn body(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Buffered(buf) => Some(buf),
            Body::Empty | Body::Dropped => None,
        }
    }

    /// The `content-type` header as set on the response.
    pub fn content_type(&self) -> Option<&str> {
        self.inner.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    fn observe(&mut self, chunk: &[u8]) {
        if matches!(self.body, Body::Dropped) {
            return;
        }
        if !is_loggable(sniff(chunk)) {
            self.body = Body::Dropped;
            return;
        }
        let held = match &self.body {
            Body::Buffered(buf) => buf.len(),
            Body::Empty | Body::Dropped => 0,
        };
        if held + chunk.len() >= self.limit {
            self.body = Body::Dropped;
            return;
        }
        match &mut self.body {
            Body::Buffered(buf) => buf.extend_from_slice(chunk),
            _ => self.body = Body::Buffered(BytesMut::from(chunk)),
        }
    }
}

impl ResponseWriter for CaptureWriter<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
        self.inner.write_header(status);
    }

    fn write(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.status.get_or_insert(StatusCode::OK);
        self.observe(chunk);
        self.inner.write(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BufferedWriter;

    #[test]
    fn records_status_and_forwards_it() {
        let mut out = BufferedWriter::new();
        let mut w = CaptureWriter::new(&mut out, DEFAULT_CAPTURE_LIMIT);
        w.write_header(StatusCode::ACCEPTED);
        assert_eq!(w.status(), StatusCode::ACCEPTED);
        drop(w);
        assert_eq!(out.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn defaults_to_ok() {
        let mut out = BufferedWriter::new();
        let w = CaptureWriter::new(&mut out, DEFAULT_CAPTURE_LIMIT);
        assert_eq!(w.status(), StatusCode::OK);
        assert!(w.body().is_none());
    }

    #[test]
    fn json_chunks_are_buffered_and_forwarded() {
        let mut out = BufferedWriter::new();
        let mut w = CaptureWriter::new(&mut out, DEFAULT_CAPTURE_LIMIT);
        w.write(br#"{"id":1,"#).unwrap();
        w.write(br#""name":"x"}"#).unwrap();
        assert_eq!(w.body(), Some(&br#"{"id":1,"name":"x"}"#[..]));
        drop(w);
        assert_eq!(out.body(), br#"{"id":1,"name":"x"}"#);
    }

    #[test]
    fn binary_chunk_drops_the_buffer_for_good() {
        let payload: &[&[u8]] = &[b"text first", b"\x89PNG\x0D\x0A\x1A\x0A....", b"text again"];
        let mut out = BufferedWriter::new();
        let mut w = CaptureWriter::new(&mut out, DEFAULT_CAPTURE_LIMIT);
        for chunk in payload {
            w.write(chunk).unwrap();
        }
        assert!(w.body().is_none());
        drop(w);
        assert_eq!(out.body(), payload.concat());
    }

    #[test]
    fn bodies_reaching_the_limit_are_not_kept() {
        let mut out = BufferedWriter::new();
        let mut w = CaptureWriter::new(&mut out, 16);
        w.write(&[b'a'; 15]).unwrap();
        assert!(w.body().is_some());
        w.write(b"b").unwrap();
        assert!(w.body().is_none());
        w.write(b"c").unwrap();
        assert!(w.body().is_none());
        drop(w);
        assert_eq!(out.body().len(), 17);
    }

    #[test]
    fn reads_content_type_from_headers() {
        let mut out = BufferedWriter::new();
        let mut w = CaptureWriter::new(&mut out, DEFAULT_CAPTURE_LIMIT);
        w.headers_mut().insert(CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(w.content_type(), Some("application/json"));
    }
}
