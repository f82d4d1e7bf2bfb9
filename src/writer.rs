//! The outbound response stream.
//!
//! Handlers and middleware never build the hyper response directly. They
//! write through a [`ResponseWriter`]: headers first, then a status, then
//! zero or more body chunks. The router hands the chain a
//! [`BufferedWriter`] and turns it into the final [`Response`] once the
//! chain returns.

use std::io;

use bytes::BytesMut;
use http::{HeaderMap, StatusCode};
use tracing::warn;

use crate::response::Response;

/// A response stream that handlers and middleware write into.
///
/// `Send` so that a `&mut dyn ResponseWriter` can be held across `.await`
/// points inside middleware futures.
pub trait ResponseWriter: Send {
    fn headers(&self) -> &HeaderMap;
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the response status. Only the first call takes effect; writing
    /// a body chunk before any call implies `200 OK`.
    fn write_header(&mut self, status: StatusCode);

    /// Appends a body chunk, returning the number of bytes accepted.
    fn write(&mut self, chunk: &[u8]) -> io::Result<usize>;
}

/// In-memory [`ResponseWriter`] that becomes the client response.
#[derive(Debug, Default)]
pub struct BufferedWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status sent so far; `200 OK` if nothing has been written.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response {
        Response {
            status: self.status.unwrap_or(StatusCode::OK),
            headers: self.headers,
            body: self.body.freeze(),
        }
    }
}

impl ResponseWriter for BufferedWriter {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        match self.status {
            Some(sent) => warn!(%sent, ignored = %status, "superfluous write_header call"),
            None => self.status = Some(status),
        }
    }

    fn write(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(chunk);
        Ok(chunk.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_status_wins() {
        let mut w = BufferedWriter::new();
        w.write_header(StatusCode::CREATED);
        w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(w.status(), StatusCode::CREATED);
    }

    #[test]
    fn body_write_implies_ok() {
        let mut w = BufferedWriter::new();
        w.write(b"hello ").unwrap();
        w.write_header(StatusCode::NOT_FOUND);
        w.write(b"world").unwrap();

        let res = w.into_response();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"hello world");
    }
}
