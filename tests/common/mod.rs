#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, Uri};
use logroute::log::{LogSink, Logger, Record};
use logroute::{Config, Request, Router};
use serde_json::Value;

/// Keeps every record in memory as its JSON object.
#[derive(Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<Value>>>);

impl MemorySink {
    pub fn records(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

impl LogSink for MemorySink {
    fn write_record(&mut self, record: &Record) -> io::Result<()> {
        self.0.lock().unwrap().push(record.to_json());
        Ok(())
    }
}

pub fn router_with_sink(config: Config) -> (Router, MemorySink) {
    let sink = MemorySink::default();
    let router = Router::with_logger(config, Arc::new(Logger::new(sink.clone())));
    (router, sink)
}

pub fn json_request(method: Method, uri: &'static str, body: &'static str) -> Request {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Request::new(method, Uri::from_static(uri), headers, body)
}

pub fn request(method: Method, uri: &'static str) -> Request {
    Request::new(method, Uri::from_static(uri), HeaderMap::new(), "")
}

pub fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}
