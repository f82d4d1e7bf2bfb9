use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::fields::Fields;

/// Timestamp layout used in records: `18-10-2026 14:03:59`.
pub const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

const RESERVED: [&str; 3] = ["time", "level", "msg"];

/// One structured log entry, serialized as a single JSON line.
#[derive(Clone, Debug)]
pub struct Record {
    time: DateTime<Local>,
    message: String,
    fields: Fields,
}

impl Record {
    pub fn new(message: impl Into<String>, fields: Fields) -> Self {
        Self::at(Local::now(), message, fields)
    }

    pub fn at(time: DateTime<Local>, message: impl Into<String>, fields: Fields) -> Self {
        Self { time, message: message.into(), fields }
    }

    pub fn time(&self) -> DateTime<Local> { self.time }
    pub fn message(&self) -> &str { &self.message }
    pub fn fields(&self) -> &Fields { &self.fields }

    /// The record as a JSON object.
    ///
    /// A field named `time`, `level` or `msg` is moved to `fields.<name>`
    /// so it cannot shadow the record's own keys.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (key, value) in &self.fields {
            let key = if RESERVED.contains(&key.as_str()) {
                format!("fields.{key}")
            } else {
                key.clone()
            };
            out.insert(key, value.clone());
        }
        out.insert("time".into(), self.time.format(TIME_FORMAT).to_string().into());
        out.insert("level".into(), "info".into());
        out.insert("msg".into(), self.message.clone().into());
        Value::Object(out)
    }

    /// The record as one line of JSON, without the trailing newline.
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_json())
    }
}
