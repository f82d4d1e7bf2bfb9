//! Per-request log fields.
//!
//! Every [`Request`](crate::Request) owns a [`LogFields`] handle from the
//! moment it is created. Handlers that take a `LogFields` argument receive a
//! clone of that same handle, so whatever they add is visible to the
//! access-log middleware when it writes the request's record.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

/// A field name → value mapping.
pub type Fields = Map<String, Value>;

/// Shared accumulator for one request's log fields.
///
/// Cloning is cheap and every clone points at the same map.
#[derive(Clone, Debug, Default)]
pub struct LogFields(Arc<Mutex<Fields>>);

impl LogFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field, replacing any previous value under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().insert(key.into(), value.into());
    }

    /// Merges `fields` in; later keys replace earlier ones.
    pub fn extend(&self, fields: Fields) {
        self.lock().extend(fields);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// A copy of everything added so far.
    pub fn snapshot(&self) -> Fields {
        self.lock().clone()
    }

    /// Empties the map and returns what it held.
    pub(crate) fn take(&self) -> Fields {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Fields> {
        // Poison is ignored: fields stay readable after a handler panic.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
