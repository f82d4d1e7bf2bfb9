//! Structured access logging.
//!
//! A [`Logger`] owns one [`LogSink`] behind one lock. Building a [`Record`]
//! happens outside the lock; writing it happens inside, so concurrent
//! requests never interleave their lines but never wait on each other's
//! handlers either.
//!
//! ```rust,no_run
//! use logroute::log::Logger;
//! use logroute::Fields;
//!
//! let logger = Logger::daily("/var/log/myapp");
//! logger.write("cache warmed", Fields::new());
//! ```

mod record;
mod sink;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::error;

use crate::fields::Fields;

pub use record::{Record, TIME_FORMAT};
pub use sink::{ACCESS_TARGET, ConsoleSink, DailyFileSink, LogSink};

/// Serializes records into a single sink.
pub struct Logger {
    sink: Mutex<Box<dyn LogSink>>,
}

impl Logger {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self { sink: Mutex::new(Box::new(sink)) }
    }

    /// Daily files under `dir`, mirrored to the console.
    pub fn daily(dir: impl Into<PathBuf>) -> Self {
        Self::new(DailyFileSink::new(dir))
    }

    /// Console only.
    pub fn console() -> Self {
        Self::new(ConsoleSink)
    }

    /// Stamps `fields` with the current time and writes them as one record.
    pub fn write(&self, message: impl Into<String>, fields: Fields) {
        self.emit(&Record::new(message, fields));
    }

    /// Writes a prepared record. Failures are reported through `tracing`
    /// and otherwise swallowed.
    pub fn emit(&self, record: &Record) {
        if let Err(e) = self.lock().write_record(record) {
            error!("cannot write log record: {e}");
        }
    }

    /// Redirects the sink to `dir`, effective from the next record.
    pub fn set_log_dir(&self, dir: &Path) {
        self.lock().set_dir(dir);
    }

    /// The directory the sink currently writes to, if it writes files.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.lock().log_dir()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn LogSink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
