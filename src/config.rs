//! Router configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::capture::DEFAULT_CAPTURE_LIMIT;
use crate::json::DEFAULT_MAX_BODY_SIZE;

/// Settings shared by the router, the access log and the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Where daily log files are written.
    pub log_dir: PathBuf,
    /// Largest request body accepted, in bytes.
    pub max_body_size: usize,
    /// Response bodies of this size or more are not logged.
    pub capture_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            capture_limit: DEFAULT_CAPTURE_LIMIT,
        }
    }
}

impl Config {
    /// Defaults, overridden by `LOGROUTE_LOG_DIR`, `LOGROUTE_MAX_BODY_SIZE`
    /// and `LOGROUTE_CAPTURE_LIMIT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os("LOGROUTE_LOG_DIR").filter(|d| !d.is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }
        override_from("LOGROUTE_MAX_BODY_SIZE", &mut config.max_body_size);
        override_from("LOGROUTE_CAPTURE_LIMIT", &mut config.capture_limit);
        config
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    pub fn capture_limit(mut self, bytes: usize) -> Self {
        self.capture_limit = bytes;
        self
    }
}

fn override_from<T>(key: &str, slot: &mut T)
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(key) else { return };
    match parse_setting(&raw) {
        Ok(value) => *slot = value,
        Err(e) => warn!(key, value = %raw, "ignoring setting, keeping {slot}: {e}"),
    }
}

fn parse_setting<T: FromStr>(raw: &str) -> Result<T, T::Err> {
    raw.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_body_size, 10 << 20);
        assert_eq!(config.capture_limit, 2 << 20);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::default().log_dir("/tmp/x").max_body_size(64).capture_limit(8);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.max_body_size, 64);
        assert_eq!(config.capture_limit, 8);
    }

    #[test]
    fn settings_are_trimmed_and_validated() {
        assert_eq!(parse_setting::<usize>(" 1024 "), Ok(1024));
        assert!(parse_setting::<usize>("lots").is_err());
    }
}
