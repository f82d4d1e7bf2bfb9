//! Unified error type.

/// The error type returned by logroute's fallible operations.
///
/// Handler outcomes are not expressed through this type: they travel as
/// [`StatusError`](crate::StatusError) values and are turned into problem
/// bodies by the translator. `Error` surfaces decoding, configuration and
/// infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("content-type is not application/json")]
    NotJson,

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("cannot decode json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot decode query: {0}")]
    Query(#[from] serde_urlencoded::de::Error),

    #[error("no error details for status with code OK")]
    DetailsOnOk,

    #[error("cannot encode status detail: {0}")]
    Detail(#[source] serde_json::Error),
}
