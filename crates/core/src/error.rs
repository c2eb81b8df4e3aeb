//! Unified error types for feedkit.
//!
//! Display strings carry a stable code prefix so callers and logs can
//! classify a failure without matching on the variant.

use tokio_rusqlite::rusqlite;

/// Unified error type for feed loading and caching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response reached us from the transport.
    #[error("CONNECTIVITY: {0}")]
    Connectivity(String),

    /// Non-200 status or a payload that does not match the feed schema.
    #[error("INVALID_DATA: {0}")]
    InvalidData(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// The persisted representation could not be decoded.
    #[error("STORE_ERROR: corrupt cache: {0}")]
    CorruptCache(String),

    /// Filesystem failure in a file-backed store.
    #[error("STORE_ERROR: io: {0}")]
    Io(#[from] std::io::Error),

    /// Opaque failure reported by a storage engine.
    #[error("STORE_ERROR: {0}")]
    Store(String),
}

impl Error {
    /// Whether the error originated in a storage engine.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::MigrationFailed(_) | Error::CorruptCache(_) | Error::Io(_) | Error::Store(_)
        )
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CorruptCache(err.to_string())
    }
}
