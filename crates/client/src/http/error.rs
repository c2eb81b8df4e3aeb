//! Transport error types.

use std::sync::Arc;

/// Failure to obtain a response from the remote end.
///
/// Any HTTP status, including errors, counts as a response and is not
/// represented here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpClientError {
    /// The request did not complete within the configured timeout.
    #[error("request timeout")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The underlying client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Response body exceeded the configured limit.
    #[error("response too large: {size} bytes exceeds {limit}")]
    TooLarge { size: usize, limit: usize },
}

impl From<reqwest::Error> for HttpClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { HttpClientError::Timeout } else { HttpClientError::Network(Arc::new(err)) }
    }
}
