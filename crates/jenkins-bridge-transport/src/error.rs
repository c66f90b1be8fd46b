//! Transport error types

use std::time::Duration;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established (DNS, refused, TLS handshake)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The per-request timeout elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The request failed after the connection was established
    #[error("Request error: {0}")]
    Request(String),

    /// The request could not be built (bad header, unsupported URL)
    #[error("Invalid request: {0}")]
    Builder(String),

    /// The server answered with a 5xx status
    #[error("Server error (status {status})")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Every attempt of a retried read failed
    #[error("Max retries exceeded after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// Last observed failure
        #[source]
        last: Box<TransportError>,
    },

    /// TLS trust material could not be loaded
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Classify a reqwest failure, attributing timeouts to `timeout`.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::Builder(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }

    /// The innermost failure, looking through retry exhaustion.
    pub fn last_failure(&self) -> &TransportError {
        match self {
            Self::RetriesExhausted { last, .. } => last.last_failure(),
            other => other,
        }
    }
}
