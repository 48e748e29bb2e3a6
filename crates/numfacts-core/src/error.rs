//! Error types for numfacts-core.

use thiserror::Error;

use crate::config::ConfigValidationError;

/// Result type alias using numfacts-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for building and wiring the library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures produced by a fact source.
///
/// These are the only errors that ever reach the orchestrator's
/// user-facing error message.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request target could not be turned into a valid URL.
    #[error("invalid request target: {0}")]
    InvalidTarget(String),

    /// Non-2xx response, network failure, or timeout. `status` is absent
    /// when no HTTP response was received.
    #[error("transport failure ({})", status_label(.status))]
    TransportFailure { status: Option<u16> },

    /// The response carried no usable fact.
    #[error("empty payload")]
    EmptyPayload,

    /// The response did not decode to the expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Anything a source implementation could not classify.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no response".to_string(),
    }
}

/// Fallback shown for failures outside the known taxonomy.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

impl SourceError {
    /// Create a transport failure for an HTTP status code
    pub fn status(code: u16) -> Self {
        Self::TransportFailure { status: Some(code) }
    }

    /// Create a transport failure with no response (network error, timeout)
    pub fn no_response() -> Self {
        Self::TransportFailure { status: None }
    }

    /// Create a malformed payload error
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedPayload(detail.into())
    }

    /// Human-readable description shown to the user.
    ///
    /// One fixed string per variant; the status code is the only
    /// interpolated detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidTarget(_) => "Invalid URL.".to_string(),
            Self::TransportFailure { status: Some(code) } => {
                format!("Request failed with status {}.", code)
            }
            Self::TransportFailure { status: None } => {
                "Request failed. Check your connection and try again.".to_string()
            }
            Self::EmptyPayload => "Empty response.".to_string(),
            Self::MalformedPayload(_) => "Invalid response.".to_string(),
            Self::Other(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Failures inside a fact store backend.
///
/// Never surfaced through the `FactStore` trait; backends log them and
/// carry on. The fallible `try_*` methods on concrete backends return them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "db")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Store worker stopped")]
    WorkerStopped,

    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Invalid stored id: {0}")]
    InvalidId(String),
}
