//! Error types for backoff and retry configuration.
//!
//! Failures of the retried operation are never represented here: they are
//! returned to the caller exactly as the operation produced them.

mod boundary;

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a backoff or retry session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor argument is outside its accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
