//! Error types for the toolbelt facade

use thiserror::Error;
use toolbelt_core::error_boundary;

/// Result type for toolbelt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration or building retry policies
#[derive(Debug, Error)]
pub enum Error {
    /// Backoff or retry configuration rejected
    #[error(transparent)]
    Core(#[from] toolbelt_core::Error),

    /// A `.env` file could not be read or parsed
    #[error("Failed to load .env file: {0}")]
    DotEnv(String),

    /// An environment variable holds a value of the wrong shape
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidEnv {
        /// Variable name
        key: String,
        /// Raw value found in the environment
        value: String,
        /// What was expected instead
        reason: String,
    },
}

error_boundary!(dotenvy::Error => Error, |e| {
    Error::DotEnv(e.to_string())
});

impl Error {
    /// Create an invalid environment value error.
    pub fn invalid_env(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidEnv {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: Error = toolbelt_core::Error::invalid_argument("bad delay").into();
        assert_eq!(err.to_string(), "Invalid argument: bad delay");
        assert!(matches!(err, Error::Core(_)));
    }

    #[test]
    fn test_invalid_env_message() {
        let err = Error::invalid_env("TOOLBELT_RETRY_TIMES", "many", "expected an unsigned integer");
        assert_eq!(
            err.to_string(),
            "Invalid value for TOOLBELT_RETRY_TIMES: 'many' (expected an unsigned integer)"
        );
    }

    #[test]
    fn test_dotenv_error_boundary() {
        let err: Error = dotenvy::Error::EnvVar(std::env::VarError::NotPresent).into();
        assert!(matches!(err, Error::DotEnv(_)));
        assert!(err.to_string().starts_with("Failed to load .env file"));
    }
}
