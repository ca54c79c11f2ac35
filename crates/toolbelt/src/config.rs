//! Retry configuration

use crate::env::{EnvValue, env};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use toolbelt_core::retry::Retry;

/// Environment variable holding the number of extra attempts.
pub const RETRY_TIMES_VAR: &str = "TOOLBELT_RETRY_TIMES";

/// Environment variable holding the initial backoff in milliseconds.
pub const RETRY_SLEEP_MS_VAR: &str = "TOOLBELT_RETRY_SLEEP_MS";

/// Serializable description of a retry policy.
///
/// Deserializes from partial documents; missing fields keep their defaults.
///
/// ```rust
/// use toolbelt::RetryConfig;
///
/// let config: RetryConfig = serde_json::from_str(r#"{ "times": 4 }"#).unwrap();
/// assert_eq!(config.times, 4);
/// assert_eq!(config.initial_delay_ms, 0);
///
/// let retry = config.build().unwrap();
/// assert_eq!(retry.times(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts allowed after the first one
    pub times: u32,

    /// Pause before the first retry, in milliseconds
    pub initial_delay_ms: u64,
}

impl RetryConfig {
    /// Create a configuration with explicit values.
    pub fn new(times: u32, initial_delay_ms: u64) -> Self {
        Self {
            times,
            initial_delay_ms,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `TOOLBELT_RETRY_TIMES` for the number of extra attempts
    /// - `TOOLBELT_RETRY_SLEEP_MS` for the initial backoff
    ///
    /// Unset, `null` and `empty` values keep the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] when a variable is not an unsigned integer.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(times) = read_u64(RETRY_TIMES_VAR)? {
            config.times = u32::try_from(times).map_err(|_| {
                Error::invalid_env(RETRY_TIMES_VAR, times.to_string(), "value too large")
            })?;
        }

        if let Some(delay) = read_u64(RETRY_SLEEP_MS_VAR)? {
            config.initial_delay_ms = delay;
        }

        Ok(config)
    }

    /// Merge this configuration with another, with non-default values of the
    /// other taking precedence.
    pub fn merge(mut self, other: RetryConfig) -> Self {
        if other.times != 0 {
            self.times = other.times;
        }
        if other.initial_delay_ms != 0 {
            self.initial_delay_ms = other.initial_delay_ms;
        }
        self
    }

    /// Validate and build the retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`] when the initial delay exceeds one minute.
    pub fn build(&self) -> Result<Retry> {
        let delay = i64::try_from(self.initial_delay_ms).unwrap_or(i64::MAX);
        Ok(Retry::new(self.times, delay)?)
    }
}

fn read_u64(key: &str) -> Result<Option<u64>> {
    match env(key) {
        None | Some(EnvValue::Null) | Some(EnvValue::Empty) => Ok(None),
        Some(EnvValue::Str(raw)) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| Error::invalid_env(key, raw, "expected an unsigned integer")),
        Some(EnvValue::Bool(b)) => Err(Error::invalid_env(
            key,
            b.to_string(),
            "expected an unsigned integer",
        )),
    }
}
