//! Environment variable helpers.
//!
//! [`env`] reads a variable and interprets the conventional literal spellings
//! used in `.env` files (`true`, `(false)`, `empty`, `null`, quoted strings).
//! [`load_dotenv`] populates the process environment from such a file.

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// An interpreted environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// `true` / `(true)` or `false` / `(false)`, any case
    Bool(bool),
    /// `empty` / `(empty)`, any case
    Empty,
    /// `null` / `(null)`, any case
    Null,
    /// Anything else, with one pair of surrounding double quotes removed
    Str(String),
}

impl EnvValue {
    /// Interpret a raw environment string.
    ///
    /// ```rust
    /// use toolbelt::env::EnvValue;
    ///
    /// assert_eq!(EnvValue::parse("(TRUE)"), EnvValue::Bool(true));
    /// assert_eq!(EnvValue::parse("\"quoted\""), EnvValue::Str("quoted".into()));
    /// assert_eq!(EnvValue::parse("Null"), EnvValue::Null);
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "(true)" => return Self::Bool(true),
            "false" | "(false)" => return Self::Bool(false),
            "empty" | "(empty)" => return Self::Empty,
            "null" | "(null)" => return Self::Null,
            _ => {}
        }

        if raw.len() > 1 && raw.starts_with('"') && raw.ends_with('"') {
            return Self::Str(raw[1..raw.len() - 1].to_string());
        }

        Self::Str(raw.to_string())
    }

    /// The value as text; booleans render as `true`/`false`, `Empty` as an
    /// empty string and `Null` as `None`.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Empty => Some(String::new()),
            Self::Null => None,
            Self::Str(s) => Some(s.clone()),
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` for [`EnvValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Read and interpret environment variable `key`.
///
/// Returns `None` when the variable is unset or not valid unicode.
pub fn env(key: &str) -> Option<EnvValue> {
    std::env::var(key).ok().map(|raw| EnvValue::parse(&raw))
}

/// Read `key`, falling back to `default` when unset.
pub fn env_or(key: &str, default: EnvValue) -> EnvValue {
    env(key).unwrap_or(default)
}

/// Read `key`, computing the fallback lazily when unset.
pub fn env_or_else<F>(key: &str, default: F) -> EnvValue
where
    F: FnOnce() -> EnvValue,
{
    env(key).unwrap_or_else(default)
}

/// File name looked up when [`load_dotenv`] is given a directory.
pub const DOTENV_FILE: &str = ".env";

/// Load variables from an environment file.
///
/// `path` is either the file itself or a directory holding a [`DOTENV_FILE`].
/// Variables already present in the process environment are left untouched.
///
/// # Errors
///
/// Returns [`Error::DotEnv`](crate::Error::DotEnv) when the file is missing or
/// malformed.
pub fn load_dotenv(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = if path.is_dir() {
        path.join(DOTENV_FILE)
    } else {
        path.to_path_buf()
    };

    dotenvy::from_path(&file)?;
    debug!(path = %file.display(), "loaded environment file");
    Ok(())
}
