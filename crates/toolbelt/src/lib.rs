//! # toolbelt
//!
//! Small, dependable helpers for application code:
//!
//! - **Retry with decorrelated jitter**: [`retry`], [`Retry`] and [`Backoff`]
//!   from `toolbelt-core`, re-exported here
//! - **Dot notation** access to nested JSON values: [`dot`]
//! - **Collection helpers** for JSON arrays and objects: [`arr`]
//! - **Environment helpers**: [`env::env`] with `.env` literal conventions and
//!   [`env::load_dotenv`]
//! - **Configuration**: [`RetryConfig`], loadable from the environment or any
//!   serde format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use toolbelt::{RetryConfig, env::load_dotenv};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     load_dotenv(".env")?;
//!
//!     let retry = RetryConfig::from_env()?.build()?;
//!     let body = retry
//!         .execute(|| async { Ok::<_, std::io::Error>("response") })
//!         .await?;
//!
//!     println!("{body}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod arr;
pub mod config;
pub mod dot;
pub mod env;
pub mod error;

pub use config::RetryConfig;
pub use error::{Error, Result};
pub use toolbelt_core::error_boundary;
pub use toolbelt_core::retry::{
    Backoff, CAP_MS, Retry, RetryBuilder, Sleeper, TokioSleeper, retry, retry_blocking,
};
