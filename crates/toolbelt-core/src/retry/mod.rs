//! Retry with decorrelated-jitter backoff.
//!
//! # Key Types
//!
//! - [`Backoff`] - per-session wait calculator (decorrelated jitter, one minute cap)
//! - [`Retry`] - bounded retry loop driving a fresh [`Backoff`] per call
//! - [`Sleeper`] - the suspend primitive used between attempts
//!
//! # Examples
//!
//! ```rust
//! use toolbelt_core::retry::Retry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retry = Retry::builder()
//!     .times(3)
//!     .initial_delay_ms(100)
//!     .build()?;
//!
//! let result = retry.execute(|| async {
//!     // Your operation here
//!     Ok::<_, std::io::Error>(42)
//! }).await?;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod executor;
mod sleeper;

pub use backoff::{Backoff, CAP_MS};
pub use executor::{Retry, RetryBuilder, retry, retry_blocking};
pub use sleeper::{Sleeper, TokioSleeper};
