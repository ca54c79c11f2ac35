#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry primitives for the toolbelt utilities.
//!
//! This crate provides:
//!
//! - **Decorrelated-jitter backoff** via [`Backoff`](retry::Backoff)
//!   - each wait is drawn from `[initial, previous * 3]`, capped at one minute
//!   - a zero initial delay never sleeps
//! - **Bounded retry** via [`Retry`](retry::Retry) and the [`retry`](retry::retry) helper
//!   - the operation's own error is returned unchanged once the budget is spent
//! - **A pluggable sleep primitive** via the [`Sleeper`](retry::Sleeper) trait
//! - **Declarative error boundaries** via the `error_boundary!` macro
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use toolbelt_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retry = Retry::builder()
//!     .times(3)
//!     .initial_delay_ms(100)
//!     .build()?;
//!
//! let result = retry.execute(|| async {
//!     Ok::<_, std::io::Error>(42)
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod retry;

pub use error::{Error, Result};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use toolbelt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error_boundary;
    pub use crate::retry::{
        Backoff, CAP_MS, Retry, RetryBuilder, Sleeper, TokioSleeper, retry, retry_blocking,
    };
}
