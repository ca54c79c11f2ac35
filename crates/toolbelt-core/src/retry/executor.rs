//! Bounded retry driven by [`Backoff`].

use super::backoff::{Backoff, validate_initial_delay};
use super::sleeper::{Sleeper, TokioSleeper};
use crate::error::{Error, Result};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry a fallible operation a fixed number of extra times.
///
/// The operation runs once, then up to `times` more times while it keeps
/// failing. Between attempts the loop waits on a [`Backoff`] created fresh for
/// each [`execute`](Retry::execute) call, so the first pause is exactly the
/// initial delay and later pauses use decorrelated jitter.
///
/// Every failure counts against the budget; no error kind is treated
/// specially. When the budget is spent the operation's last error is returned
/// as is.
///
/// Invalid configuration is rejected by [`RetryBuilder::build`], before any
/// attempt is made, which keeps the error type of `execute` equal to the
/// operation's own.
///
/// # Examples
///
/// ```rust
/// use toolbelt_core::retry::Retry;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let retry = Retry::new(3, 10)?;
///
/// let calls = &AtomicU32::new(0);
/// let value = retry
///     .execute(|| async move {
///         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
///             Err(std::io::Error::other("flaky"))
///         } else {
///             Ok(42)
///         }
///     })
///     .await?;
///
/// assert_eq!(value, 42);
/// assert_eq!(calls.load(Ordering::SeqCst), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Retry<S = TokioSleeper> {
    times: u32,
    initial_delay_ms: u64,
    sleeper: S,
}

impl Retry {
    /// Create a retry policy allowing `times` extra attempts with an initial
    /// pause of `initial_delay_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `initial_delay_ms` is outside
    /// `[0, CAP_MS]`.
    pub fn new(times: u32, initial_delay_ms: i64) -> Result<Self> {
        Self::builder()
            .times(times)
            .initial_delay_ms(initial_delay_ms)
            .build()
    }

    /// Create a new builder.
    ///
    /// Defaults: no extra attempts, no pause.
    pub fn builder() -> RetryBuilder {
        RetryBuilder::default()
    }
}

impl<S> Retry<S> {
    /// Number of attempts allowed after the first one.
    pub fn times(&self) -> u32 {
        self.times
    }

    /// Pause before the first retry, in milliseconds.
    pub fn initial_delay_ms(&self) -> u64 {
        self.initial_delay_ms
    }

    /// A fresh backoff for one retry session.
    pub fn backoff(&self) -> Backoff {
        Backoff::from_validated(self.initial_delay_ms)
    }

    /// Run `operation` synchronously, blocking the thread between attempts.
    ///
    /// Same budget and error semantics as [`execute`](Self::execute); the
    /// configured [`Sleeper`] is not used.
    pub fn execute_blocking<F, T, E>(&self, mut operation: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        let mut backoff = self.backoff();
        let mut remaining = self.times;
        let mut attempt: u32 = 1;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) if remaining == 0 => {
                    warn!(attempts = attempt, error = %err, "retry budget exhausted");
                    return Err(err);
                }
                Err(err) => {
                    remaining -= 1;
                    debug!(
                        attempt,
                        remaining,
                        delay_ms = backoff.current_delay_ms(),
                        error = %err,
                        "attempt failed, retrying"
                    );
                    backoff.wait_blocking();
                    attempt += 1;
                }
            }
        }
    }
}

impl<S: Sleeper> Retry<S> {
    /// Run `operation` until it succeeds or the budget is spent.
    ///
    /// The operation is invoked at most `times + 1` times. A first-try success
    /// returns without touching the sleeper.
    ///
    /// # Errors
    ///
    /// The operation's last error, unchanged.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Display,
    {
        let mut backoff = self.backoff();
        let mut remaining = self.times;
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if remaining == 0 => {
                    warn!(attempts = attempt, error = %err, "retry budget exhausted");
                    return Err(err);
                }
                Err(err) => {
                    remaining -= 1;
                    debug!(
                        attempt,
                        remaining,
                        delay_ms = backoff.current_delay_ms(),
                        error = %err,
                        "attempt failed, retrying"
                    );
                    backoff.wait_with(&self.sleeper).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Builder for configuring [`Retry`].
///
/// # Examples
///
/// ```rust
/// use toolbelt_core::retry::Retry;
/// use std::time::Duration;
///
/// let retry = Retry::builder()
///     .times(5)
///     .initial_delay(Duration::from_millis(250))
///     .build()
///     .unwrap();
///
/// assert_eq!(retry.times(), 5);
/// assert_eq!(retry.initial_delay_ms(), 250);
/// ```
#[derive(Debug, Default)]
pub struct RetryBuilder<S = TokioSleeper> {
    times: Option<u32>,
    initial_delay_ms: Option<i64>,
    sleeper: S,
}

impl<S> RetryBuilder<S> {
    /// Set the number of attempts allowed after the first one.
    ///
    /// Default: 0
    pub fn times(mut self, times: u32) -> Self {
        self.times = Some(times);
        self
    }

    /// Set the pause before the first retry, in milliseconds.
    ///
    /// Default: 0 (retry immediately, never sleep)
    pub fn initial_delay_ms(mut self, delay_ms: i64) -> Self {
        self.initial_delay_ms = Some(delay_ms);
        self
    }

    /// Set the pause before the first retry.
    ///
    /// Sub-millisecond precision is truncated.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay_ms = Some(i64::try_from(delay.as_millis()).unwrap_or(i64::MAX));
        self
    }

    /// Replace the sleep primitive used between attempts.
    pub fn sleeper<T: Sleeper>(self, sleeper: T) -> RetryBuilder<T> {
        RetryBuilder {
            times: self.times,
            initial_delay_ms: self.initial_delay_ms,
            sleeper,
        }
    }

    /// Validate the configuration and build the [`Retry`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the initial delay is negative or
    /// greater than [`CAP_MS`](super::CAP_MS).
    pub fn build(self) -> Result<Retry<S>> {
        let initial_delay_ms = validate_initial_delay(self.initial_delay_ms.unwrap_or(0))?;
        Ok(Retry {
            times: self.times.unwrap_or(0),
            initial_delay_ms,
            sleeper: self.sleeper,
        })
    }
}

/// Retry `operation` up to `times` extra times, pausing `sleep_ms` before the
/// first retry and using decorrelated jitter after that.
///
/// The operation's error type must be able to represent a configuration
/// error; declare the conversion with [`error_boundary!`](crate::error_boundary)
/// or a thiserror `#[from]`. Errors produced by the operation itself are
/// returned unchanged.
///
/// # Examples
///
/// ```rust
/// use toolbelt_core::retry::retry;
///
/// # async fn example() -> anyhow::Result<()> {
/// let body = retry(2, || async { Ok::<_, anyhow::Error>("ok") }, 100).await?;
/// assert_eq!(body, "ok");
/// # Ok(())
/// # }
/// ```
pub async fn retry<F, Fut, T, E>(times: u32, operation: F, sleep_ms: i64) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: From<Error> + fmt::Display,
{
    Retry::new(times, sleep_ms)?.execute(operation).await
}

/// Blocking counterpart of [`retry`].
pub fn retry_blocking<F, T, E>(times: u32, operation: F, sleep_ms: i64) -> std::result::Result<T, E>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: From<Error> + fmt::Display,
{
    Retry::new(times, sleep_ms)?.execute_blocking(operation)
}
