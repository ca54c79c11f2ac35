//! Decorrelated-jitter backoff.

use super::sleeper::{Sleeper, TokioSleeper};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::trace;

/// Upper bound for any backoff interval, in milliseconds (one minute).
pub const CAP_MS: u64 = 60 * 1000;

/// Backoff calculator using the "decorrelated jitter" recurrence.
///
/// The first wait is exactly the initial delay. Every wait after that is drawn
/// uniformly from `[initial, previous * 3]` and capped at [`CAP_MS`]:
///
/// ```text
/// next = min(CAP_MS, random_between(initial, current * 3))
/// ```
///
/// The lower bound is the initial delay on every step. See
/// <https://aws.amazon.com/blogs/architecture/exponential-backoff-and-jitter/>.
///
/// A backoff created with an initial delay of zero never sleeps and never
/// grows.
///
/// One `Backoff` belongs to one retry session and is not `Clone`.
///
/// # Examples
///
/// ```rust
/// use toolbelt_core::retry::{Backoff, CAP_MS};
///
/// let mut backoff = Backoff::new(100)?;
/// assert_eq!(backoff.current_delay_ms(), 100);
///
/// let next = backoff.advance();
/// assert!((100..=300).contains(&next));
/// assert!(next <= CAP_MS);
/// # Ok::<(), toolbelt_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Backoff<R = StdRng> {
    first_ms: u64,
    current_ms: u64,
    rng: R,
}

impl Backoff<StdRng> {
    /// Create a backoff whose first wait is `first_ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `first_ms` is negative or
    /// greater than [`CAP_MS`].
    pub fn new(first_ms: i64) -> Result<Self> {
        Self::with_rng(first_ms, StdRng::from_entropy())
    }

    /// Build from a delay that has already passed [`validate_initial_delay`].
    pub(crate) fn from_validated(first_ms: u64) -> Self {
        debug_assert!(first_ms <= CAP_MS);
        Self {
            first_ms,
            current_ms: first_ms,
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> Backoff<R> {
    /// Create a backoff drawing its jitter from `rng`.
    ///
    /// Useful for reproducible sequences in tests; the generator only needs to
    /// be statistically uniform.
    ///
    /// # Errors
    ///
    /// Same as [`Backoff::new`].
    pub fn with_rng(first_ms: i64, rng: R) -> Result<Self> {
        let first_ms = validate_initial_delay(first_ms)?;
        Ok(Self {
            first_ms,
            current_ms: first_ms,
            rng,
        })
    }

    /// The floor of every jittered delay, fixed at construction.
    pub fn initial_delay_ms(&self) -> u64 {
        self.first_ms
    }

    /// The delay the next wait will use, in milliseconds.
    ///
    /// Before any wait this is the initial delay.
    pub fn current_delay_ms(&self) -> u64 {
        self.current_ms
    }

    /// [`current_delay_ms`](Self::current_delay_ms) as a [`Duration`].
    pub fn current_delay(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Step the recurrence without sleeping and return the new delay.
    ///
    /// A zero delay stays zero.
    pub fn advance(&mut self) -> u64 {
        if self.current_ms == 0 {
            return 0;
        }

        let upper = self.current_ms.saturating_mul(3);
        let next = self.rng.gen_range(self.first_ms..=upper).min(CAP_MS);

        trace!(
            previous_ms = self.current_ms,
            next_ms = next,
            "backoff advanced"
        );
        self.current_ms = next;
        next
    }

    /// Sleep for the current delay on the tokio runtime, then advance.
    ///
    /// Returns immediately when the delay is zero.
    pub async fn wait(&mut self)
    where
        R: Send,
    {
        self.wait_with(&TokioSleeper).await;
    }

    /// Sleep for the current delay through `sleeper`, then advance.
    ///
    /// `sleeper` is not called at all when the delay is zero.
    pub async fn wait_with<S>(&mut self, sleeper: &S)
    where
        S: Sleeper + ?Sized,
        R: Send,
    {
        if self.current_ms == 0 {
            return;
        }

        sleeper.sleep(self.current_delay()).await;
        self.advance();
    }

    /// Block the current thread for the current delay, then advance.
    ///
    /// For synchronous callers only; inside an async runtime use
    /// [`wait`](Self::wait).
    pub fn wait_blocking(&mut self) {
        if self.current_ms == 0 {
            return;
        }

        std::thread::sleep(self.current_delay());
        self.advance();
    }
}

/// Check that `first_ms` lies in `[0, CAP_MS]`.
pub(crate) fn validate_initial_delay(first_ms: i64) -> Result<u64> {
    let first_ms = u64::try_from(first_ms).map_err(|_| {
        Error::invalid_argument("first backoff interval must be greater than or equal to 0")
    })?;

    if first_ms > CAP_MS {
        return Err(Error::invalid_argument(format!(
            "first backoff interval must be less than or equal to {CAP_MS} milliseconds"
        )));
    }

    Ok(first_ms)
}
