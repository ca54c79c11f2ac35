//! The suspend primitive used between retry attempts.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the calling task for a given duration.
///
/// [`Backoff::wait_with`](super::Backoff::wait_with) and [`Retry`](super::Retry)
/// only ever suspend through this trait, so a caller can substitute a clock of
/// its own (a recording sleeper in tests, a runtime other than tokio, a sleep
/// that races a cancellation signal).
///
/// # Examples
///
/// ```rust
/// use toolbelt_core::retry::{Retry, Sleeper};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Clone, Default)]
/// struct Recorder(Arc<Mutex<Vec<Duration>>>);
///
/// #[async_trait::async_trait]
/// impl Sleeper for Recorder {
///     async fn sleep(&self, duration: Duration) {
///         self.0.lock().unwrap().push(duration);
///     }
/// }
///
/// # async fn example() {
/// let recorder = Recorder::default();
/// let retry = Retry::builder()
///     .times(2)
///     .initial_delay_ms(10)
///     .sleeper(recorder.clone())
///     .build()
///     .unwrap();
///
/// let _ = retry
///     .execute(|| async { Err::<(), _>(std::io::Error::other("down")) })
///     .await;
///
/// assert_eq!(recorder.0.lock().unwrap().len(), 2);
/// # }
/// ```
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Default sleeper backed by `tokio::time::sleep`.
///
/// Yields to the runtime rather than blocking the worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
