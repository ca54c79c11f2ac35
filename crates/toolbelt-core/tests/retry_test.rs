//! Integration tests for retry sessions through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use toolbelt_core::prelude::*;

/// An operation that fails `failures` times before returning the call count.
fn flaky(
    calls: Arc<AtomicU32>,
    failures: u32,
) -> impl FnMut() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<u32, std::io::Error>> + Send>>
{
    move || {
        let calls = Arc::clone(&calls);
        Box::pin(async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                Err(std::io::Error::other(format!("failure {n}")))
            } else {
                Ok(n)
            }
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_always_fails_surfaces_last_io_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let retry = Retry::new(3, 10).unwrap();

    let err = retry
        .execute(flaky(Arc::clone(&calls), u32::MAX))
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(err.kind(), std::io::ErrorKind::Other);
    assert_eq!(err.to_string(), "failure 4");
}

#[tokio::test(start_paused = true)]
async fn test_first_wait_is_exactly_initial_delay() {
    let calls = Arc::new(AtomicU32::new(0));
    let retry = Retry::new(1, 1000).unwrap();
    let start = tokio::time::Instant::now();

    let value = retry
        .execute(flaky(Arc::clone(&calls), 1))
        .await
        .unwrap();

    assert_eq!(value, 2);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000), "slept {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1010), "slept {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_first_try_success_takes_no_time() {
    let calls = Arc::new(AtomicU32::new(0));
    let retry = Retry::new(0, 1000).unwrap();
    let start = tokio::time::Instant::now();

    let value = retry.execute(flaky(Arc::clone(&calls), 0)).await.unwrap();

    assert_eq!(value, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_total_wait_bounded_by_jitter_envelope() {
    // Three retries from 100ms: 100 + at most 300 + at most 900.
    let calls = Arc::new(AtomicU32::new(0));
    let retry = Retry::new(3, 100).unwrap();
    let start = tokio::time::Instant::now();

    let _ = retry.execute(flaky(Arc::clone(&calls), u32::MAX)).await;

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(300), "slept {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1310), "slept {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_sessions_are_independent() {
    let retry = Arc::new(Retry::new(2, 20).unwrap());
    let mut handles = Vec::new();

    for failures in 0..4u32 {
        let retry = Arc::clone(&retry);
        handles.push(tokio::spawn(async move {
            let calls = Arc::new(AtomicU32::new(0));
            let result = retry.execute(flaky(Arc::clone(&calls), failures)).await;
            (failures, result.is_ok(), calls.load(Ordering::SeqCst))
        }));
    }

    for handle in handles {
        let (failures, ok, calls) = handle.await.unwrap();
        if failures <= 2 {
            assert!(ok);
            assert_eq!(calls, failures + 1);
        } else {
            assert!(!ok);
            assert_eq!(calls, 3);
        }
    }
}

#[tokio::test]
async fn test_retry_helper_with_anyhow() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut op = flaky(Arc::clone(&calls), 2);

    let value: anyhow::Result<u32> = retry(
        5,
        || {
            let fut = op();
            async move { fut.await.map_err(anyhow::Error::from) }
        },
        1,
    )
    .await;

    assert_eq!(value.unwrap(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_helper_rejects_delay_above_cap() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut op = flaky(Arc::clone(&calls), 0);

    let result: anyhow::Result<u32> = retry(
        1,
        || {
            let fut = op();
            async move { fut.await.map_err(anyhow::Error::from) }
        },
        CAP_MS as i64 + 1,
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidArgument(_))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_backoff_never_exceeds_cap_over_long_run() {
    let mut backoff = Backoff::new(30_000).unwrap();
    for _ in 0..1_000 {
        let delay = backoff.advance();
        assert!((30_000..=CAP_MS).contains(&delay));
    }
}
