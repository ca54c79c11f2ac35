//! Example: retrying a flaky call with decorrelated-jitter backoff
//!
//! This example demonstrates:
//! 1. Simple retry that recovers after a few failures
//! 2. Budget exhaustion returning the operation's own error
//! 3. The jittered delay sequence (run multiple times to see variance)
//!
//! Run with:
//! ```bash
//! cargo run -p toolbelt-core --example retry_example
//! ```

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use toolbelt_core::prelude::*;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!(
                "  Attempt {}: FAILED (simulating transient error)",
                attempt + 1
            );
            Err(std::io::Error::other(format!(
                "Transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: recover after two failures
async fn example_simple_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Simple Retry ===\n");

    let retry = Retry::builder().times(3).initial_delay_ms(100).build()?;
    let api = UnreliableApi::new(2);

    println!("Calling unreliable API (will fail 2 times before succeeding)...");
    let start = Instant::now();

    let result = retry.execute(|| api.call()).await?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Elapsed: {:?}", start.elapsed());

    Ok(())
}

/// Example 2: the budget runs out and the last io::Error comes back
async fn example_exhausted() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Budget Exhausted ===\n");

    let api = UnreliableApi::new(u32::MAX);

    let result: Result<String, anyhow::Error> =
        retry(2, || async { api.call().await.map_err(anyhow::Error::from) }, 50).await;

    match result {
        Ok(_) => println!("Unexpected success"),
        Err(err) => println!("\nGave up after {} attempts: {}", api.total_attempts(), err),
    }

    Ok(())
}

/// Example 3: print a jittered delay sequence
fn example_delay_sequence() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Delay Sequence ===\n");

    let mut backoff = Backoff::new(100)?;
    print!("  {}ms", backoff.current_delay_ms());
    for _ in 0..10 {
        print!(" -> {}ms", backoff.advance());
    }
    println!("\n  (never below 100ms, never above {}ms)", CAP_MS);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    example_simple_retry().await?;
    example_exhausted().await?;
    example_delay_sequence()?;
    Ok(())
}
