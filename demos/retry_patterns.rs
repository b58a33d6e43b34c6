//! Retry Patterns Example
//!
//! Demonstrates schedule-driven resilience for effects. Shows practical
//! patterns including:
//! - Basic retry with different backoff schedules
//! - Conditional retry (retry_while / retry_until)
//! - Retry with observability hooks
//! - Timeout handling via a child cancellation scope
//! - Folding a stream of samples with early exit
//!
//! Run with: `cargo run --example retry_patterns`

use std::time::Duration;

use millrace::prelude::*;
use millrace::testing::{counter, flaky, FLAKY_CODE};

// ==================== Basic Retry ====================

/// Example 1: Basic retry with exponential backoff
///
/// Demonstrates retrying an operation that fails transiently.
async fn example_basic_retry() {
    println!("\n=== Example 1: Basic Retry ===");

    // Fails twice, then succeeds with the attempt number
    let effect = flaky::<CancelScope>(2);

    let schedule = Schedule::exponential(Duration::from_millis(50))
        .intersect(Schedule::recurs(5));

    match effect.clone().retry(schedule).run(&CancelScope::new()).await {
        Outcome::Succ(attempt) => {
            println!("Succeeded on attempt {attempt} ({} runs)", effect.invocations());
        }
        Outcome::Fail(error) => println!("Gave up: {error}"),
    }
}

// ==================== Backoff Schedules ====================

/// Example 2: Comparing backoff schedules
///
/// Schedules are pure data; inspect their decisions without running
/// anything.
fn example_backoff_schedules() {
    println!("\n=== Example 2: Backoff Schedules ===");

    let schedules = [
        ("spaced", Schedule::spaced(Duration::from_millis(100))),
        ("linear", Schedule::linear(Duration::from_millis(100))),
        ("exponential", Schedule::exponential(Duration::from_millis(100))),
        (
            "capped exponential",
            Schedule::exponential(Duration::from_millis(100)).max_delay(Duration::from_millis(400)),
        ),
        ("fibonacci", Schedule::fibonacci(Duration::from_millis(100))),
    ];

    for (name, schedule) in schedules {
        let delays: Vec<_> = (0..5).map(|i| schedule.decide(i).delay).collect();
        println!("{name:>20}: {delays:?}");
    }
}

// ==================== Conditional Retry ====================

/// Example 3: Retry only transient failures
///
/// Permanent errors propagate at once instead of burning the schedule.
async fn example_conditional_retry() {
    println!("\n=== Example 3: Conditional Retry ===");

    const PERMANENT: i32 = 400;

    let effect = fail::<u32, CancelScope>(Error::expected(PERMANENT, "bad request"));
    let outcome = effect
        .retry_while(Schedule::recurs(10), |e| e.code() == Some(FLAKY_CODE))
        .run(&CancelScope::new())
        .await;
    println!("Permanent failure not retried: {:?}", outcome.error());
}

// ==================== Hooks ====================

/// Example 4: Observing every failed attempt
async fn example_retry_with_hooks() {
    println!("\n=== Example 4: Retry With Hooks ===");

    let effect = flaky::<CancelScope>(2);
    let outcome = retry_with_hooks(
        effect,
        Schedule::spaced(Duration::from_millis(20)),
        |event| {
            println!(
                "  attempt {} failed after {:?}: {} (next delay {:?})",
                event.attempt, event.elapsed, event.error, event.next_delay
            );
        },
    )
    .run(&CancelScope::new())
    .await;
    println!("Final outcome: {outcome:?}");
}

// ==================== Timeout ====================

/// Example 5: Bounding wall-clock time
///
/// The slow effect runs in a child scope; when the sleep wins the race
/// the child is cancelled and the parent scope is untouched.
async fn example_timeout() {
    println!("\n=== Example 5: Timeout ===");

    let slow = from_async(|_: &CancelScope| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Outcome::succeed("finally")
    });

    let outcome = slow
        .with_timeout(Duration::from_millis(50))
        .run(&CancelScope::new())
        .await;

    match outcome {
        Outcome::Fail(e) if e.is_timeout() => println!("Timed out as expected: {e}"),
        other => println!("Unexpected: {other:?}"),
    }
}

// ==================== Fold ====================

/// Example 6: Accumulating samples with early exit
async fn example_fold() {
    println!("\n=== Example 6: Fold With Early Exit ===");

    // Yields 1, 2, 3, ...; stop before the first value >= 5
    let samples = counter::<CancelScope>();
    let outcome = samples
        .fold_while(Schedule::forever(), 0u32, |acc, x| acc + x, |x| *x < 5)
        .run(&CancelScope::new())
        .await;
    println!("Sum of samples below 5: {outcome:?}");
}

#[tokio::main]
async fn main() {
    example_basic_retry().await;
    example_backoff_schedules();
    example_conditional_retry().await;
    example_retry_with_hooks().await;
    example_timeout().await;
    example_fold().await;
}
