//! Resource Scopes Example
//!
//! Demonstrates the bracket pattern for safe resource management. The
//! release step always runs, whatever the body does. Shows:
//! - The core acquire -> use -> release flow
//! - Release on body failure and on panic
//! - The release policy for failing cleanups
//! - Bracket inside retry: one release per attempt
//!
//! Run with: `cargo run --example resource_scopes`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use millrace::prelude::*;

#[derive(Clone, Debug)]
struct Connection {
    id: u32,
}

// ==================== Basic Bracket ====================

/// Example 1: The core acquire -> use -> release flow.
async fn example_basic_bracket() {
    println!("\n=== Example 1: Basic Bracket ===");

    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();

    let effect = bracket(
        // Acquire: open the connection
        pure::<_, CancelScope>(Connection { id: 7 }),
        // Release: always runs
        move |conn: Connection| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            println!("  closing connection {}", conn.id);
            async { Ok(()) }
        },
        // Use: borrow the connection to build the body
        |conn: &Connection| pure::<_, CancelScope>(format!("pinged {}", conn.id)),
    );

    let outcome = effect.run(&CancelScope::new()).await;
    println!("Outcome: {outcome:?}, releases: {}", releases.load(Ordering::SeqCst));
}

// ==================== Release on Failure ====================

/// Example 2: The body fails; the connection is still closed.
async fn example_release_on_failure() {
    println!("\n=== Example 2: Release On Failure ===");

    let outcome = bracket(
        pure::<_, CancelScope>(Connection { id: 8 }),
        |conn: Connection| {
            println!("  closing connection {}", conn.id);
            async { Ok(()) }
        },
        |_: &Connection| fail::<String, CancelScope>(Error::expected(502, "upstream died")),
    )
    .run(&CancelScope::new())
    .await;

    println!("Body failure propagates: {:?}", outcome.error());
}

// ==================== Failing Cleanup ====================

/// Example 3: What happens when release itself fails.
///
/// By default the release error is logged and the body outcome wins;
/// `ReleasePolicy::Surface` propagates it when the body succeeded.
async fn example_release_policy() {
    println!("\n=== Example 3: Release Policy ===");

    let leaky_release =
        |_: Connection| async { Err(Error::expected(9, "close failed")) };

    let logged = bracket(
        pure::<_, CancelScope>(Connection { id: 9 }),
        leaky_release,
        |conn: &Connection| pure::<_, CancelScope>(conn.id),
    )
    .run(&CancelScope::new())
    .await;
    println!("Log policy keeps the body outcome: {logged:?}");

    let surfaced = bracket(
        pure::<_, CancelScope>(Connection { id: 9 }),
        leaky_release,
        |conn: &Connection| pure::<_, CancelScope>(conn.id),
    )
    .with_release_policy(ReleasePolicy::Surface)
    .run(&CancelScope::new())
    .await;
    println!("Surface policy propagates the close error: {:?}", surfaced.error());
}

// ==================== Bracket Inside Retry ====================

/// Example 4: Each retry attempt acquires and releases its own resource.
async fn example_bracket_inside_retry() {
    println!("\n=== Example 4: Bracket Inside Retry ===");

    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();
    let flaky = millrace::testing::flaky::<CancelScope>(2);

    let effect = bracket(
        pure::<_, CancelScope>(Connection { id: 10 }),
        move |_: Connection| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        },
        move |_: &Connection| flaky.clone(),
    );

    let outcome = effect.retry(Schedule::recurs(5)).run(&CancelScope::new()).await;
    println!(
        "Outcome: {outcome:?}, releases: {} (one per attempt)",
        releases.load(Ordering::SeqCst)
    );
}

#[tokio::main]
async fn main() {
    example_basic_bracket().await;
    example_release_on_failure().await;
    example_release_policy().await;
    example_bracket_inside_retry().await;
}
