//! Integration tests for bracket resource management with real file I/O.
//!
//! These verify that the acquire/use/release pattern holds up against
//! actual async work: resources are always released exactly once, on
//! every exit path.

use millrace::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Helper to create a unique temp file path
fn temp_file_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("millrace_bracket_test_{name}.txt"))
}

#[tokio::test]
async fn bracket_cleans_up_temp_file_on_success() {
    let path = temp_file_path("success");
    let path_acquire = path.clone();
    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();

    let outcome = bracket(
        // Acquire: create the temp file
        attempt(move |_: &CancelScope| {
            std::fs::write(&path_acquire, "test content")?;
            Ok::<_, io::Error>(path_acquire.clone())
        }),
        // Release: delete it
        move |p: PathBuf| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if p.exists() {
                    std::fs::remove_file(&p).map_err(Error::exceptional)?;
                }
                Ok(())
            }
        },
        // Use: read it back
        |p: &PathBuf| {
            let p = p.clone();
            attempt(move |_: &CancelScope| std::fs::read_to_string(&p))
        },
    )
    .run(&CancelScope::new())
    .await;

    assert_eq!(outcome, Outcome::succeed("test content".to_string()));
    assert_eq!(releases.load(Ordering::SeqCst), 1);
    assert!(!path.exists(), "temp file should be deleted");
}

#[tokio::test]
async fn bracket_cleans_up_temp_file_on_use_failure() {
    let path = temp_file_path("use_failure");
    let path_acquire = path.clone();
    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();

    let outcome = bracket(
        attempt(move |_: &CancelScope| {
            std::fs::write(&path_acquire, "test content")?;
            Ok::<_, io::Error>(path_acquire.clone())
        }),
        move |p: PathBuf| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if p.exists() {
                    std::fs::remove_file(&p).map_err(Error::exceptional)?;
                }
                Ok(())
            }
        },
        |_: &PathBuf| fail::<String, CancelScope>(Error::expected(2, "use failed")),
    )
    .run(&CancelScope::new())
    .await;

    assert_eq!(outcome.unwrap_err(), Error::expected(2, "use failed"));
    assert_eq!(releases.load(Ordering::SeqCst), 1);
    assert!(!path.exists(), "temp file cleaned up despite the failure");
}

#[tokio::test]
async fn bracket_never_runs_the_body_when_acquire_fails() {
    let body_runs = Arc::new(AtomicUsize::new(0));
    let body_runs_clone = body_runs.clone();
    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();

    let outcome = bracket(
        fail::<i32, CancelScope>(Error::expected(1, "acquire failed")),
        move |_: i32| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        },
        move |_: &i32| {
            body_runs_clone.fetch_add(1, Ordering::SeqCst);
            pure::<_, CancelScope>(0)
        },
    )
    .run(&CancelScope::new())
    .await;

    assert_eq!(outcome.unwrap_err(), Error::expected(1, "acquire failed"));
    assert_eq!(body_runs.load(Ordering::SeqCst), 0, "no side effect from the body");
    assert_eq!(releases.load(Ordering::SeqCst), 0, "nothing acquired, nothing released");
}

#[tokio::test]
async fn bracket_releases_exactly_once_when_the_body_panics() {
    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();

    let outcome = bracket(
        pure::<_, CancelScope>(42),
        move |_: i32| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        },
        |_: &i32| from_fn(|_: &CancelScope| -> Outcome<i32> { panic!("body exploded") }),
    )
    .run(&CancelScope::new())
    .await;

    let error = outcome.unwrap_err();
    assert!(error.is_exceptional(), "the fault is reported");
    assert_eq!(releases.load(Ordering::SeqCst), 1, "released exactly once");
}

#[tokio::test]
async fn bracket_releases_when_cancelled_mid_body() {
    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();
    let scope = CancelScope::new();
    let trigger = scope.clone();

    let effect = bracket(
        pure::<_, CancelScope>(42),
        move |_: i32| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        },
        |_: &i32| {
            from_async(|env: &CancelScope| {
                let env = env.clone();
                async move {
                    env.token().cancelled().await;
                    Outcome::succeed(0)
                }
            })
        },
    );

    let handle = tokio::spawn({
        let scope = scope.clone();
        async move { effect.run(&scope).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    trigger.cancel();

    let outcome = handle.await.unwrap();
    assert_eq!(outcome.unwrap_err(), Error::Cancelled);
    assert_eq!(
        releases.load(Ordering::SeqCst),
        1,
        "release obligations survive cancellation"
    );
}

#[tokio::test]
async fn bracket_inside_retry_releases_once_per_attempt() {
    let releases = Arc::new(AtomicUsize::new(0));
    let releases_clone = releases.clone();
    let flaky = millrace::testing::flaky::<CancelScope>(2);

    let effect = bracket(
        pure::<_, CancelScope>("handle"),
        move |_: &'static str| {
            releases_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        },
        move |_: &&'static str| flaky.clone(),
    );

    let outcome = retry(effect, Schedule::recurs(5)).run(&CancelScope::new()).await;
    assert_eq!(outcome, Outcome::succeed(3));
    assert_eq!(
        releases.load(Ordering::SeqCst),
        3,
        "each of the three attempts acquired and released"
    );
}

#[tokio::test]
async fn surfaced_release_errors_replace_a_successful_body() {
    let outcome = bracket(
        pure::<_, CancelScope>(1),
        |_: i32| async { Err(Error::expected(9, "close failed")) },
        |v: &i32| pure::<_, CancelScope>(*v + 1),
    )
    .with_release_policy(ReleasePolicy::Surface)
    .run(&CancelScope::new())
    .await;

    assert_eq!(outcome.unwrap_err(), Error::expected(9, "close failed"));
}
