//! Bracket pattern for safe resource management.
//!
//! The bracket pattern ensures resources are released on every exit path:
//! normal completion, failure, a panicking body, or cancellation. This
//! module provides:
//!
//! - [`bracket`] - acquire/use/release with guaranteed cleanup
//! - [`ReleasePolicy`] - what to do when release itself fails
//!
//! # Example
//!
//! ```rust,ignore
//! use millrace::prelude::*;
//!
//! let effect = bracket(
//!     open_connection(),
//!     |conn| async move { conn.close().await },
//!     |conn| fetch_user(conn.id()),
//! );
//! ```

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// What to do when the release step fails.
///
/// Under either policy a release failure never masks a failed body: the
/// body's failure wins. The policies differ only when the body succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleasePolicy {
    /// Log the release error and return the body outcome regardless.
    #[default]
    Log,
    /// Propagate the release error when the body succeeded.
    Surface,
}

/// Bracket combinator type for resource management.
///
/// Three phases:
/// 1. **Acquire**: obtain the resource. A failure here propagates verbatim
///    and the release step never runs (nothing was acquired).
/// 2. **Use**: build an effect from a reference to the resource and run
///    it. Panics in the body are caught and surface as `Exceptional`.
/// 3. **Release**: always runs exactly once after the use phase, whatever
///    its outcome was.
///
/// Cooperative cancellation during the body produces `Fail(Cancelled)`
/// and still releases the resource.
pub struct Bracket<Acquire, Use, Release> {
    acquire: Acquire,
    use_fn: Use,
    release: Release,
    policy: ReleasePolicy,
}

impl<Acquire, Use, Release> std::fmt::Debug for Bracket<Acquire, Use, Release> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bracket")
            .field("acquire", &"<effect>")
            .field("use_fn", &"<function>")
            .field("release", &"<function>")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<Acquire, Use, Release> Bracket<Acquire, Use, Release> {
    /// Create a new Bracket with the default release policy.
    pub fn new(acquire: Acquire, use_fn: Use, release: Release) -> Self {
        Bracket {
            acquire,
            use_fn,
            release,
            policy: ReleasePolicy::default(),
        }
    }

    /// Override what happens when release fails.
    pub fn with_release_policy(mut self, policy: ReleasePolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn log_release_error(error: &Error) {
    #[cfg(feature = "tracing")]
    tracing::warn!("resource release failed: {error}");
    #[cfg(not(feature = "tracing"))]
    eprintln!("resource release failed: {error}");
}

impl<Acquire, Use, Release, UseEffect, R, T, Env, RelFut> Effect for Bracket<Acquire, Use, Release>
where
    Acquire: Effect<Output = R, Env = Env>,
    Use: Fn(&R) -> UseEffect + Send + Sync,
    UseEffect: Effect<Output = T, Env = Env>,
    Release: Fn(R) -> RelFut + Send + Sync,
    RelFut: Future<Output = Result<(), Error>> + Send,
    R: Send + Sync,
    T: Send,
    Env: Clone + Send + Sync,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<T> {
        // Acquire failure propagates verbatim; nothing to release.
        let resource = match self.acquire.run(env).await {
            Outcome::Succ(r) => r,
            Outcome::Fail(e) => return Outcome::fail(e),
        };

        let body = AssertUnwindSafe((self.use_fn)(&resource).run(env))
            .catch_unwind()
            .await;

        // Release runs exactly once, whatever the body did.
        let release_result = (self.release)(resource).await;

        match body {
            Ok(outcome) => match release_result {
                Ok(()) => outcome,
                Err(release_error) => match (&outcome, self.policy) {
                    (Outcome::Succ(_), ReleasePolicy::Surface) => Outcome::fail(release_error),
                    _ => {
                        log_release_error(&release_error);
                        outcome
                    }
                },
            },
            Err(panic) => {
                if let Err(release_error) = release_result {
                    log_release_error(&release_error);
                }
                Outcome::fail(Error::from_panic(panic))
            }
        }
    }
}

/// Bracket pattern for safe resource management.
///
/// Acquires a resource, uses it, and guarantees release even on error,
/// panic, or cancellation. Release errors are logged and the body outcome
/// is returned; use [`Bracket::with_release_policy`] to surface them
/// instead.
///
/// # Type Parameters
///
/// * `Acquire` - effect that acquires the resource
/// * `Release` - function that releases the resource (receives ownership)
/// * `Use` - function that uses the resource (receives a reference)
pub fn bracket<Acquire, Use, Release, UseEffect, R, T, Env, RelFut>(
    acquire: Acquire,
    release: Release,
    use_fn: Use,
) -> Bracket<Acquire, Use, Release>
where
    Acquire: Effect<Output = R, Env = Env>,
    Use: Fn(&R) -> UseEffect + Send + Sync,
    UseEffect: Effect<Output = T, Env = Env>,
    Release: Fn(R) -> RelFut + Send + Sync,
    RelFut: Future<Output = Result<(), Error>> + Send,
    R: Send + Sync,
    T: Send,
    Env: Clone + Send + Sync,
{
    Bracket::new(acquire, use_fn, release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelScope;
    use crate::effect::constructors::{fail, from_async, from_fn, pure};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn bracket_returns_error_on_acquire_failure() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();

        let outcome = bracket(
            fail::<i32, ()>(Error::expected(1, "acquire failed")),
            move |_: i32| {
                released_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            |val: &i32| pure::<_, ()>(*val * 2),
        )
        .run(&())
        .await;

        assert_eq!(outcome.unwrap_err(), Error::expected(1, "acquire failed"));
        assert_eq!(
            released.load(Ordering::SeqCst),
            0,
            "release must NOT run when acquire fails"
        );
    }

    #[tokio::test]
    async fn bracket_releases_exactly_once_on_success() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();

        let outcome = bracket(
            pure::<_, ()>(42),
            move |_: i32| {
                released_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            |val: &i32| pure::<_, ()>(*val * 2),
        )
        .run(&())
        .await;

        assert_eq!(outcome, Outcome::succeed(84));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bracket_releases_on_use_failure() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();

        let outcome = bracket(
            pure::<_, ()>(42),
            move |_: i32| {
                released_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            |_: &i32| fail::<i32, ()>(Error::expected(2, "use failed")),
        )
        .run(&())
        .await;

        assert_eq!(outcome.unwrap_err(), Error::expected(2, "use failed"));
        assert_eq!(released.load(Ordering::SeqCst), 1, "release must run on failure");
    }

    #[tokio::test]
    async fn bracket_releases_on_panicking_body_and_reports_the_fault() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();

        let outcome = bracket(
            pure::<_, CancelScope>(42),
            move |_: i32| {
                released_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            |_: &i32| {
                from_fn(|_: &CancelScope| -> Outcome<i32> { panic!("body blew up") })
            },
        )
        .run(&CancelScope::new())
        .await;

        let error = outcome.unwrap_err();
        assert!(error.is_exceptional());
        assert!(format!("{error}").contains("body blew up"));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bracket_releases_when_the_body_is_cancelled() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();
        let scope = CancelScope::new();
        let trigger = scope.clone();

        let outcome = bracket(
            pure::<_, CancelScope>(7),
            move |_: i32| {
                released_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            move |_: &i32| {
                let trigger = trigger.clone();
                from_async(move |env: &CancelScope| {
                    let env = env.clone();
                    trigger.cancel();
                    async move {
                        env.token().cancelled().await;
                        Outcome::succeed(0)
                    }
                })
            },
        )
        .run(&scope)
        .await;

        assert_eq!(outcome.unwrap_err(), Error::Cancelled);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn release_error_is_logged_and_body_outcome_wins_by_default() {
        let outcome = bracket(
            pure::<_, ()>(42),
            |_: i32| async { Err(Error::expected(9, "release failed")) },
            |val: &i32| pure::<_, ()>(*val * 2),
        )
        .run(&())
        .await;

        assert_eq!(outcome, Outcome::succeed(84));
    }

    #[tokio::test]
    async fn release_error_surfaces_under_the_surface_policy() {
        let outcome = bracket(
            pure::<_, ()>(42),
            |_: i32| async { Err(Error::expected(9, "release failed")) },
            |val: &i32| pure::<_, ()>(*val * 2),
        )
        .with_release_policy(ReleasePolicy::Surface)
        .run(&())
        .await;

        assert_eq!(outcome.unwrap_err(), Error::expected(9, "release failed"));
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[tokio::test]
    async fn release_errors_are_logged_under_the_default_policy() {
        let _ = bracket(
            pure::<_, ()>(1),
            |_: i32| async { Err(Error::expected(9, "close failed")) },
            |v: &i32| pure::<_, ()>(*v),
        )
        .run(&())
        .await;

        assert!(logs_contain("resource release failed"));
    }

    #[tokio::test]
    async fn release_error_never_masks_a_body_failure() {
        let outcome = bracket(
            pure::<_, ()>(42),
            |_: i32| async { Err(Error::expected(9, "release failed")) },
            |_: &i32| fail::<i32, ()>(Error::expected(2, "use failed")),
        )
        .with_release_policy(ReleasePolicy::Surface)
        .run(&())
        .await;

        assert_eq!(outcome.unwrap_err(), Error::expected(2, "use failed"));
    }
}
