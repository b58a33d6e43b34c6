//! Timeout combinator - bounds an effect's wall-clock time.

use std::time::Duration;

use crate::cancel::HasCancel;
use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// Bounded-time wrapper around an effect.
///
/// The inner effect runs in a child scope derived from the environment
/// via [`HasCancel::local_scope`], racing a sleep. If the sleep wins the
/// child scope is cancelled (the parent is unaffected) and the run fails
/// with [`Error::timeout`]. A cancellation of the *parent* during the
/// race surfaces as `Fail(Cancelled)`, not as a timeout.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = slow_fetch().with_timeout(Duration::from_millis(250));
/// match effect.run(&scope).await {
///     Outcome::Fail(e) if e.is_timeout() => { /* took too long */ }
///     other => { /* ... */ }
/// }
/// ```
pub struct Timeout<Inner> {
    inner: Inner,
    duration: Duration,
}

impl<Inner> std::fmt::Debug for Timeout<Inner> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeout")
            .field("inner", &"<effect>")
            .field("duration", &self.duration)
            .finish()
    }
}

impl<Inner> Timeout<Inner> {
    /// Create a new Timeout around an effect.
    pub fn new(inner: Inner, duration: Duration) -> Self {
        Timeout { inner, duration }
    }
}

impl<Inner> Effect for Timeout<Inner>
where
    Inner: Effect,
    Inner::Env: HasCancel,
{
    type Output = Inner::Output;
    type Env = Inner::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Inner::Output> {
        let child = env.local_scope();
        tokio::select! {
            outcome = self.inner.run(&child) => outcome,
            () = tokio::time::sleep(self.duration) => {
                child.cancel_token().cancel();
                Outcome::fail(Error::timeout(self.duration))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelScope;
    use crate::effect::constructors::{from_async, pure};
    use crate::effect::ext::EffectExt;

    #[tokio::test]
    async fn fast_effects_pass_through() {
        let effect = pure::<_, CancelScope>(42).with_timeout(Duration::from_secs(1));
        let outcome = effect.run(&CancelScope::new()).await;
        assert_eq!(outcome, Outcome::succeed(42));
    }

    #[tokio::test]
    async fn slow_effects_fail_with_the_timeout_error() {
        let effect = from_async(|_: &CancelScope| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Outcome::succeed(42)
        })
        .with_timeout(Duration::from_millis(10));

        let outcome = effect.run(&CancelScope::new()).await;
        assert!(outcome.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn timeout_cancels_the_child_scope_only() {
        let scope = CancelScope::new();
        let effect = from_async(|env: &CancelScope| {
            let env = env.clone();
            async move {
                env.token().cancelled().await;
                Outcome::succeed(())
            }
        })
        .with_timeout(Duration::from_millis(10));

        let outcome = effect.run(&scope).await;
        assert!(outcome.unwrap_err().is_timeout());
        assert!(!scope.is_cancelled(), "parent scope must stay live");
    }

    #[tokio::test]
    async fn parent_cancellation_wins_over_timeout() {
        let scope = CancelScope::new();
        scope.cancel();
        let effect = from_async(|_: &CancelScope| async { Outcome::succeed(42) })
            .with_timeout(Duration::from_secs(1));
        let outcome = effect.run(&scope).await;
        assert_eq!(outcome.unwrap_err(), Error::Cancelled);
    }
}
