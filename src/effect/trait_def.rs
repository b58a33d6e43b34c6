//! Effect trait definition - the core abstraction for re-invocable effects.
//!
//! An [`Effect`] is a recipe, not a cached value: a deferred, possibly
//! asynchronous function from an environment to an [`Outcome`]. Running it
//! performs the work; running it again performs the work again. Nothing is
//! memoized and the value carries no mutable state of its own, which is
//! what lets the schedule drivers invoke one effect arbitrarily many times
//! and share it across concurrent driver calls.
//!
//! # Design
//!
//! The trait follows the `Future`/`Iterator` pattern: combinators return
//! concrete types (zero-cost), with `.boxed()` as the opt-in escape hatch
//! for type erasure. Unlike a one-shot design built on `FnOnce`, `run`
//! takes `&self` and the wrapped closures are `Fn`: "retry" means calling
//! `run` again on the same value, not rebuilding the effect through a
//! factory.
//!
//! # Cancellation
//!
//! Leaf effects that wrap user work ([`FromFn`](crate::effect::FromFn),
//! [`FromAsync`](crate::effect::FromAsync), the `attempt` variants) check
//! the environment's cancellation token first and short-circuit to
//! `Fail(Cancelled)` without performing the work when it is already set;
//! async bodies additionally race the token while suspended.

use std::future::Future;

use crate::outcome::Outcome;

/// A deferred, re-invocable, possibly-asynchronous unit of work producing
/// an [`Outcome`].
///
/// # Type Parameters
///
/// * `Output` - the success type produced by this effect
/// * `Env` - the environment the effect runs against; environments that
///   support cancellation implement [`HasCancel`](crate::HasCancel)
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// fn fetch_user(id: u64) -> impl Effect<Output = User, Env = AppEnv> {
///     from_async(move |env: &AppEnv| {
///         let db = env.db.clone();
///         async move { db.fetch_user(id).await }
///     })
/// }
/// ```
pub trait Effect: Sized + Send + Sync {
    /// The success type produced by this effect.
    type Output: Send;

    /// The environment type required to run this effect.
    type Env: Clone + Send + Sync;

    /// Execute one invocation of this effect against the environment.
    ///
    /// Invocations are independent: the effect may be run zero, one, or
    /// many times, sequentially or from concurrent callers.
    fn run(&self, env: &Self::Env) -> impl Future<Output = Outcome<Self::Output>> + Send;
}
