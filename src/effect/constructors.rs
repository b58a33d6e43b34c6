//! Constructor functions for creating effects.
//!
//! These functions provide ergonomic ways to create effects without
//! directly constructing the combinator types.

use std::future::Future;

use crate::cancel::HasCancel;
use crate::effect::combinators::{
    Attempt, AttemptAsync, Fail, FromAsync, FromFn, FromOutcome, Pure,
};
use crate::error::Error;
use crate::outcome::Outcome;

/// Create a pure effect that succeeds with the given value.
///
/// The value is cloned out on each run.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = pure::<_, ()>(42);
/// assert_eq!(effect.run(&()).await, Outcome::succeed(42));
/// ```
pub fn pure<T, Env>(value: T) -> Pure<T, Env>
where
    T: Clone + Send + Sync,
    Env: Clone + Send + Sync,
{
    Pure::new(value)
}

/// Create an effect that fails with the given error.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = fail::<i32, ()>(Error::expected(7, "boom"));
/// assert_eq!(effect.run(&()).await.code(), Some(7));
/// ```
pub fn fail<T, Env>(error: Error) -> Fail<T, Env>
where
    T: Send,
    Env: Clone + Send + Sync,
{
    Fail::new(error)
}

/// Lift an already-computed [`Outcome`] into an effect.
pub fn from_outcome<T, Env>(outcome: Outcome<T>) -> FromOutcome<T, Env>
where
    T: Clone + Send + Sync,
    Env: Clone + Send + Sync,
{
    FromOutcome::new(outcome)
}

/// Create an effect from a synchronous function.
///
/// The function receives a reference to the environment and returns an
/// `Outcome`. It is skipped (yielding `Fail(Cancelled)`) when the
/// environment is already cancelled.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = from_fn(|env: &AppEnv| Outcome::succeed(env.port * 2));
/// ```
pub fn from_fn<T, Env, F>(f: F) -> FromFn<F, Env>
where
    F: Fn(&Env) -> Outcome<T> + Send + Sync,
    T: Send,
    Env: HasCancel,
{
    FromFn::new(f)
}

/// Create an effect from an async function.
///
/// The function receives a reference to the environment and returns a
/// Future. The body races the environment's cancellation token.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = from_async(|_: &CancelScope| async { Outcome::succeed(42) });
/// ```
pub fn from_async<T, Env, F, Fut>(f: F) -> FromAsync<F, Env>
where
    F: Fn(&Env) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<T>> + Send,
    T: Send,
    Env: HasCancel,
{
    FromAsync::new(f)
}

/// Wrap a fallible synchronous function, capturing its error as an
/// `Exceptional` fault.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = attempt(|_: &CancelScope| std::fs::read_to_string("config.toml"));
/// ```
pub fn attempt<T, E, Env, F>(f: F) -> Attempt<F, Env>
where
    F: Fn(&Env) -> Result<T, E> + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
    T: Send,
    Env: HasCancel,
{
    Attempt::new(f)
}

/// Wrap a fallible async function, capturing its error as an
/// `Exceptional` fault.
pub fn attempt_async<T, E, Env, F, Fut>(f: F) -> AttemptAsync<F, Env>
where
    F: Fn(&Env) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
    T: Send,
    Env: HasCancel,
{
    AttemptAsync::new(f)
}
