//! # Millrace
//!
//! > *"The channel that drives the wheel"*
//!
//! A Rust library for cancellation-aware effect scheduling: run a
//! deferred, possibly-failing unit of work repeatedly under a declarative
//! policy (retry on failure, repeat on success, fold while accumulating),
//! with guaranteed resource release and predicate-gated error recovery.
//!
//! ## Philosophy
//!
//! **Millrace** keeps policy and work apart:
//! - **Mill** = the [`Effect`]: a lazy, re-invocable recipe for work
//! - **Race** = the [`Schedule`]: pure data describing when to run it again
//!
//! The schedule driver interprets one against the other, consulting the
//! environment's cancellation token before every invocation and during
//! every wait.
//!
//! ## Quick Example
//!
//! ```rust
//! use millrace::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! // An effect that fails twice, then succeeds
//! let effect = millrace::testing::flaky::<CancelScope>(2);
//!
//! // Retry with exponential backoff, at most 5 retries
//! let schedule = Schedule::exponential(Duration::from_millis(1))
//!     .intersect(Schedule::recurs(5));
//!
//! let outcome = effect.retry(schedule).run(&CancelScope::new()).await;
//! assert_eq!(outcome, Outcome::succeed(3)); // succeeded on the third attempt
//! # });
//! ```
//!
//! ## Guarantees
//!
//! - A schedule is immutable and reusable across any number of concurrent
//!   runs; per-run state lives in a run-local cursor.
//! - Drivers never overlap two invocations of the same effect; results
//!   are observed strictly in invocation order.
//! - [`bracket`](effect::bracket()) releases an acquired resource exactly
//!   once on every exit path: success, failure, panic, or cancellation.
//! - Cancellation is cooperative and flows through the environment
//!   ([`HasCancel`]); it is never treated as a domain failure.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cancel;
pub mod effect;
pub mod error;
pub mod outcome;
pub mod schedule;
pub mod testing;

// Re-exports
pub use cancel::{CancelScope, CancelToken, HasCancel};
pub use effect::{Effect, EffectExt};
pub use error::Error;
pub use outcome::Outcome;
pub use schedule::{Decision, DriverEvent, Schedule, ScheduleCursor};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancel::{CancelScope, CancelToken, HasCancel};
    pub use crate::effect::bracket::{bracket, ReleasePolicy};
    pub use crate::effect::constructors::{
        attempt, attempt_async, fail, from_async, from_fn, from_outcome, pure,
    };
    pub use crate::effect::{BoxedEffect, Effect, EffectExt};
    pub use crate::error::Error;
    pub use crate::outcome::Outcome;
    pub use crate::schedule::driver::{
        fold, fold_until, fold_while, reduce, reduce_until, reduce_while, repeat, repeat_until,
        repeat_while, retry, retry_until, retry_while, retry_with_hooks,
    };
    pub use crate::schedule::{Decision, DriverEvent, Schedule};
}
