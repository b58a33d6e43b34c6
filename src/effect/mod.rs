//! Re-invocable effects with zero-cost combinators and opt-in boxing.
//!
//! An [`Effect`] is the crate's Computation: a lazy, re-invocable recipe
//! producing an [`Outcome`](crate::Outcome) when run against an
//! environment. Combinators return concrete types following the `futures`
//! crate pattern; use `.boxed()` when type erasure is needed.
//!
//! ```rust,ignore
//! use millrace::prelude::*;
//!
//! // No heap allocation - the whole chain is one nested concrete type
//! let effect = pure::<_, CancelScope>(42)
//!     .map(|x| x + 1)
//!     .and_then(|x| pure(x * 2))
//!     .catch_code(7, |_| pure(0));
//! ```
//!
//! The scheduling layer lives in [`crate::schedule`]; the `retry`/`repeat`/
//! `fold`/`reduce` methods on [`EffectExt`] are the usual way in.

pub mod boxed;
pub mod bracket;
pub mod combinators;
pub mod constructors;
pub mod ext;
pub mod prelude;
pub mod timeout;
mod trait_def;

// Re-export core trait
pub use trait_def::Effect;

// Re-export extension trait
pub use ext::EffectExt;

// Re-export boxed types
pub use boxed::{BoxFuture, BoxedEffect};

// Re-export all combinator types
pub use combinators::{
    AndThen, Attempt, AttemptAsync, ByCode, ByException, ByMessage, ByValue, Catch, CatchAll,
    ErrorPredicate, Fail, FromAsync, FromFn, FromOutcome, Map, Pure, Tap,
};

// Re-export bracket
pub use bracket::{bracket, Bracket, ReleasePolicy};

// Re-export timeout
pub use timeout::Timeout;

// Re-export constructors
pub use constructors::{attempt, attempt_async, fail, from_async, from_fn, from_outcome, pure};
