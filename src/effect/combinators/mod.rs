//! Zero-cost combinator types for effect composition.
//!
//! This module contains the concrete types returned by effect constructors
//! and combinator methods. They don't allocate and compose by nesting, the
//! way `futures` adapters do.
//!
//! Most users won't name these types directly; use the constructors in
//! [`crate::effect::constructors`] and the methods on
//! [`EffectExt`](crate::effect::EffectExt) instead.

mod and_then;
mod attempt;
mod attempt_async;
mod catch;
mod fail;
mod from_async;
mod from_fn;
mod from_outcome;
mod map;
mod pure;
mod tap;

pub use and_then::AndThen;
pub use attempt::Attempt;
pub use attempt_async::AttemptAsync;
pub use catch::{ByCode, ByException, ByMessage, ByValue, Catch, CatchAll, ErrorPredicate};
pub use fail::Fail;
pub use from_async::FromAsync;
pub use from_fn::FromFn;
pub use from_outcome::FromOutcome;
pub use map::Map;
pub use pure::Pure;
pub use tap::Tap;
