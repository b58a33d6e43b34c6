//! Prelude for the effect module.
//!
//! ```rust
//! use millrace::effect::prelude::*;
//! ```

pub use crate::cancel::{CancelScope, CancelToken, HasCancel};
pub use crate::effect::boxed::{BoxFuture, BoxedEffect};
pub use crate::effect::bracket::{bracket, Bracket, ReleasePolicy};
pub use crate::effect::constructors::{
    attempt, attempt_async, fail, from_async, from_fn, from_outcome, pure,
};
pub use crate::effect::ext::EffectExt;
pub use crate::effect::timeout::Timeout;
pub use crate::effect::Effect;
pub use crate::error::Error;
pub use crate::outcome::Outcome;
