//! FromFn effect - wraps a synchronous function as an effect.

use std::marker::PhantomData;

use crate::cancel::HasCancel;
use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// An effect backed by a synchronous function over the environment.
///
/// The function is not invoked when the environment's cancellation token
/// is already set; the run short-circuits to `Fail(Cancelled)` instead.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = from_fn(|env: &AppEnv| Outcome::succeed(env.port));
/// ```
pub struct FromFn<F, Env> {
    f: F,
    _phantom: PhantomData<Env>,
}

impl<F, Env> std::fmt::Debug for FromFn<F, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").field("f", &"<function>").finish()
    }
}

impl<F, Env> FromFn<F, Env> {
    /// Create a new FromFn effect.
    pub fn new(f: F) -> Self {
        FromFn {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<T, F, Env> Effect for FromFn<F, Env>
where
    F: Fn(&Env) -> Outcome<T> + Send + Sync,
    T: Send,
    Env: HasCancel,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<T> {
        if env.cancel_token().is_cancelled() {
            return Outcome::fail(Error::Cancelled);
        }
        (self.f)(env)
    }
}
