//! Attempt effect - wraps a fallible synchronous function, capturing its
//! error as `Exceptional`.

use std::marker::PhantomData;

use crate::cancel::HasCancel;
use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// An effect wrapping a synchronous function whose error is captured as
/// an `Exceptional` fault.
///
/// This is the constructor for "a function that may throw": the thrown
/// value is any `std::error::Error`, and it surfaces as
/// `Error::Exceptional` rather than as a coded domain failure.
pub struct Attempt<F, Env> {
    f: F,
    _phantom: PhantomData<Env>,
}

impl<F, Env> std::fmt::Debug for Attempt<F, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attempt").field("f", &"<function>").finish()
    }
}

impl<F, Env> Attempt<F, Env> {
    /// Create a new Attempt effect.
    pub fn new(f: F) -> Self {
        Attempt {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<T, E, F, Env> Effect for Attempt<F, Env>
where
    F: Fn(&Env) -> Result<T, E> + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
    T: Send,
    Env: HasCancel,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<T> {
        if env.cancel_token().is_cancelled() {
            return Outcome::fail(Error::Cancelled);
        }
        match (self.f)(env) {
            Ok(value) => Outcome::succeed(value),
            Err(e) => Outcome::fail(Error::exceptional(e)),
        }
    }
}
