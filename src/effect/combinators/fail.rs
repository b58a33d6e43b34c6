//! Fail effect - an effect that always fails with a fixed error.

use std::marker::PhantomData;

use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// An effect that fails with the given error on every run.
///
/// Cloning the error preserves an `Exceptional` cause reference, so every
/// run of one `Fail` value produces equal errors.
#[derive(Debug, Clone)]
pub struct Fail<T, Env> {
    error: Error,
    _phantom: PhantomData<(fn() -> T, Env)>,
}

impl<T, Env> Fail<T, Env> {
    /// Create a new Fail effect from an error.
    pub fn new(error: Error) -> Self {
        Fail {
            error,
            _phantom: PhantomData,
        }
    }
}

impl<T, Env> Effect for Fail<T, Env>
where
    T: Send,
    Env: Clone + Send + Sync,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, _env: &Self::Env) -> Outcome<T> {
        Outcome::fail(self.error.clone())
    }
}
