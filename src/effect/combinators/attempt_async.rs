//! AttemptAsync effect - the asynchronous sibling of `Attempt`.

use std::future::Future;
use std::marker::PhantomData;

use crate::cancel::HasCancel;
use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// An effect wrapping an asynchronous fallible function whose error is
/// captured as an `Exceptional` fault.
///
/// Cancellation behaves as in [`FromAsync`](super::FromAsync): already-set
/// tokens skip the work, and a token firing mid-body drops the future and
/// yields `Fail(Cancelled)`.
pub struct AttemptAsync<F, Env> {
    f: F,
    _phantom: PhantomData<Env>,
}

impl<F, Env> std::fmt::Debug for AttemptAsync<F, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptAsync")
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, Env> AttemptAsync<F, Env> {
    /// Create a new AttemptAsync effect.
    pub fn new(f: F) -> Self {
        AttemptAsync {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<T, E, F, Fut, Env> Effect for AttemptAsync<F, Env>
where
    F: Fn(&Env) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
    T: Send,
    Env: HasCancel,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<T> {
        let token = env.cancel_token();
        if token.is_cancelled() {
            return Outcome::fail(Error::Cancelled);
        }
        match token.run_until_cancelled((self.f)(env)).await {
            Some(Ok(value)) => Outcome::succeed(value),
            Some(Err(e)) => Outcome::fail(Error::exceptional(e)),
            None => Outcome::fail(Error::Cancelled),
        }
    }
}
