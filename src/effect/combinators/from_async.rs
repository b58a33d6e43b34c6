//! FromAsync effect - wraps an asynchronous function as an effect.

use std::future::Future;
use std::marker::PhantomData;

use crate::cancel::HasCancel;
use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// An effect backed by an asynchronous function over the environment.
///
/// Two cancellation points: the work is skipped entirely when the token is
/// already set, and a token firing while the body is suspended aborts the
/// run with `Fail(Cancelled)` (the body future is dropped).
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = from_async(|env: &AppEnv| {
///     let db = env.db.clone();
///     async move { db.ping().await }
/// });
/// ```
pub struct FromAsync<F, Env> {
    f: F,
    _phantom: PhantomData<Env>,
}

impl<F, Env> std::fmt::Debug for FromAsync<F, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromAsync")
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, Env> FromAsync<F, Env> {
    /// Create a new FromAsync effect.
    pub fn new(f: F) -> Self {
        FromAsync {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<T, F, Fut, Env> Effect for FromAsync<F, Env>
where
    F: Fn(&Env) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<T>> + Send,
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
            Some(outcome) => outcome,
            None => Outcome::fail(Error::Cancelled),
        }
    }
}
