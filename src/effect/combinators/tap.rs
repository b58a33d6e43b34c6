//! Tap combinator - observes the success value without consuming it.

use crate::effect::trait_def::Effect;
use crate::outcome::Outcome;

/// Tap combinator - runs a side-effecting observer on success.
///
/// The value passes through unchanged; failures skip the observer.
pub struct Tap<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for Tap<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tap")
            .field("inner", &"<effect>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F> Effect for Tap<Inner, F>
where
    Inner: Effect,
    F: Fn(&Inner::Output) + Send + Sync,
{
    type Output = Inner::Output;
    type Env = Inner::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Inner::Output> {
        let outcome = self.inner.run(env).await;
        if let Outcome::Succ(ref value) = outcome {
            (self.f)(value);
        }
        outcome
    }
}
