//! AndThen combinator - chains a dependent effect.

use crate::effect::trait_def::Effect;
use crate::outcome::Outcome;

/// AndThen combinator - sequences a dependent effect after this one.
///
/// The continuation effect is built fresh on every run from the success
/// value; a failure short-circuits without invoking the continuation.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = pure::<_, ()>(21).and_then(|x| pure(x * 2));
/// assert_eq!(effect.run(&()).await, Outcome::succeed(42));
/// ```
pub struct AndThen<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for AndThen<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndThen")
            .field("inner", &"<effect>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, Next> Effect for AndThen<Inner, F>
where
    Inner: Effect,
    F: Fn(Inner::Output) -> Next + Send + Sync,
    Next: Effect<Env = Inner::Env>,
{
    type Output = Next::Output;
    type Env = Inner::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Next::Output> {
        match self.inner.run(env).await {
            Outcome::Succ(value) => (self.f)(value).run(env).await,
            Outcome::Fail(error) => Outcome::fail(error),
        }
    }
}
