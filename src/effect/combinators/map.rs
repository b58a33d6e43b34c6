//! Map combinator - transforms the success value of an effect.

use crate::effect::trait_def::Effect;
use crate::outcome::Outcome;

/// Map combinator - transforms the success value.
///
/// Zero-cost: no heap allocation. The `Map` struct stores only the inner
/// effect and the transformation function.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = pure::<_, ()>(21).map(|x| x * 2);
/// assert_eq!(effect.run(&()).await, Outcome::succeed(42));
/// ```
pub struct Map<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for Map<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("inner", &"<effect>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, U> Effect for Map<Inner, F>
where
    Inner: Effect,
    F: Fn(Inner::Output) -> U + Send + Sync,
    U: Send,
{
    type Output = U;
    type Env = Inner::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<U> {
        self.inner.run(env).await.map(&self.f)
    }
}
