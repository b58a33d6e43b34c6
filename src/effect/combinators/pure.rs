//! Pure effect - wraps a value as an effect with no side effects.

use std::marker::PhantomData;

use crate::effect::trait_def::Effect;
use crate::outcome::Outcome;

/// A pure value wrapped as an Effect.
///
/// Zero-cost: no heap allocation. Because effects are re-invocable, the
/// value is cloned out on each run.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = pure::<_, ()>(42);
/// assert_eq!(effect.run(&()).await, Outcome::succeed(42));
/// ```
#[derive(Debug, Clone)]
pub struct Pure<T, Env> {
    value: T,
    _phantom: PhantomData<Env>,
}

impl<T, Env> Pure<T, Env> {
    /// Create a new Pure effect from a value.
    pub fn new(value: T) -> Self {
        Pure {
            value,
            _phantom: PhantomData,
        }
    }
}

impl<T, Env> Effect for Pure<T, Env>
where
    T: Clone + Send + Sync,
    Env: Clone + Send + Sync,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, _env: &Self::Env) -> Outcome<T> {
        Outcome::succeed(self.value.clone())
    }
}
