//! BoxedEffect - type-erased effect for opt-in boxing.
//!
//! Use `BoxedEffect` when you need to:
//! - Store different effect types in a collection
//! - Return different effects from match arms
//! - Create recursive effect functions
//!
//! Boxing clones the environment into each run's future to achieve
//! `'static` lifetime. This is cheap when `Env` contains `Arc`-wrapped
//! resources. The erased effect stays re-invocable: the original effect is
//! held behind an `Arc` and shared across runs.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::effect::trait_def::Effect;
use crate::outcome::Outcome;

/// A boxed future that is Send + 'static.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased effect.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// // Store different effects in a Vec
/// let effects: Vec<BoxedEffect<i32, ()>> = vec![
///     pure(1).boxed(),
///     pure(2).map(|x| x * 2).boxed(),
/// ];
/// ```
pub struct BoxedEffect<T, Env> {
    run_fn: Box<dyn Fn(Env) -> BoxFuture<'static, Outcome<T>> + Send + Sync>,
}

impl<T, Env> std::fmt::Debug for BoxedEffect<T, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedEffect")
            .field("run_fn", &"<function>")
            .finish()
    }
}

impl<T, Env> BoxedEffect<T, Env>
where
    T: Send + 'static,
    Env: Clone + Send + Sync + 'static,
{
    /// Create a boxed effect from any effect.
    ///
    /// The environment is cloned on each run.
    pub fn new<Eff>(effect: Eff) -> Self
    where
        Eff: Effect<Output = T, Env = Env> + 'static,
    {
        let effect = Arc::new(effect);
        BoxedEffect {
            run_fn: Box::new(move |env: Env| {
                let effect = Arc::clone(&effect);
                Box::pin(async move { effect.run(&env).await })
            }),
        }
    }
}

impl<T, Env> Effect for BoxedEffect<T, Env>
where
    T: Send,
    Env: Clone + Send + Sync,
{
    type Output = T;
    type Env = Env;

    fn run(&self, env: &Env) -> impl Future<Output = Outcome<T>> + Send {
        (self.run_fn)(env.clone())
    }
}
