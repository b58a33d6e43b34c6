//! FromOutcome effect - lifts an already-computed Outcome into an effect.

use std::marker::PhantomData;

use crate::effect::trait_def::Effect;
use crate::outcome::Outcome;

/// An effect that replays a fixed [`Outcome`] on every run.
#[derive(Debug, Clone)]
pub struct FromOutcome<T, Env> {
    outcome: Outcome<T>,
    _phantom: PhantomData<Env>,
}

impl<T, Env> FromOutcome<T, Env> {
    /// Create a new FromOutcome effect.
    pub fn new(outcome: Outcome<T>) -> Self {
        FromOutcome {
            outcome,
            _phantom: PhantomData,
        }
    }
}

impl<T, Env> Effect for FromOutcome<T, Env>
where
    T: Clone + Send + Sync,
    Env: Clone + Send + Sync,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, _env: &Self::Env) -> Outcome<T> {
        self.outcome.clone()
    }
}
