//! Deterministic effects for exercising schedules and drivers in tests.
//!
//! These helpers close over shared counters, which is exactly the state
//! sharing the core leaves to whatever an effect closes over. They are
//! deterministic and clock-free, so tests built on them don't flake.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cancel::HasCancel;
use crate::effect::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// Error code used by [`flaky`] failures.
pub const FLAKY_CODE: i32 = 503;

/// An effect that fails a fixed number of times, then succeeds.
///
/// Failures carry [`FLAKY_CODE`]; the eventual success value is the
/// 1-indexed invocation number. Use [`Flaky::invocations`] to assert how
/// many times a driver actually ran it.
#[derive(Debug, Clone)]
pub struct Flaky<Env> {
    failures: u32,
    calls: Arc<AtomicU32>,
    _phantom: PhantomData<Env>,
}

/// Fail `failures` times, then succeed with the invocation number.
pub fn flaky<Env: HasCancel>(failures: u32) -> Flaky<Env> {
    Flaky {
        failures,
        calls: Arc::new(AtomicU32::new(0)),
        _phantom: PhantomData,
    }
}

impl<Env> Flaky<Env> {
    /// How many times the effect has been invoked so far.
    pub fn invocations(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<Env> Effect for Flaky<Env>
where
    Env: HasCancel,
{
    type Output = u32;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<u32> {
        if env.cancel_token().is_cancelled() {
            return Outcome::fail(Error::Cancelled);
        }
        let invocation = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if invocation <= self.failures {
            Outcome::fail(Error::expected(FLAKY_CODE, format!("flaky failure {invocation}")))
        } else {
            Outcome::succeed(invocation)
        }
    }
}

/// An effect that succeeds with 1, 2, 3, ... across successive
/// invocations.
#[derive(Debug, Clone)]
pub struct Counter<Env> {
    calls: Arc<AtomicU32>,
    _phantom: PhantomData<Env>,
}

/// Succeed with the 1-indexed invocation number.
pub fn counter<Env: HasCancel>() -> Counter<Env> {
    Counter {
        calls: Arc::new(AtomicU32::new(0)),
        _phantom: PhantomData,
    }
}

impl<Env> Counter<Env> {
    /// How many times the effect has been invoked so far.
    pub fn invocations(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<Env> Effect for Counter<Env>
where
    Env: HasCancel,
{
    type Output = u32;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<u32> {
        if env.cancel_token().is_cancelled() {
            return Outcome::fail(Error::Cancelled);
        }
        Outcome::succeed(self.calls.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// An effect that replays a fixed script of outcomes.
///
/// Invocations past the end of the script repeat its final outcome.
#[derive(Debug, Clone)]
pub struct Sequence<T, Env> {
    script: Arc<Vec<Outcome<T>>>,
    cursor: Arc<AtomicUsize>,
    _phantom: PhantomData<Env>,
}

/// Replay `script` across successive invocations.
///
/// # Panics
///
/// Panics when the script is empty.
pub fn sequence<Env: HasCancel, T>(script: Vec<Outcome<T>>) -> Sequence<T, Env> {
    assert!(!script.is_empty(), "sequence script must not be empty");
    Sequence {
        script: Arc::new(script),
        cursor: Arc::new(AtomicUsize::new(0)),
        _phantom: PhantomData,
    }
}

impl<T, Env> Effect for Sequence<T, Env>
where
    T: Clone + Send + Sync,
    Env: HasCancel,
{
    type Output = T;
    type Env = Env;

    async fn run(&self, env: &Self::Env) -> Outcome<T> {
        if env.cancel_token().is_cancelled() {
            return Outcome::fail(Error::Cancelled);
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.script[index.min(self.script.len() - 1)].clone()
    }
}
