//! Extension trait providing combinator methods for all Effects.
//!
//! The `EffectExt` trait is automatically implemented for all types that
//! implement `Effect`. It provides the combinator methods (`map`,
//! `and_then`, the `catch_*` family) and the schedule-driven operations
//! (`retry`, `repeat`, `fold`, `reduce` and their while/until variants).

use crate::cancel::HasCancel;
use crate::effect::boxed::BoxedEffect;
use crate::effect::combinators::{
    AndThen, ByCode, ByException, ByMessage, ByValue, Catch, CatchAll, ErrorPredicate, Map, Tap,
};
use crate::effect::timeout::Timeout;
use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::schedule::driver::{self, Fold, Repeat, Retry};
use crate::schedule::Schedule;
use std::time::Duration;

/// Extension trait providing combinator methods for all Effects.
///
/// Automatically implemented; never implement it yourself.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = pure::<_, CancelScope>(21)
///     .map(|x| x * 2)
///     .and_then(|x| pure(x + 1))
///     .retry(Schedule::recurs(3));
/// ```
pub trait EffectExt: Effect {
    /// Transform the success value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> U + Send + Sync,
        U: Send,
    {
        Map { inner: self, f }
    }

    /// Chain a dependent effect.
    ///
    /// If this effect succeeds, apply the function to produce the next
    /// effect. If this effect fails, propagate the error.
    fn and_then<Next, F>(self, f: F) -> AndThen<Self, F>
    where
        Next: Effect<Env = Self::Env>,
        F: Fn(Self::Output) -> Next + Send + Sync,
    {
        AndThen { inner: self, f }
    }

    /// Observe the success value without consuming it.
    fn tap<F>(self, f: F) -> Tap<Self, F>
    where
        F: Fn(&Self::Output) + Send + Sync,
    {
        Tap { inner: self, f }
    }

    /// Recover from failures matching a predicate.
    ///
    /// On failure, if the predicate holds, the failure is replaced by
    /// running the fallback built from it; otherwise it propagates
    /// unchanged. Chain several catches to try predicates in order.
    fn catch_if<P, H, Next>(self, predicate: P, handler: H) -> Catch<Self, P, H, Next>
    where
        P: ErrorPredicate,
        H: Fn(Error) -> Next + Send + Sync,
        Next: Effect<Output = Self::Output, Env = Self::Env>,
    {
        Catch::new(self, predicate, handler)
    }

    /// Recover from every failure.
    fn catch_all<H, Next>(self, handler: H) -> Catch<Self, CatchAll, H, Next>
    where
        H: Fn(Error) -> Next + Send + Sync,
        Next: Effect<Output = Self::Output, Env = Self::Env>,
    {
        Catch::new(self, CatchAll, handler)
    }

    /// Recover from `Expected` failures with the given code.
    fn catch_code<H, Next>(self, code: i32, handler: H) -> Catch<Self, ByCode, H, Next>
    where
        H: Fn(Error) -> Next + Send + Sync,
        Next: Effect<Output = Self::Output, Env = Self::Env>,
    {
        Catch::new(self, ByCode(code), handler)
    }

    /// Recover from `Expected` failures with the given message.
    fn catch_message<H, Next>(
        self,
        message: impl Into<String>,
        handler: H,
    ) -> Catch<Self, ByMessage, H, Next>
    where
        H: Fn(Error) -> Next + Send + Sync,
        Next: Effect<Output = Self::Output, Env = Self::Env>,
    {
        Catch::new(self, ByMessage(message.into()), handler)
    }

    /// Recover from failures equal to the given error.
    fn catch_error<H, Next>(self, error: Error, handler: H) -> Catch<Self, ByValue, H, Next>
    where
        H: Fn(Error) -> Next + Send + Sync,
        Next: Effect<Output = Self::Output, Env = Self::Env>,
    {
        Catch::new(self, ByValue(error), handler)
    }

    /// Recover from `Exceptional` failures whose cause satisfies the
    /// predicate.
    fn catch_exceptional<P, H, Next>(
        self,
        predicate: P,
        handler: H,
    ) -> Catch<Self, ByException<P>, H, Next>
    where
        P: Fn(&(dyn std::error::Error + Send + Sync)) -> bool + Send + Sync,
        H: Fn(Error) -> Next + Send + Sync,
        Next: Effect<Output = Self::Output, Env = Self::Env>,
    {
        Catch::new(self, ByException(predicate), handler)
    }

    /// Retry this effect on failure, as the schedule dictates.
    ///
    /// The schedule bounds *retries*: `Schedule::recurs(n)` allows n+1
    /// attempts. A success stops the loop immediately.
    fn retry(self, schedule: Schedule) -> Retry<Self, fn(&Error) -> bool>
    where
        Self::Env: HasCancel,
    {
        driver::retry(self, schedule)
    }

    /// Retry while the predicate holds for the failure.
    fn retry_while<P>(self, schedule: Schedule, predicate: P) -> Retry<Self, P>
    where
        P: Fn(&Error) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::retry_while(self, schedule, predicate)
    }

    /// Retry until the predicate holds for the failure.
    fn retry_until<P>(self, schedule: Schedule, predicate: P) -> Retry<Self, P>
    where
        P: Fn(&Error) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::retry_until(self, schedule, predicate)
    }

    /// Repeat this effect on success, as the schedule dictates.
    ///
    /// The first failure propagates unchanged; schedule exhaustion returns
    /// the last success.
    fn repeat(self, schedule: Schedule) -> Repeat<Self, fn(&Self::Output) -> bool>
    where
        Self::Env: HasCancel,
    {
        driver::repeat(self, schedule)
    }

    /// Repeat while the predicate holds for the success value.
    fn repeat_while<P>(self, schedule: Schedule, predicate: P) -> Repeat<Self, P>
    where
        P: Fn(&Self::Output) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::repeat_while(self, schedule, predicate)
    }

    /// Repeat until the predicate holds for the success value.
    fn repeat_until<P>(self, schedule: Schedule, predicate: P) -> Repeat<Self, P>
    where
        P: Fn(&Self::Output) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::repeat_until(self, schedule, predicate)
    }

    /// Repeat this effect, threading an accumulator through the successes.
    ///
    /// A terminating failure is absorbed: the fold returns the state
    /// accumulated so far.
    fn fold<S, F>(
        self,
        schedule: Schedule,
        init: S,
        combine: F,
    ) -> Fold<Self, S, F, fn(&Self::Output) -> bool>
    where
        S: Clone + Send + Sync,
        F: Fn(S, Self::Output) -> S + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::fold(self, schedule, init, combine)
    }

    /// Fold while the predicate holds; the stopping element is excluded.
    fn fold_while<S, F, P>(
        self,
        schedule: Schedule,
        init: S,
        combine: F,
        predicate: P,
    ) -> Fold<Self, S, F, P>
    where
        S: Clone + Send + Sync,
        F: Fn(S, Self::Output) -> S + Send + Sync,
        P: Fn(&Self::Output) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::fold_while(self, schedule, init, combine, predicate)
    }

    /// Fold until the predicate holds; the stopping element is included.
    fn fold_until<S, F, P>(
        self,
        schedule: Schedule,
        init: S,
        combine: F,
        predicate: P,
    ) -> Fold<Self, S, F, P>
    where
        S: Clone + Send + Sync,
        F: Fn(S, Self::Output) -> S + Send + Sync,
        P: Fn(&Self::Output) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::fold_until(self, schedule, init, combine, predicate)
    }

    /// Fold with the accumulator seeded from `Default`.
    fn reduce<F>(
        self,
        schedule: Schedule,
        combine: F,
    ) -> Fold<Self, Self::Output, F, fn(&Self::Output) -> bool>
    where
        Self::Output: Default + Clone + Sync,
        F: Fn(Self::Output, Self::Output) -> Self::Output + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::reduce(self, schedule, combine)
    }

    /// Reduce while the predicate holds; the stopping element is excluded.
    fn reduce_while<F, P>(
        self,
        schedule: Schedule,
        combine: F,
        predicate: P,
    ) -> Fold<Self, Self::Output, F, P>
    where
        Self::Output: Default + Clone + Sync,
        F: Fn(Self::Output, Self::Output) -> Self::Output + Send + Sync,
        P: Fn(&Self::Output) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::reduce_while(self, schedule, combine, predicate)
    }

    /// Reduce until the predicate holds; the stopping element is included.
    fn reduce_until<F, P>(
        self,
        schedule: Schedule,
        combine: F,
        predicate: P,
    ) -> Fold<Self, Self::Output, F, P>
    where
        Self::Output: Default + Clone + Sync,
        F: Fn(Self::Output, Self::Output) -> Self::Output + Send + Sync,
        P: Fn(&Self::Output) -> bool + Send + Sync,
        Self::Env: HasCancel,
    {
        driver::reduce_until(self, schedule, combine, predicate)
    }

    /// Bound this effect's wall-clock time.
    ///
    /// Runs the effect in a child cancellation scope raced against a
    /// sleep; if the sleep wins, the child scope is cancelled and the run
    /// fails with the timeout-class error.
    fn with_timeout(self, duration: Duration) -> Timeout<Self>
    where
        Self::Env: HasCancel,
    {
        Timeout::new(self, duration)
    }

    /// Convert to a boxed effect for type erasure.
    ///
    /// Use this to store effects in collections, return different effect
    /// types from match arms, or write recursive effects.
    fn boxed(self) -> BoxedEffect<Self::Output, Self::Env>
    where
        Self: 'static,
        Self::Output: 'static,
        Self::Env: 'static,
    {
        BoxedEffect::new(self)
    }
}

impl<Eff: Effect> EffectExt for Eff {}
