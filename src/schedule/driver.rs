//! The schedule driver: retry, repeat, fold and reduce.
//!
//! Each operation is a combinator struct implementing
//! [`Effect`](crate::Effect), so a driven effect is itself an effect and
//! composes like any other. One driver invocation is a single logical
//! thread of control: iterations run strictly sequentially, results are
//! observed in invocation order, and there is no concurrent fan-out.
//!
//! Cancellation is consulted at every suspension point: before each
//! invocation of the inner effect and during every inter-iteration sleep.
//! A cancellation observed anywhere terminates the loop with
//! `Fail(Cancelled)`, bypassing the remaining retry/repeat logic.
//!
//! # Attempt counting
//!
//! A schedule bounds *continuations*: `retry` with `Schedule::recurs(n)`
//! makes up to n+1 attempts (one run plus n retries), and `repeat`/`fold`
//! with the same schedule perform n+1 successful iterations before the
//! schedule is exhausted.

use std::time::{Duration, Instant};

use crate::cancel::{sleep_cancellable, HasCancel};
use crate::effect::Effect;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::schedule::{Schedule, ScheduleCursor};

/// Early-exit rule for the while/until driver variants.
///
/// `While` keeps going as long as the predicate holds; `Until` keeps
/// going as long as it does not. The two are not mere negations of each
/// other in `fold`: `while` tests *before* folding the element in,
/// `until` tests *after*.
enum StopRule<P> {
    Never,
    While(P),
    Until(P),
}

impl<P> StopRule<P> {
    fn stops<T>(&self, value: &T) -> bool
    where
        P: Fn(&T) -> bool,
    {
        match self {
            StopRule::Never => false,
            StopRule::While(p) => !p(value),
            StopRule::Until(p) => p(value),
        }
    }
}

/// Information about a failed attempt, passed to retry hooks.
#[derive(Debug, Clone)]
pub struct DriverEvent<'a> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The error from the failed attempt.
    pub error: &'a Error,
    /// Delay before the next attempt, or `None` when the schedule is
    /// exhausted.
    pub next_delay: Option<Duration>,
    /// Total elapsed time since the first attempt.
    pub elapsed: Duration,
}

// ============================================================================
// Retry
// ============================================================================

/// Retry combinator: re-runs a failing effect as the schedule dictates.
///
/// A success terminates immediately; retry never continues past one. On
/// schedule exhaustion the *last* observed failure is returned; callers
/// that want failure history can compose their own accumulation with
/// [`fold`].
pub struct Retry<Eff, P> {
    inner: Eff,
    schedule: Schedule,
    rule: StopRule<P>,
}

impl<Eff, P> std::fmt::Debug for Retry<Eff, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retry")
            .field("inner", &"<effect>")
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl<Eff, P> Effect for Retry<Eff, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    P: Fn(&Error) -> bool + Send + Sync,
{
    type Output = Eff::Output;
    type Env = Eff::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Eff::Output> {
        let token = env.cancel_token();
        let mut cursor = ScheduleCursor::new();
        loop {
            if token.is_cancelled() {
                return Outcome::fail(Error::Cancelled);
            }
            let error = match self.inner.run(env).await {
                Outcome::Succ(value) => return Outcome::succeed(value),
                Outcome::Fail(error) => error,
            };
            // A cancelled run is never retried.
            if error.is_cancelled() {
                return Outcome::fail(error);
            }
            if self.rule.stops(&error) {
                return Outcome::fail(error);
            }
            let decision = cursor.next(&self.schedule);
            if !decision.proceed {
                return Outcome::fail(error);
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(
                attempt = cursor.index(),
                delay_ms = decision.delay.as_millis() as u64,
                "attempt failed, retrying"
            );
            if let Err(cancelled) = sleep_cancellable(&token, decision.delay).await {
                return Outcome::fail(cancelled);
            }
        }
    }
}

/// Retry a failing effect as the schedule dictates.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let resilient = retry(
///     fetch_quote(),
///     Schedule::exponential(Duration::from_millis(100)).intersect(Schedule::recurs(3)),
/// );
/// ```
pub fn retry<Eff>(effect: Eff, schedule: Schedule) -> Retry<Eff, fn(&Error) -> bool>
where
    Eff: Effect,
    Eff::Env: HasCancel,
{
    Retry {
        inner: effect,
        schedule,
        rule: StopRule::Never,
    }
}

/// Retry while the predicate holds for the failure; a failure it rejects
/// is returned as-is.
pub fn retry_while<Eff, P>(effect: Eff, schedule: Schedule, predicate: P) -> Retry<Eff, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    P: Fn(&Error) -> bool + Send + Sync,
{
    Retry {
        inner: effect,
        schedule,
        rule: StopRule::While(predicate),
    }
}

/// Retry until the predicate holds for the failure; a failure it accepts
/// is returned as-is.
pub fn retry_until<Eff, P>(effect: Eff, schedule: Schedule, predicate: P) -> Retry<Eff, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    P: Fn(&Error) -> bool + Send + Sync,
{
    Retry {
        inner: effect,
        schedule,
        rule: StopRule::Until(predicate),
    }
}

// ============================================================================
// Retry with hooks
// ============================================================================

/// Retry combinator with an observation hook.
///
/// The hook runs synchronously after every failed attempt; keep it to
/// logging and metrics.
pub struct RetryWithHooks<Eff, H> {
    inner: Eff,
    schedule: Schedule,
    on_retry: H,
}

impl<Eff, H> std::fmt::Debug for RetryWithHooks<Eff, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryWithHooks")
            .field("inner", &"<effect>")
            .field("schedule", &self.schedule)
            .field("on_retry", &"<hook>")
            .finish()
    }
}

impl<Eff, H> Effect for RetryWithHooks<Eff, H>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    H: Fn(&DriverEvent<'_>) + Send + Sync,
{
    type Output = Eff::Output;
    type Env = Eff::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Eff::Output> {
        let token = env.cancel_token();
        let start = Instant::now();
        let mut cursor = ScheduleCursor::new();
        let mut attempt = 0u32;
        loop {
            if token.is_cancelled() {
                return Outcome::fail(Error::Cancelled);
            }
            let error = match self.inner.run(env).await {
                Outcome::Succ(value) => return Outcome::succeed(value),
                Outcome::Fail(error) => error,
            };
            if error.is_cancelled() {
                return Outcome::fail(error);
            }
            attempt += 1;
            let decision = cursor.next(&self.schedule);
            (self.on_retry)(&DriverEvent {
                attempt,
                error: &error,
                next_delay: decision.proceed.then_some(decision.delay),
                elapsed: start.elapsed(),
            });
            if !decision.proceed {
                return Outcome::fail(error);
            }
            if let Err(cancelled) = sleep_cancellable(&token, decision.delay).await {
                return Outcome::fail(cancelled);
            }
        }
    }
}

/// Retry with a hook invoked after every failed attempt.
pub fn retry_with_hooks<Eff, H>(
    effect: Eff,
    schedule: Schedule,
    on_retry: H,
) -> RetryWithHooks<Eff, H>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    H: Fn(&DriverEvent<'_>) + Send + Sync,
{
    RetryWithHooks {
        inner: effect,
        schedule,
        on_retry,
    }
}

// ============================================================================
// Repeat
// ============================================================================

/// Repeat combinator: re-runs a succeeding effect as the schedule
/// dictates.
///
/// The mirror image of [`Retry`]: the *first* failure propagates
/// unchanged, and schedule exhaustion (or an early-exit predicate)
/// returns the last success.
pub struct Repeat<Eff, P> {
    inner: Eff,
    schedule: Schedule,
    rule: StopRule<P>,
}

impl<Eff, P> std::fmt::Debug for Repeat<Eff, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repeat")
            .field("inner", &"<effect>")
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl<Eff, P> Effect for Repeat<Eff, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    type Output = Eff::Output;
    type Env = Eff::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Eff::Output> {
        let token = env.cancel_token();
        let mut cursor = ScheduleCursor::new();
        loop {
            if token.is_cancelled() {
                return Outcome::fail(Error::Cancelled);
            }
            let value = match self.inner.run(env).await {
                Outcome::Succ(value) => value,
                Outcome::Fail(error) => return Outcome::fail(error),
            };
            // Early exit returns the last success, not a failure.
            if self.rule.stops(&value) {
                return Outcome::succeed(value);
            }
            let decision = cursor.next(&self.schedule);
            if !decision.proceed {
                return Outcome::succeed(value);
            }
            if let Err(cancelled) = sleep_cancellable(&token, decision.delay).await {
                return Outcome::fail(cancelled);
            }
        }
    }
}

/// Repeat a succeeding effect as the schedule dictates.
pub fn repeat<Eff>(effect: Eff, schedule: Schedule) -> Repeat<Eff, fn(&Eff::Output) -> bool>
where
    Eff: Effect,
    Eff::Env: HasCancel,
{
    Repeat {
        inner: effect,
        schedule,
        rule: StopRule::Never,
    }
}

/// Repeat while the predicate holds for the success value.
pub fn repeat_while<Eff, P>(effect: Eff, schedule: Schedule, predicate: P) -> Repeat<Eff, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    Repeat {
        inner: effect,
        schedule,
        rule: StopRule::While(predicate),
    }
}

/// Repeat until the predicate holds for the success value.
pub fn repeat_until<Eff, P>(effect: Eff, schedule: Schedule, predicate: P) -> Repeat<Eff, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    Repeat {
        inner: effect,
        schedule,
        rule: StopRule::Until(predicate),
    }
}

// ============================================================================
// Fold / Reduce
// ============================================================================

/// Fold combinator: repeats an effect, threading an accumulator through
/// the successes.
///
/// Folding *absorbs* a terminating failure: the accumulated state is
/// returned as a success, the failure itself is not surfaced. Cancellation
/// is the exception: it bypasses the fold and fails with `Cancelled`.
///
/// The while/until variants differ on the stopping element: `while`
/// checks before folding it in and excludes it; `until` folds it in and
/// then checks, including it. The two predicate kinds answer different
/// questions ("keep going while true" vs "keep going until true"), which
/// is why the asymmetry is preserved.
pub struct Fold<Eff, S, F, P> {
    inner: Eff,
    schedule: Schedule,
    init: S,
    combine: F,
    rule: StopRule<P>,
}

impl<Eff, S, F, P> std::fmt::Debug for Fold<Eff, S, F, P>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fold")
            .field("inner", &"<effect>")
            .field("schedule", &self.schedule)
            .field("init", &self.init)
            .field("combine", &"<function>")
            .finish()
    }
}

impl<Eff, S, F, P> Effect for Fold<Eff, S, F, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    S: Clone + Send + Sync,
    F: Fn(S, Eff::Output) -> S + Send + Sync,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    type Output = S;
    type Env = Eff::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<S> {
        let token = env.cancel_token();
        let mut cursor = ScheduleCursor::new();
        let mut state = self.init.clone();
        loop {
            if token.is_cancelled() {
                return Outcome::fail(Error::Cancelled);
            }
            let value = match self.inner.run(env).await {
                Outcome::Succ(value) => value,
                Outcome::Fail(Error::Cancelled) => return Outcome::fail(Error::Cancelled),
                // Folding absorbs the terminating failure.
                Outcome::Fail(_) => return Outcome::succeed(state),
            };
            match &self.rule {
                StopRule::While(p) => {
                    if !p(&value) {
                        // Stopping element excluded.
                        return Outcome::succeed(state);
                    }
                    state = (self.combine)(state, value);
                }
                StopRule::Until(p) => {
                    let stop = p(&value);
                    // Stopping element included.
                    state = (self.combine)(state, value);
                    if stop {
                        return Outcome::succeed(state);
                    }
                }
                StopRule::Never => {
                    state = (self.combine)(state, value);
                }
            }
            let decision = cursor.next(&self.schedule);
            if !decision.proceed {
                return Outcome::succeed(state);
            }
            if let Err(cancelled) = sleep_cancellable(&token, decision.delay).await {
                return Outcome::fail(cancelled);
            }
        }
    }
}

/// Repeat an effect, folding its successes into an accumulator.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// // Sum n+1 samples
/// let total = fold(sample(), Schedule::recurs(9), 0u64, |acc, x| acc + x);
/// ```
pub fn fold<Eff, S, F>(
    effect: Eff,
    schedule: Schedule,
    init: S,
    combine: F,
) -> Fold<Eff, S, F, fn(&Eff::Output) -> bool>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    S: Clone + Send + Sync,
    F: Fn(S, Eff::Output) -> S + Send + Sync,
{
    Fold {
        inner: effect,
        schedule,
        init,
        combine,
        rule: StopRule::Never,
    }
}

/// Fold while the predicate holds; the stopping element is excluded from
/// the accumulated state.
pub fn fold_while<Eff, S, F, P>(
    effect: Eff,
    schedule: Schedule,
    init: S,
    combine: F,
    predicate: P,
) -> Fold<Eff, S, F, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    S: Clone + Send + Sync,
    F: Fn(S, Eff::Output) -> S + Send + Sync,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    Fold {
        inner: effect,
        schedule,
        init,
        combine,
        rule: StopRule::While(predicate),
    }
}

/// Fold until the predicate holds; the stopping element is included in
/// the accumulated state.
pub fn fold_until<Eff, S, F, P>(
    effect: Eff,
    schedule: Schedule,
    init: S,
    combine: F,
    predicate: P,
) -> Fold<Eff, S, F, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    S: Clone + Send + Sync,
    F: Fn(S, Eff::Output) -> S + Send + Sync,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    Fold {
        inner: effect,
        schedule,
        init,
        combine,
        rule: StopRule::Until(predicate),
    }
}

/// Fold with the accumulator type equal to the element type, seeded from
/// `Default`.
pub fn reduce<Eff, F>(
    effect: Eff,
    schedule: Schedule,
    combine: F,
) -> Fold<Eff, Eff::Output, F, fn(&Eff::Output) -> bool>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    Eff::Output: Default + Clone + Sync,
    F: Fn(Eff::Output, Eff::Output) -> Eff::Output + Send + Sync,
{
    fold(effect, schedule, Eff::Output::default(), combine)
}

/// Reduce while the predicate holds; the stopping element is excluded.
pub fn reduce_while<Eff, F, P>(
    effect: Eff,
    schedule: Schedule,
    combine: F,
    predicate: P,
) -> Fold<Eff, Eff::Output, F, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    Eff::Output: Default + Clone + Sync,
    F: Fn(Eff::Output, Eff::Output) -> Eff::Output + Send + Sync,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    fold_while(effect, schedule, Eff::Output::default(), combine, predicate)
}

/// Reduce until the predicate holds; the stopping element is included.
pub fn reduce_until<Eff, F, P>(
    effect: Eff,
    schedule: Schedule,
    combine: F,
    predicate: P,
) -> Fold<Eff, Eff::Output, F, P>
where
    Eff: Effect,
    Eff::Env: HasCancel,
    Eff::Output: Default + Clone + Sync,
    F: Fn(Eff::Output, Eff::Output) -> Eff::Output + Send + Sync,
    P: Fn(&Eff::Output) -> bool + Send + Sync,
{
    fold_until(effect, schedule, Eff::Output::default(), combine, predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelScope;
    use crate::effect::constructors::{fail, pure};
    use crate::testing::{counter, flaky};

    #[tokio::test]
    async fn retry_returns_the_first_success() {
        let outcome = retry(pure::<_, CancelScope>(42), Schedule::recurs(3))
            .run(&CancelScope::new())
            .await;
        assert_eq!(outcome, Outcome::succeed(42));
    }

    #[tokio::test]
    async fn retry_exhaustion_returns_the_last_failure() {
        let outcome = retry(
            fail::<i32, CancelScope>(Error::expected(7, "always")),
            Schedule::recurs(2),
        )
        .run(&CancelScope::new())
        .await;
        assert_eq!(outcome.unwrap_err(), Error::expected(7, "always"));
    }

    #[tokio::test]
    async fn retry_while_stops_on_a_rejected_error() {
        let effect = flaky::<CancelScope>(5);
        let outcome = retry_while(effect, Schedule::forever(), |e| e.code() != Some(503))
            .run(&CancelScope::new())
            .await;
        // flaky fails with code 503, which the predicate rejects at once
        assert_eq!(outcome.unwrap_err().code(), Some(503));
    }

    #[tokio::test]
    async fn retry_until_stops_when_the_predicate_accepts() {
        let effect = flaky::<CancelScope>(5);
        let outcome = retry_until(effect, Schedule::forever(), |e| e.code() == Some(503))
            .run(&CancelScope::new())
            .await;
        assert_eq!(outcome.unwrap_err().code(), Some(503));
    }

    #[tokio::test]
    async fn repeat_returns_the_last_success_on_exhaustion() {
        let effect = counter::<CancelScope>();
        let outcome = repeat(effect, Schedule::recurs(4))
            .run(&CancelScope::new())
            .await;
        // 5 iterations: 1, 2, 3, 4, 5
        assert_eq!(outcome, Outcome::succeed(5));
    }

    #[tokio::test]
    async fn repeat_propagates_the_first_failure_unchanged() {
        let outcome = repeat(
            fail::<i32, CancelScope>(Error::expected(1, "no")),
            Schedule::forever(),
        )
        .run(&CancelScope::new())
        .await;
        assert_eq!(outcome.unwrap_err(), Error::expected(1, "no"));
    }

    #[tokio::test]
    async fn fold_absorbs_a_terminating_failure() {
        // Succeeds with 1, 2, 3 then fails
        let effect = crate::testing::sequence::<CancelScope, _>(vec![
            Outcome::succeed(1),
            Outcome::succeed(2),
            Outcome::succeed(3),
            Outcome::fail(Error::expected(500, "done")),
        ]);
        let outcome = fold(effect, Schedule::forever(), 0i64, |acc, x| acc + i64::from(x))
            .run(&CancelScope::new())
            .await;
        assert_eq!(outcome, Outcome::succeed(6));
    }

    #[tokio::test]
    async fn reduce_seeds_from_default() {
        let effect = counter::<CancelScope>();
        let outcome = reduce(effect, Schedule::recurs(3), |acc, x| acc + x)
            .run(&CancelScope::new())
            .await;
        // default seed folded with 1, 2, 3, 4
        assert_eq!(outcome, Outcome::succeed(10));
    }

    #[tokio::test]
    async fn retry_with_hooks_sees_every_failed_attempt() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = seen.clone();
        let outcome = retry_with_hooks(
            fail::<i32, CancelScope>(Error::expected(7, "always")),
            Schedule::recurs(2),
            move |event| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
                assert_eq!(event.error.code(), Some(7));
            },
        )
        .run(&CancelScope::new())
        .await;
        assert!(outcome.is_fail());
        assert_eq!(seen.load(Ordering::SeqCst), 3, "1 initial + 2 retries");
    }

    #[tokio::test]
    async fn cancellation_mid_sleep_yields_cancelled() {
        let scope = CancelScope::new();
        let trigger = scope.clone();
        let effect = retry(
            fail::<i32, CancelScope>(Error::expected(7, "always")),
            Schedule::spaced(Duration::from_secs(60)),
        );
        let handle = tokio::spawn(async move { effect.run(&scope).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
        let outcome = handle.await.unwrap();
        assert_eq!(outcome.unwrap_err(), Error::Cancelled);
    }
}
