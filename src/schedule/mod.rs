//! Declarative schedules: when to continue and how long to wait.
//!
//! A [`Schedule`] is pure data: it describes iteration behavior but never
//! executes it, which makes schedules easy to test, clone, inspect, and
//! share across any number of concurrent driver invocations. All run state
//! lives in a per-invocation [`ScheduleCursor`]; the schedule itself is
//! never mutated.
//!
//! A schedule is a pure function from an iteration index to a
//! [`Decision`]: whether to proceed, and how long to wait first.
//!
//! # Quick Start
//!
//! ```rust
//! use millrace::Schedule;
//! use std::time::Duration;
//!
//! // Five iterations, exponential backoff capped at two seconds
//! let schedule = Schedule::exponential(Duration::from_millis(100))
//!     .intersect(Schedule::recurs(5))
//!     .max_delay(Duration::from_secs(2));
//!
//! let d = schedule.decide(0);
//! assert!(d.proceed);
//! assert_eq!(d.delay, Duration::from_millis(100));
//! assert!(!schedule.decide(5).proceed);
//! ```
//!
//! # Composition
//!
//! - [`Schedule::union`]: proceeds while *either* input proceeds; waits
//!   the shorter of the two delays while both are live.
//! - [`Schedule::intersect`]: proceeds only while *both* proceed; waits
//!   the longer delay.
//! - [`Schedule::max_delay`]: caps every delay.
//! - [`Schedule::jittered`]: adds proportional randomness (requires the
//!   `jitter` feature; without it, delays pass through unchanged).

mod cursor;
pub mod driver;

pub use cursor::ScheduleCursor;
pub use driver::DriverEvent;

use std::time::Duration;

/// One step of a schedule: whether to continue and how long to wait.
///
/// The delay is awaited *after* the current result has been evaluated and
/// *before* the next invocation, never before the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    /// Continue with another iteration?
    pub proceed: bool,
    /// How long to wait before it.
    pub delay: Duration,
}

impl Decision {
    /// A proceeding decision with the given delay.
    pub fn proceed_after(delay: Duration) -> Self {
        Decision {
            proceed: true,
            delay,
        }
    }

    /// A halting decision.
    pub fn halt() -> Self {
        Decision {
            proceed: false,
            delay: Duration::ZERO,
        }
    }
}

/// An immutable, reusable description of "how many iterations and how
/// long to wait between them".
///
/// `Default` is [`Schedule::forever`], the schedule the driver entry
/// points assume when the caller has no bound in mind.
///
/// # Bounds
///
/// `recurs(n)` bounds the number of *continuations*, not invocations:
/// driving `retry` with `recurs(n)` makes up to n+1 attempts, and driving
/// `repeat` with it performs n+1 successful iterations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Kind {
    Forever,
    Recurs(u32),
    Spaced(Duration),
    Linear { base: Duration },
    Exponential { base: Duration },
    Fibonacci { base: Duration },
    Union(Box<Schedule>, Box<Schedule>),
    Intersect(Box<Schedule>, Box<Schedule>),
    MaxDelay(Box<Schedule>, Duration),
    Jittered(Box<Schedule>, f64),
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::forever()
    }
}

impl Schedule {
    /// Proceed on every index with no delay.
    pub fn forever() -> Self {
        Schedule { kind: Kind::Forever }
    }

    /// Proceed for the first `n` decisions, then halt.
    pub fn recurs(n: u32) -> Self {
        Schedule {
            kind: Kind::Recurs(n),
        }
    }

    /// Proceed on every index, waiting a fixed delay each time.
    pub fn spaced(delay: Duration) -> Self {
        Schedule {
            kind: Kind::Spaced(delay),
        }
    }

    /// Proceed on every index with linearly growing delay: base * (index + 1).
    pub fn linear(base: Duration) -> Self {
        Schedule {
            kind: Kind::Linear { base },
        }
    }

    /// Proceed on every index with doubling delay: base * 2^index.
    ///
    /// Usually combined with `recurs` or `max_delay`:
    ///
    /// ```rust
    /// use millrace::Schedule;
    /// use std::time::Duration;
    ///
    /// let backoff = Schedule::exponential(Duration::from_millis(100))
    ///     .intersect(Schedule::recurs(8));
    /// ```
    pub fn exponential(base: Duration) -> Self {
        Schedule {
            kind: Kind::Exponential { base },
        }
    }

    /// Proceed on every index with Fibonacci delay: base * fib(index + 1).
    pub fn fibonacci(base: Duration) -> Self {
        Schedule {
            kind: Kind::Fibonacci { base },
        }
    }

    /// Proceed while *either* schedule proceeds.
    ///
    /// While both are live the delay is the shorter of the two; once one
    /// halts, the survivor's delay is used.
    pub fn union(self, other: Schedule) -> Self {
        Schedule {
            kind: Kind::Union(Box::new(self), Box::new(other)),
        }
    }

    /// Proceed only while *both* schedules proceed; delay is the longer.
    pub fn intersect(self, other: Schedule) -> Self {
        Schedule {
            kind: Kind::Intersect(Box::new(self), Box::new(other)),
        }
    }

    /// Cap every delay at `cap`.
    pub fn max_delay(self, cap: Duration) -> Self {
        Schedule {
            kind: Kind::MaxDelay(Box::new(self), cap),
        }
    }

    /// Add ±`factor` proportional randomness to every delay.
    ///
    /// The factor is clamped to `0.0..=1.0`. Requires the `jitter`
    /// feature; without it, delays pass through unchanged.
    pub fn jittered(self, factor: f64) -> Self {
        Schedule {
            kind: Kind::Jittered(Box::new(self), factor.clamp(0.0, 1.0)),
        }
    }

    /// The decision for iteration `index` (0-based).
    ///
    /// Pure: calling this never changes the schedule, and equal indices
    /// yield equal decisions (up to jitter).
    pub fn decide(&self, index: u32) -> Decision {
        match &self.kind {
            Kind::Forever => Decision::proceed_after(Duration::ZERO),
            Kind::Recurs(n) => {
                if index < *n {
                    Decision::proceed_after(Duration::ZERO)
                } else {
                    Decision::halt()
                }
            }
            Kind::Spaced(delay) => Decision::proceed_after(*delay),
            Kind::Linear { base } => {
                Decision::proceed_after(base.saturating_mul(index.saturating_add(1)))
            }
            Kind::Exponential { base } => {
                Decision::proceed_after(base.saturating_mul(2u32.saturating_pow(index)))
            }
            Kind::Fibonacci { base } => {
                Decision::proceed_after(base.saturating_mul(fibonacci(index.saturating_add(1))))
            }
            Kind::Union(left, right) => {
                let l = left.decide(index);
                let r = right.decide(index);
                match (l.proceed, r.proceed) {
                    (true, true) => Decision::proceed_after(l.delay.min(r.delay)),
                    (true, false) => l,
                    (false, true) => r,
                    (false, false) => Decision::halt(),
                }
            }
            Kind::Intersect(left, right) => {
                let l = left.decide(index);
                let r = right.decide(index);
                if l.proceed && r.proceed {
                    Decision::proceed_after(l.delay.max(r.delay))
                } else {
                    Decision::halt()
                }
            }
            Kind::MaxDelay(inner, cap) => {
                let d = inner.decide(index);
                Decision {
                    proceed: d.proceed,
                    delay: d.delay.min(*cap),
                }
            }
            Kind::Jittered(inner, factor) => {
                let d = inner.decide(index);
                Decision {
                    proceed: d.proceed,
                    delay: apply_jitter(d.delay, *factor),
                }
            }
        }
    }
}

#[cfg(feature = "jitter")]
fn apply_jitter(delay: Duration, factor: f64) -> Duration {
    use rand::Rng;
    let mut rng = rand::rng();
    let base_millis = delay.as_millis() as f64;
    let spread = base_millis * factor;
    let min = (base_millis - spread).max(0.0);
    let max = base_millis + spread;
    if min >= max {
        return delay;
    }
    Duration::from_millis(rng.random_range(min..=max) as u64)
}

#[cfg(not(feature = "jitter"))]
fn apply_jitter(delay: Duration, _factor: f64) -> Duration {
    delay
}

/// Calculate the nth Fibonacci number.
fn fibonacci(n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    let mut a = 0u32;
    let mut b = 1u32;
    for _ in 1..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    b
}
