//! Catch combinator - predicate-gated failure recovery.
//!
//! A catch wraps an effect so that, on failure, a matching error is
//! replaced by running a fallback effect built from that error. Non-matching
//! failures propagate unchanged. Chained catches are tried in the order
//! they were attached; the first matching predicate wins and the rest are
//! never consulted.

use std::marker::PhantomData;

use crate::effect::trait_def::Effect;
use crate::error::Error;
use crate::outcome::Outcome;

/// A predicate over [`Error`] deciding whether a catch applies.
///
/// Implemented for all `Fn(&Error) -> bool` closures; the named
/// implementations below back the specialized `catch_*` constructors.
pub trait ErrorPredicate: Send + Sync {
    /// Does this catch apply to the error?
    fn matches(&self, error: &Error) -> bool;
}

impl<F> ErrorPredicate for F
where
    F: Fn(&Error) -> bool + Send + Sync,
{
    fn matches(&self, error: &Error) -> bool {
        self(error)
    }
}

/// Matches every failure, including cancellation.
///
/// Note that recovering from `Cancelled` in a live environment is
/// self-limiting: the fallback runs against the same cancelled scope, so
/// its own leaf effects short-circuit to `Cancelled` again.
#[derive(Debug, Clone, Copy)]
pub struct CatchAll;

impl ErrorPredicate for CatchAll {
    fn matches(&self, _error: &Error) -> bool {
        true
    }
}

/// Matches `Expected` failures with the given code. Never matches
/// `Exceptional` or `Cancelled`.
#[derive(Debug, Clone, Copy)]
pub struct ByCode(pub i32);

impl ErrorPredicate for ByCode {
    fn matches(&self, error: &Error) -> bool {
        error.code() == Some(self.0)
    }
}

/// Matches `Expected` failures with the given message. Never matches
/// `Exceptional` or `Cancelled`.
#[derive(Debug, Clone)]
pub struct ByMessage(pub String);

impl ErrorPredicate for ByMessage {
    fn matches(&self, error: &Error) -> bool {
        error.message() == Some(self.0.as_str())
    }
}

/// Matches by exact error equality (structural for `Expected`,
/// cause-identity for `Exceptional`).
#[derive(Debug, Clone)]
pub struct ByValue(pub Error);

impl ErrorPredicate for ByValue {
    fn matches(&self, error: &Error) -> bool {
        *error == self.0
    }
}

/// Matches `Exceptional` failures whose cause satisfies the inner
/// predicate. Never matches `Expected` or `Cancelled`.
pub struct ByException<P>(pub P);

impl<P> std::fmt::Debug for ByException<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ByException").field(&"<predicate>").finish()
    }
}

impl<P> ErrorPredicate for ByException<P>
where
    P: Fn(&(dyn std::error::Error + Send + Sync)) -> bool + Send + Sync,
{
    fn matches(&self, error: &Error) -> bool {
        match error.cause() {
            Some(cause) => (self.0)(cause),
            None => false,
        }
    }
}

/// Catch combinator - replaces matching failures with a fallback effect.
///
/// # Example
///
/// ```rust,ignore
/// use millrace::prelude::*;
///
/// let effect = fetch_from_cache(id)
///     .catch_code(CACHE_MISS, move |_| fetch_from_db(id));
/// ```
pub struct Catch<Inner, P, H, Next> {
    pub(crate) inner: Inner,
    pub(crate) predicate: P,
    pub(crate) handler: H,
    pub(crate) _marker: PhantomData<fn() -> Next>,
}

impl<Inner, P, H, Next> std::fmt::Debug for Catch<Inner, P, H, Next> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catch")
            .field("inner", &"<effect>")
            .field("predicate", &"<predicate>")
            .field("handler", &"<handler>")
            .finish()
    }
}

impl<Inner, P, H, Next> Catch<Inner, P, H, Next> {
    /// Create a new Catch around an effect.
    pub fn new(inner: Inner, predicate: P, handler: H) -> Self {
        Catch {
            inner,
            predicate,
            handler,
            _marker: PhantomData,
        }
    }
}

impl<Inner, P, H, Next> Effect for Catch<Inner, P, H, Next>
where
    Inner: Effect,
    P: ErrorPredicate,
    H: Fn(Error) -> Next + Send + Sync,
    Next: Effect<Output = Inner::Output, Env = Inner::Env>,
{
    type Output = Inner::Output;
    type Env = Inner::Env;

    async fn run(&self, env: &Self::Env) -> Outcome<Inner::Output> {
        match self.inner.run(env).await {
            Outcome::Succ(value) => Outcome::succeed(value),
            Outcome::Fail(error) => {
                if self.predicate.matches(&error) {
                    (self.handler)(error).run(env).await
                } else {
                    Outcome::fail(error)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn by_code_only_matches_expected() {
        let p = ByCode(42);
        assert!(p.matches(&Error::expected(42, "anything")));
        assert!(!p.matches(&Error::expected(7, "anything")));
        assert!(!p.matches(&Error::exceptional(io::Error::other("42"))));
        assert!(!p.matches(&Error::Cancelled));
    }

    #[test]
    fn by_message_only_matches_expected() {
        let p = ByMessage("boom".to_string());
        assert!(p.matches(&Error::expected(1, "boom")));
        assert!(!p.matches(&Error::expected(1, "bang")));
        assert!(!p.matches(&Error::Cancelled));
    }

    #[test]
    fn by_exception_never_matches_expected_or_cancelled() {
        let p = ByException(|cause: &(dyn std::error::Error + Send + Sync)| {
            cause.to_string().contains("disk")
        });
        assert!(p.matches(&Error::exceptional(io::Error::other("disk on fire"))));
        assert!(!p.matches(&Error::exceptional(io::Error::other("net down"))));
        assert!(!p.matches(&Error::expected(1, "disk on fire")));
        assert!(!p.matches(&Error::Cancelled));
    }

    #[test]
    fn by_value_matches_exact_errors() {
        let original = Error::exceptional(io::Error::other("fault"));
        let p = ByValue(original.clone());
        assert!(p.matches(&original));
        assert!(!p.matches(&Error::exceptional(io::Error::other("fault"))));
    }

    #[test]
    fn catch_all_is_unconditional() {
        assert!(CatchAll.matches(&Error::Cancelled));
        assert!(CatchAll.matches(&Error::expected(0, "")));
    }
}
