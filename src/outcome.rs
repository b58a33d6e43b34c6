//! The two-state result algebra consumed by drivers, brackets and catches.
//!
//! [`Outcome`] is the crate's `Result`: a success value or an [`Error`],
//! never both. Effects produce one per invocation; it is consumed
//! immediately and never mutated.

use crate::error::Error;

/// The outcome of running an effect: a success value or a typed error.
///
/// # Examples
///
/// ```rust
/// use millrace::{Error, Outcome};
///
/// let doubled = Outcome::succeed(21).map(|x| x * 2);
/// assert_eq!(doubled, Outcome::succeed(42));
///
/// let failed: Outcome<i32> = Outcome::fail(Error::expected(7, "boom"));
/// // and_then short-circuits without invoking the continuation
/// assert_eq!(failed.and_then(|x| Outcome::succeed(x + 1)).code(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<A> {
    /// The effect produced a value.
    Succ(A),
    /// The effect failed.
    Fail(Error),
}

impl<A> Outcome<A> {
    /// Create a successful outcome.
    pub fn succeed(value: A) -> Self {
        Outcome::Succ(value)
    }

    /// Create a failed outcome.
    pub fn fail(error: Error) -> Self {
        Outcome::Fail(error)
    }

    /// Returns true on success.
    pub fn is_succ(&self) -> bool {
        matches!(self, Outcome::Succ(_))
    }

    /// Returns true on failure.
    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail(_))
    }

    /// Returns true when the outcome is a cancellation failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Fail(Error::Cancelled))
    }

    /// Transform the success value, passing failures through untouched.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Outcome<B> {
        match self {
            Outcome::Succ(value) => Outcome::Succ(f(value)),
            Outcome::Fail(error) => Outcome::Fail(error),
        }
    }

    /// Chain a dependent outcome.
    ///
    /// Short-circuits on `Fail` without invoking the continuation.
    pub fn and_then<B>(self, f: impl FnOnce(A) -> Outcome<B>) -> Outcome<B> {
        match self {
            Outcome::Succ(value) => f(value),
            Outcome::Fail(error) => Outcome::Fail(error),
        }
    }

    /// Collapse the outcome by handling both variants.
    pub fn match_with<B>(self, on_succ: impl FnOnce(A) -> B, on_fail: impl FnOnce(Error) -> B) -> B {
        match self {
            Outcome::Succ(value) => on_succ(value),
            Outcome::Fail(error) => on_fail(error),
        }
    }

    /// The success value, if any.
    pub fn ok(self) -> Option<A> {
        match self {
            Outcome::Succ(value) => Some(value),
            Outcome::Fail(_) => None,
        }
    }

    /// A reference to the error, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Succ(_) => None,
            Outcome::Fail(error) => Some(error),
        }
    }

    /// The code of an `Expected` failure, if any.
    pub fn code(&self) -> Option<i32> {
        self.error().and_then(Error::code)
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<A, Error> {
        self.into()
    }

    /// Unwrap the success value, panicking on failure.
    ///
    /// Test helper; production code should `match` or `and_then`.
    #[track_caller]
    pub fn unwrap(self) -> A {
        match self {
            Outcome::Succ(value) => value,
            Outcome::Fail(error) => panic!("called `Outcome::unwrap()` on a failure: {error}"),
        }
    }

    /// Unwrap the error, panicking on success.
    ///
    /// Test helper; production code should `match` or inspect `error()`.
    #[track_caller]
    pub fn unwrap_err(self) -> Error {
        match self {
            Outcome::Succ(_) => panic!("called `Outcome::unwrap_err()` on a success"),
            Outcome::Fail(error) => error,
        }
    }
}

impl<A> From<Result<A, Error>> for Outcome<A> {
    fn from(result: Result<A, Error>) -> Self {
        match result {
            Ok(value) => Outcome::Succ(value),
            Err(error) => Outcome::Fail(error),
        }
    }
}

impl<A> From<Outcome<A>> for Result<A, Error> {
    fn from(outcome: Outcome<A>) -> Self {
        match outcome {
            Outcome::Succ(value) => Ok(value),
            Outcome::Fail(error) => Err(error),
        }
    }
}
