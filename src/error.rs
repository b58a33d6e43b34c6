//! The error taxonomy shared by every effect in the crate.
//!
//! Every failing effect fails with [`Error`]. The taxonomy is closed on
//! purpose: schedules, catches and brackets all need to agree on what a
//! failure looks like, and in particular on which failures are *domain*
//! failures (retryable, catchable) and which are cancellation (neither).
//!
//! - [`Error::Expected`]: a domain-level failure with a stable code and
//!   message, safe to pattern-match on.
//! - [`Error::Exceptional`]: wraps an unanticipated host fault.
//! - [`Error::Cancelled`]: the run was cancelled. Distinct from both other
//!   kinds; the shape-testing catch predicates never match it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A failure produced by running an effect.
///
/// # Equality
///
/// Two errors are equal iff they have the same kind and:
/// - `Expected`: the same code and message (structural),
/// - `Exceptional`: the same wrapped cause *reference* (`Arc::ptr_eq`),
/// - `Cancelled`: always.
///
/// Cloning preserves the wrapped cause reference, so a cloned
/// `Exceptional` error compares equal to its original.
///
/// # Examples
///
/// ```rust
/// use millrace::Error;
///
/// let e = Error::expected(42, "flaky upstream");
/// assert_eq!(e.code(), Some(42));
/// assert!(e.is_expected());
/// assert!(!e.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub enum Error {
    /// Domain-level failure carrying a stable code and message.
    Expected {
        /// Stable, caller-defined error code.
        code: i32,
        /// Human-readable description.
        message: String,
    },
    /// An unanticipated host fault.
    Exceptional(Arc<dyn std::error::Error + Send + Sync>),
    /// The run was cancelled before it produced a value.
    Cancelled,
}

/// Carrier for a panic payload captured inside a bracket body.
#[derive(Debug)]
struct Panicked(String);

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.0)
    }
}

impl std::error::Error for Panicked {}

impl Error {
    /// Reserved code used by the timeout wrapper.
    ///
    /// Matching on this code is stable; the duration only appears in the
    /// message.
    pub const TIMEOUT_CODE: i32 = -1000;

    /// Create an `Expected` error from a code and message.
    pub fn expected(code: i32, message: impl Into<String>) -> Self {
        Error::Expected {
            code,
            message: message.into(),
        }
    }

    /// Wrap a host fault as an `Exceptional` error.
    ///
    /// Each call produces a fresh cause reference; clone the resulting
    /// `Error` if you need two values that compare equal.
    pub fn exceptional(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Exceptional(Arc::new(cause))
    }

    /// Wrap an already-shared host fault as an `Exceptional` error.
    pub fn exceptional_shared(cause: Arc<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Exceptional(cause)
    }

    /// Convert a captured panic payload into an `Exceptional` error.
    ///
    /// Extracts the panic message when the payload is a `&str` or `String`.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic payload of unknown type".to_string()
        };
        Error::Exceptional(Arc::new(Panicked(message)))
    }

    /// The timeout-class error produced when a bounded-time wrapper fires.
    pub fn timeout(duration: Duration) -> Self {
        Error::Expected {
            code: Self::TIMEOUT_CODE,
            message: format!("operation timed out after {duration:?}"),
        }
    }

    /// Returns true for `Expected` errors.
    pub fn is_expected(&self) -> bool {
        matches!(self, Error::Expected { .. })
    }

    /// Returns true for `Exceptional` errors.
    pub fn is_exceptional(&self) -> bool {
        matches!(self, Error::Exceptional(_))
    }

    /// Returns true for `Cancelled`.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Returns true when this is the timeout-class `Expected` error.
    pub fn is_timeout(&self) -> bool {
        self.code() == Some(Self::TIMEOUT_CODE)
    }

    /// The code of an `Expected` error.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Expected { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The message of an `Expected` error.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Expected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The wrapped cause of an `Exceptional` error.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            Error::Exceptional(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Error::Expected { code, message },
                Error::Expected {
                    code: other_code,
                    message: other_message,
                },
            ) => code == other_code && message == other_message,
            (Error::Exceptional(cause), Error::Exceptional(other_cause)) => {
                Arc::ptr_eq(cause, other_cause)
            }
            (Error::Cancelled, Error::Cancelled) => true,
            _ => false,
        }
    }
}

impl Eq for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Expected { code, message } => write!(f, "error {code}: {message}"),
            Error::Exceptional(cause) => write!(f, "{cause}"),
            Error::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Exceptional(cause) => Some(cause.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn expected_equality_is_structural() {
        assert_eq!(Error::expected(7, "boom"), Error::expected(7, "boom"));
        assert_ne!(Error::expected(7, "boom"), Error::expected(8, "boom"));
        assert_ne!(Error::expected(7, "boom"), Error::expected(7, "bang"));
    }

    #[test]
    fn exceptional_equality_is_by_cause_reference() {
        let a = Error::exceptional(io::Error::other("disk on fire"));
        let b = Error::exceptional(io::Error::other("disk on fire"));
        assert_ne!(a, b, "distinct wraps of equal faults are not equal");
        assert_eq!(a, a.clone(), "cloning preserves the cause reference");
    }

    #[test]
    fn cancelled_is_distinct_from_domain_failures() {
        assert_eq!(Error::Cancelled, Error::Cancelled);
        assert_ne!(Error::Cancelled, Error::expected(0, "cancelled"));
        assert!(!Error::Cancelled.is_expected());
        assert!(!Error::Cancelled.is_exceptional());
    }

    #[test]
    fn from_panic_extracts_str_and_string_payloads() {
        let e = Error::from_panic(Box::new("kaboom"));
        assert!(e.is_exceptional());
        assert!(format!("{e}").contains("kaboom"));

        let e = Error::from_panic(Box::new("owned kaboom".to_string()));
        assert!(format!("{e}").contains("owned kaboom"));
    }

    #[test]
    fn timeout_uses_the_reserved_code() {
        let e = Error::timeout(Duration::from_millis(10));
        assert!(e.is_timeout());
        assert_eq!(e.code(), Some(Error::TIMEOUT_CODE));
        assert!(e.message().unwrap().contains("timed out"));
    }

    #[test]
    fn display_formats_each_kind() {
        assert_eq!(format!("{}", Error::expected(7, "boom")), "error 7: boom");
        assert_eq!(format!("{}", Error::Cancelled), "cancelled");
        let e = Error::exceptional(io::Error::other("disk on fire"));
        assert!(format!("{e}").contains("disk on fire"));
    }

    #[test]
    fn source_exposes_the_wrapped_cause() {
        use std::error::Error as _;
        let e = Error::exceptional(io::Error::other("fault"));
        assert!(e.source().is_some());
        assert!(Error::expected(1, "x").source().is_none());
    }
}
