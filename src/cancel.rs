//! Cooperative cancellation capability.
//!
//! Cancellation flows through the *environment*: an environment that
//! implements [`HasCancel`] exposes a [`CancelToken`] and can derive an
//! independent child scope via [`HasCancel::local_scope`]. Propagation is
//! one-directional: cancelling a parent cancels its children, cancelling a
//! child leaves the parent untouched.
//!
//! Leaf effects consult the token before running wrapped work and race
//! their async bodies against it; the schedule drivers do the same before
//! every invocation and during every inter-iteration sleep.
//!
//! [`CancelScope`] is a ready-made minimal environment for callers that
//! need nothing beyond cancellation. `()` also implements [`HasCancel`] as
//! the inert environment: its token is never cancelled, which is what an
//! environment-free effect means.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Handle for signalling and observing cancellation.
///
/// Cheap to clone; clones observe the same signal. Both the trigger side
/// and the observe side live on the token; an environment that hands out
/// its token hands out the ability to cancel the scope.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: CancellationToken,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation for this token and every child derived from it.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Has cancellation been signalled?
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Resolve when cancellation is signalled.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    /// Derive a child token.
    ///
    /// The child is cancelled when this token is cancelled; cancelling the
    /// child does not affect this token.
    pub fn child(&self) -> CancelToken {
        CancelToken {
            inner: self.inner.child_token(),
        }
    }

    /// Race a future against this token.
    ///
    /// Returns `None` if cancellation wins, dropping the future.
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        self.inner.run_until_cancelled(fut).await
    }
}

/// Sleep for `delay`, aborting with `Error::Cancelled` if the token fires
/// first.
pub(crate) async fn sleep_cancellable(token: &CancelToken, delay: Duration) -> Result<(), Error> {
    if delay.is_zero() {
        return Ok(());
    }
    match token.run_until_cancelled(tokio::time::sleep(delay)).await {
        Some(()) => Ok(()),
        None => Err(Error::Cancelled),
    }
}

/// The capability contract an environment satisfies to support cooperative
/// cancellation.
///
/// Environments are passed to effects by reference; there is no ambient
/// cancellation state. Custom environments typically hold a
/// [`CancelScope`] (or a [`CancelToken`] directly) next to their other
/// resources:
///
/// ```rust
/// use millrace::{CancelScope, CancelToken, HasCancel};
///
/// #[derive(Clone)]
/// struct AppEnv {
///     scope: CancelScope,
///     // db: Arc<DatabasePool>, ...
/// }
///
/// impl HasCancel for AppEnv {
///     fn cancel_token(&self) -> CancelToken {
///         self.scope.cancel_token()
///     }
///
///     fn local_scope(&self) -> Self {
///         AppEnv { scope: self.scope.local_scope() }
///     }
/// }
/// ```
pub trait HasCancel: Clone + Send + Sync {
    /// The cancellation signal for this environment.
    fn cancel_token(&self) -> CancelToken;

    /// Derive an environment whose cancellation scope is a child of this
    /// one: cancelled when this environment is cancelled, cancellable on
    /// its own without affecting this environment.
    fn local_scope(&self) -> Self;
}

/// A minimal environment carrying only a cancellation scope.
///
/// # Examples
///
/// ```rust
/// use millrace::CancelScope;
///
/// let scope = CancelScope::new();
/// let child = scope.child();
/// child.cancel();
/// assert!(child.is_cancelled());
/// assert!(!scope.is_cancelled(), "cancellation never propagates upward");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    token: CancelToken,
}

impl CancelScope {
    /// Create a root scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scope's token.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Trigger cancellation for this scope and its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Has this scope been cancelled (directly or via an ancestor)?
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Derive a child scope.
    pub fn child(&self) -> CancelScope {
        CancelScope {
            token: self.token.child(),
        }
    }
}

impl HasCancel for CancelScope {
    fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    fn local_scope(&self) -> Self {
        self.child()
    }
}

/// The inert environment for environment-free effects.
///
/// The returned token is fresh and never cancelled; nothing external can
/// cancel a `()`-environment run. Timeouts over `()` still work because
/// losing the race drops the body future.
impl HasCancel for () {
    fn cancel_token(&self) -> CancelToken {
        CancelToken::new()
    }

    fn local_scope(&self) -> Self {}
}
