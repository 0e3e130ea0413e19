// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carrying a scope across polls.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use crate::logger::Logger;

/// A [`Future`] wrapper that keeps a logger entity active across polls.
///
/// Executors migrate tasks between threads and interleave tasks on one
/// thread, so a thread-local binding set once would be lost or would leak
/// into neighbours. `Scoped` instead re-binds its entity before every poll
/// of the inner future and restores the previous binding after, which makes
/// the scope follow the logical task wherever it resumes.
///
/// Usually constructed through [`ScopeExt::scoped`] or
/// [`ScopeExt::bound_to`]; `Scoped::new` binds an exact entity without
/// deriving a child, which is what [`Logger::dispatch`](crate::Logger::dispatch)
/// uses to propagate the dispatcher's own entity into spawned work.
///
/// # Examples
///
/// ```rust
/// use scopelog::{fields, InMemoryTransport, Logger, Scoped, Settings};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let transport = Arc::new(InMemoryTransport::new());
/// let logger = Logger::new(Settings::new(transport.clone()));
/// logger.update_meta(fields! {"job": "refresh"});
///
/// Scoped::new(logger, async {
///     // current() here is the wrapped entity, even after awaits
///     scopelog::current().info(fields! {"msg": "working"});
/// })
/// .await;
///
/// assert_eq!(transport.drain_records()[0].meta["job"], "refresh");
/// # }
/// ```
pub struct Scoped<F>(Logger, F);

impl<F> Scoped<F> {
    /// Wraps `f` to run with `logger` bound as the active entity.
    pub fn new(logger: Logger, f: F) -> Self {
        Self(logger, f)
    }
}

impl<F> Future for Scoped<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        let (logger, fut) = unsafe {
            //safety: we never move out of the wrapped future once pinned
            let d = self.get_unchecked_mut();
            (d.0.clone(), Pin::new_unchecked(&mut d.1))
        };
        let _restore = super::bind_active(logger);
        fut.poll(cx)
    }
}

/// Scope-entry combinators for futures.
pub trait ScopeExt: Future + Sized {
    /// Wraps `self` to run in a new scope.
    ///
    /// The scope's entity is forked from the innermost entity active where
    /// `scoped` is *called* (or from the global logger), mirroring
    /// [`scope`](super::scope) for asynchronous regions.
    fn scoped(self) -> Scoped<Self> {
        Scoped::new(super::current().fork(), self)
    }

    /// Wraps `self` to run with `logger` itself as the active entity.
    ///
    /// No child is derived; use this to carry an existing entity into
    /// spawned work.
    fn bound_to(self, logger: Logger) -> Scoped<Self> {
        Scoped::new(logger, self)
    }
}

impl<F: Future> ScopeExt for F {}
