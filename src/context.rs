// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope binding: which logger entity is "the" logger right here.
//!
//! A scope is a region of execution, together with everything it awaits,
//! within which one specific [`Logger`] is the active entity. Code anywhere
//! inside the scope retrieves it with [`current`] instead of threading a
//! logger through every signature. When no scope is active, [`current`]
//! falls back to the global logger.
//!
//! # Entering a scope
//!
//! [`scope`] covers synchronous regions: it derives a fresh entity from the
//! innermost active one (fork semantics, so metadata added inside stays
//! inside) and binds it for the duration of the closure:
//!
//! ```rust
//! use scopelog::{fields, InMemoryTransport, Settings};
//! use std::sync::Arc;
//!
//! scopelog::initialize(Settings::new(Arc::new(InMemoryTransport::new())));
//!
//! scopelog::scope(|logger| {
//!     logger.update_meta(fields! {"request_id": "9f2c"});
//!     // every record emitted in here carries request_id
//!     scopelog::current().info(fields! {"msg": "handling"});
//! });
//! // the previous binding is back; request_id is gone
//! ```
//!
//! # Scopes across `.await`
//!
//! Thread-locals do not follow a task between polls, so for asynchronous
//! regions the binding is carried by the [`Scoped`] future wrapper, most
//! conveniently through [`ScopeExt`]:
//!
//! ```rust
//! use scopelog::{fields, ScopeExt};
//!
//! # async fn handle_request() {
//! async {
//!     scopelog::current().update_meta(fields! {"request_id": "9f2c"});
//!     step_one().await;
//!     scopelog::current().info(fields! {"msg": "done"});
//! }
//! .scoped()
//! .await;
//! # }
//! # async fn step_one() {}
//! ```
//!
//! The wrapper re-establishes the binding around every poll and restores
//! the previous one afterwards, so the scope survives suspension and task
//! migration, and sibling tasks interleaving on the same thread never see
//! each other's entity.
//!
//! Nesting derives from the innermost active entity: a scope entered inside
//! another starts from the inner entity's metadata, and exiting restores
//! the previous binding exactly.
//!
//! Bindings are per task (and per thread for synchronous code). A bare
//! `std::thread::spawn` or `tokio::spawn` inside a scope starts with no
//! binding; hand the entity over explicitly with
//! [`ScopeExt::bound_to`] or let [`Logger::dispatch`](crate::Logger::dispatch)
//! do it.

use crate::logger::Logger;
use std::cell::Cell;

mod scoped;


pub use scoped::{ScopeExt, Scoped};

thread_local! {
    static ACTIVE: Cell<Option<Logger>> = const { Cell::new(None) };
}

/// Binds `next` as the active entity until the guard drops.
pub(crate) fn bind_active(next: Logger) -> RestoreGuard {
    RestoreGuard {
        prior: ACTIVE.with(|cell| cell.replace(Some(next))),
    }
}

/// Restores the previous binding on drop, panic included.
pub(crate) struct RestoreGuard {
    prior: Option<Logger>,
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        let prior = self.prior.take();
        let _ = ACTIVE.try_with(|cell| cell.set(prior));
    }
}

/// Returns the entity bound to the currently executing scope, or the
/// global logger when no scope is active.
///
/// This never fails and never creates a scope; the returned value is a
/// handle to the active entity itself, so
/// [`update_meta`](Logger::update_meta) through it is visible to every
/// other log call in the same scope.
pub fn current() -> Logger {
    let bound = ACTIVE.with(|cell| {
        let bound = cell.take();
        let handle = bound.clone();
        cell.set(bound);
        handle
    });
    bound.unwrap_or_else(crate::global_logger::global_logger)
}

/// Runs `f` inside a new scope and returns its result.
///
/// The scope's entity is forked from the innermost active entity (or the
/// global logger), handed to `f`, and bound as active for the duration of
/// the call; [`current`] anywhere below `f` returns it. On exit, panic
/// included, the previous binding is restored exactly. Metadata attached
/// inside the scope is never visible outside it.
///
/// The binding covers the synchronous extent of `f` only. For a scope that
/// follows an async chain, wrap the future with [`ScopeExt::scoped`].
pub fn scope<R>(f: impl FnOnce(&Logger) -> R) -> R {
    let entity = current().fork();
    let _restore = bind_active(entity.clone());
    f(&entity)
}
