// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide logger and its lifecycle.
//!
//! One global entity backs every [`current`](crate::current) call made
//! outside any scope. Applications configure it once at startup via
//! [`initialize`]; everything else (scopes, forks, dispatch) derives from
//! it from then on.
//!
//! # Default behavior
//!
//! If the global logger is used before [`initialize`], the slot lazily
//! fills with a deterministic fallback: a [`StderrTransport`] entity at
//! [`Level::Debug3`] (accept everything) with the default error formatter.
//! Records are never silently dropped and nothing panics; configuring real
//! settings later overwrites the fallback.
//!
//! # Re-initialization
//!
//! Calling [`initialize`] again replaces the stored entity. Entities
//! already derived from the old one (forks, active scopes) keep their own
//! references and are unaffected; only future fallback resolutions see the
//! new instance. Concurrent re-initialization is not protected beyond the
//! slot's own lock; treat it as a startup/restart operation.
//!
//! # Examples
//!
//! ```rust
//! use scopelog::{fields, Level, Settings, StderrTransport};
//! use std::sync::Arc;
//!
//! scopelog::initialize(
//!     Settings::new(Arc::new(StderrTransport::new())).with_level(Level::Warning),
//! );
//!
//! scopelog::current().warning(fields! {"msg": "configured"});
//! ```

use crate::errors::{BoxError, ErrorFormatter, default_format_error};
use crate::level::Level;
use crate::logger::Logger;
use crate::stderr_transport::StderrTransport;
use crate::transport::Transport;
use serde_json::Value;
use std::sync::{Arc, OnceLock, RwLock};

/// Static storage for the global entity.
///
/// `OnceLock` for one-time slot creation, `RwLock` because resolution is
/// frequent (every out-of-scope `current()`) while replacement is rare.
static GLOBAL: OnceLock<RwLock<Logger>> = OnceLock::new();

/// Serializes tests that touch the global slot.
#[cfg(test)]
pub(crate) static TEST_LOGGER_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Configuration consumed by [`initialize`] and [`Logger::new`].
///
/// `new` requires the one thing that has no default, the transport;
/// the threshold defaults to [`Level::Info`] and the error formatter to
/// [`default_format_error`].
#[derive(Clone)]
pub struct Settings {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) format_error: ErrorFormatter,
    pub(crate) min_level: Level,
}

impl Settings {
    /// Settings delivering to `transport`, with default threshold and
    /// error formatter.
    pub fn new(transport: Arc<dyn Transport>) -> Settings {
        Settings {
            transport,
            format_error: Arc::new(default_format_error),
            min_level: Level::Info,
        }
    }

    /// Sets the minimum severity accepted by the per-level methods.
    pub fn with_level(mut self, level: Level) -> Settings {
        self.min_level = level;
        self
    }

    /// Sets the formatter applied to dispatched failures before they are
    /// written into a record's `error` field.
    pub fn with_format_error(
        mut self,
        format: impl Fn(&BoxError) -> Value + Send + Sync + 'static,
    ) -> Settings {
        self.format_error = Arc::new(format);
        self
    }
}

fn global_slot() -> &'static RwLock<Logger> {
    GLOBAL.get_or_init(|| {
        // Deterministic fallback when used before initialize.
        RwLock::new(Logger::new(
            Settings::new(Arc::new(StderrTransport::new())).with_level(Level::Debug3),
        ))
    })
}

/// Constructs the global entity from `settings` and stores it.
///
/// Call once during startup, before request handling begins. Calling again
/// overwrites the previous entity; see the module docs for what that means
/// for already-derived entities.
pub fn initialize(settings: Settings) {
    let logger = Logger::new(settings);
    let init_clone = logger.clone();
    let slot = GLOBAL.get_or_init(|| RwLock::new(init_clone));
    *slot.write().unwrap() = logger;
}

/// A handle to the current global entity.
///
/// Prefer [`current`](crate::current), which resolves the active scope
/// first and only falls back here.
pub fn global_logger() -> Logger {
    global_slot().read().unwrap().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::inmemory_transport::InMemoryTransport;

    #[test]
    fn initialize_configures_the_fallback_entity() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap();
        let transport = Arc::new(InMemoryTransport::new());
        initialize(Settings::new(transport.clone()).with_level(Level::Warning));

        let logger = global_logger();
        logger.info(fields! {"msg": "below threshold"});
        logger.warning(fields! {"msg": "kept"});

        let records = transport.drain_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Warning);
    }

    #[test]
    fn reinitialize_replaces_future_resolutions_only() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap();
        let first = Arc::new(InMemoryTransport::new());
        initialize(Settings::new(first.clone()));
        let old = global_logger();

        let second = Arc::new(InMemoryTransport::new());
        initialize(Settings::new(second.clone()));

        assert_ne!(global_logger(), old);
        old.info(fields! {"msg": "through the old transport"});
        global_logger().info(fields! {"msg": "through the new transport"});

        assert_eq!(first.drain_records().len(), 1);
        assert_eq!(second.drain_records().len(), 1);
    }

    #[test]
    fn global_resolution_is_stable_between_calls() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap();
        assert_eq!(global_logger(), global_logger());
    }
}
