// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger entity: mutable contextual metadata, a trace-code
//! accumulator, and the level-filtered logging methods.

use crate::errors::ErrorFormatter;
use crate::global_logger::Settings;
use crate::level::Level;
use crate::transport::{FieldMap, Transport};
use serde_json::Value;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A handle to one logging entity.
///
/// An entity owns a metadata mapping and an optional trace code, and is
/// bound to a transport and a fixed minimum level. Everything logged
/// through the entity carries its current metadata; see
/// [`update_meta`](Logger::update_meta) and [`push_trace`](Logger::push_trace).
///
/// `Logger` is a cheap clonable handle: `Clone` produces another handle to
/// the *same* entity, which is how [`dispatch`](Logger::dispatch) observes
/// metadata updates made after the call. To derive an independent entity
/// with copied state, use [`fork`](Logger::fork).
///
/// # Examples
///
/// ```rust
/// use scopelog::{fields, InMemoryTransport, Level, Logger, Settings};
/// use std::sync::Arc;
///
/// let transport = Arc::new(InMemoryTransport::new());
/// let logger = Logger::new(Settings::new(transport.clone()).with_level(Level::Info));
///
/// logger.update_meta(fields! {"request_id": "9f2c"});
/// logger.info(fields! {"msg": "accepted"});
/// logger.debug1(fields! {"msg": "suppressed, below the threshold"});
///
/// let records = transport.drain_records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].level, Level::Info);
/// assert_eq!(records[0].meta["request_id"], "9f2c");
/// ```
pub struct Logger {
    pub(crate) inner: Arc<LoggerInner>,
}

pub(crate) struct LoggerInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) format_error: ErrorFormatter,
    pub(crate) min_level: Level,
    /// Indexed by severity rank; decided once at construction.
    pub(crate) enabled: [bool; 8],
    pub(crate) state: Mutex<LoggerState>,
}

#[derive(Debug, Clone)]
pub(crate) struct LoggerState {
    pub(crate) meta: FieldMap,
    pub(crate) trace: Option<String>,
}

impl Logger {
    /// Creates a standalone entity with empty metadata from `settings`.
    ///
    /// Most applications construct their root entity once through
    /// [`initialize`](crate::initialize) instead and derive everything else
    /// via [`fork`](Logger::fork) or [`scope`](crate::scope); `new` is the
    /// escape hatch for entities that should not touch the global slot,
    /// such as test fixtures.
    pub fn new(settings: Settings) -> Logger {
        let mut enabled = [false; 8];
        for level in Level::ALL {
            enabled[level as usize] = level <= settings.min_level;
        }
        Logger {
            inner: Arc::new(LoggerInner {
                transport: settings.transport,
                format_error: settings.format_error,
                min_level: settings.min_level,
                enabled,
                state: Mutex::new(LoggerState {
                    meta: FieldMap::new(),
                    trace: None,
                }),
            }),
        }
    }

    /// Composes and delivers one record, unconditionally.
    ///
    /// If a trace code has accumulated, it is merged into `data`'s `code`
    /// field: when `code` is absent it becomes the trace string, when
    /// present it becomes `trace.existing`. The transport is then invoked
    /// exactly once with the record and the entity's live metadata.
    ///
    /// `log` applies no level threshold; that is the per-level methods'
    /// concern ([`error`](Logger::error), [`info`](Logger::info), ...).
    /// A transport panic propagates to the caller.
    pub fn log(&self, level: Level, mut data: FieldMap) {
        let state = self.state();
        if let Some(trace) = &state.trace {
            let code = match data.remove("code") {
                None => trace.clone(),
                // Value's Display would quote a string; append the raw str.
                Some(Value::String(existing)) => format!("{trace}.{existing}"),
                Some(existing) => format!("{trace}.{existing}"),
            };
            data.insert("code".to_owned(), Value::String(code));
        }
        self.inner.transport.deliver(level, &data, &state.meta);
    }

    /// Logs at [`Level::Emergency`] if enabled.
    pub fn emergency(&self, data: FieldMap) {
        if self.level_enabled(Level::Emergency) {
            self.log(Level::Emergency, data);
        }
    }

    /// Logs at [`Level::Alert`] if enabled.
    pub fn alert(&self, data: FieldMap) {
        if self.level_enabled(Level::Alert) {
            self.log(Level::Alert, data);
        }
    }

    /// Logs at [`Level::Error`] if enabled.
    ///
    /// Like every per-level method, this is [`Logger::log`] behind the
    /// threshold check fixed at construction: when the level is suppressed
    /// the call returns without composing anything.
    pub fn error(&self, data: FieldMap) {
        if self.level_enabled(Level::Error) {
            self.log(Level::Error, data);
        }
    }

    /// Logs at [`Level::Warning`] if enabled.
    pub fn warning(&self, data: FieldMap) {
        if self.level_enabled(Level::Warning) {
            self.log(Level::Warning, data);
        }
    }

    /// Logs at [`Level::Info`] if enabled.
    pub fn info(&self, data: FieldMap) {
        if self.level_enabled(Level::Info) {
            self.log(Level::Info, data);
        }
    }

    /// Logs at [`Level::Debug1`] if enabled.
    pub fn debug1(&self, data: FieldMap) {
        if self.level_enabled(Level::Debug1) {
            self.log(Level::Debug1, data);
        }
    }

    /// Logs at [`Level::Debug2`] if enabled.
    pub fn debug2(&self, data: FieldMap) {
        if self.level_enabled(Level::Debug2) {
            self.log(Level::Debug2, data);
        }
    }

    /// Logs at [`Level::Debug3`] if enabled.
    pub fn debug3(&self, data: FieldMap) {
        if self.level_enabled(Level::Debug3) {
            self.log(Level::Debug3, data);
        }
    }

    /// Whether records at `level` pass this entity's threshold.
    #[inline]
    pub fn level_enabled(&self, level: Level) -> bool {
        self.inner.enabled[level as usize]
    }

    /// The threshold this entity was constructed with.
    #[inline]
    pub fn min_level(&self) -> Level {
        self.inner.min_level
    }

    /// Shallow-merges `entries` into this entity's metadata in place.
    ///
    /// Keys present in `entries` overwrite same-named keys; other keys are
    /// untouched. Nested values are replaced wholesale, never deep-merged.
    /// The effect is visible to every subsequent log call on this entity
    /// and to entities forked *after* this call, never to entities forked
    /// before it nor to ancestors or siblings.
    pub fn update_meta(&self, entries: FieldMap) {
        let mut state = self.state();
        for (key, value) in entries {
            state.meta.insert(key, value);
        }
    }

    /// Appends `segment` to the trace-code accumulator.
    ///
    /// The first call sets the trace to `segment`; later calls append with
    /// a `.` separator. Segments are never removed or reordered. The
    /// accumulated trace is merged into every record's `code` field, see
    /// [`Logger::log`].
    pub fn push_trace(&self, segment: &str) {
        let mut state = self.state();
        state.trace = Some(match state.trace.take() {
            None => segment.to_owned(),
            Some(trace) => format!("{trace}.{segment}"),
        });
    }

    /// Derives an independent entity from this one.
    ///
    /// The fork shares the transport, error formatter, and threshold, and
    /// receives a value-copy of the current metadata and trace. The two
    /// entities are unlinked afterwards: mutations on either are invisible
    /// to the other.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scopelog::{fields, InMemoryTransport, Logger, Settings};
    /// use std::sync::Arc;
    ///
    /// let transport = Arc::new(InMemoryTransport::new());
    /// let parent = Logger::new(Settings::new(transport.clone()));
    /// parent.update_meta(fields! {"id": "root"});
    ///
    /// let child = parent.fork();
    /// child.update_meta(fields! {"id": "child"});
    ///
    /// parent.info(fields! {"msg": "from parent"});
    /// let records = transport.drain_records();
    /// assert_eq!(records[0].meta["id"], "root");
    /// ```
    pub fn fork(&self) -> Logger {
        let state = self.state().clone();
        Logger {
            inner: Arc::new(LoggerInner {
                transport: self.inner.transport.clone(),
                format_error: self.inner.format_error.clone(),
                min_level: self.inner.min_level,
                enabled: self.inner.enabled,
                state: Mutex::new(state),
            }),
        }
    }

    /// A transport panic must not wedge the entity.
    pub(crate) fn state(&self) -> MutexGuard<'_, LoggerState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for Logger {
    /// Another handle to the same entity. For an independent copy, use
    /// [`fork`](Logger::fork).
    fn clone(&self) -> Logger {
        Logger {
            inner: self.inner.clone(),
        }
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Logger {}

impl Hash for Logger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Logger")
            .field("min_level", &self.inner.min_level)
            .field("meta", &state.meta)
            .field("trace", &state.trace)
            .finish_non_exhaustive()
    }
}

/*
Boilerplate notes.

# Logger

Clone is implemented by hand, not derived, to carry the doc comment: handle aliasing is
the one semantic people trip over, and dispatch depends on it.
PartialEq/Eq/Hash are provenance-based (Arc pointer). Data equality would claim two
entities with equal metadata are "the same logger", which the isolation invariants
contradict. Provenance answers the question tests actually ask: is this the same entity.
Ord makes no sense.
Default is not sensible; an entity needs a transport.
Display is not sensible, Debug shows threshold and state.
Send/Sync hold structurally: the mutable state is behind a Mutex and the transport is
required to be Send + Sync.
*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::inmemory_transport::InMemoryTransport;

    fn capture(min_level: Level) -> (Arc<InMemoryTransport>, Logger) {
        let transport = Arc::new(InMemoryTransport::new());
        let logger = Logger::new(Settings::new(transport.clone()).with_level(min_level));
        (transport, logger)
    }

    #[test]
    fn suppressed_levels_are_no_ops() {
        let (transport, logger) = capture(Level::Error);
        logger.info(fields! {"msg": "dropped"});
        logger.warning(fields! {"msg": "dropped"});
        logger.debug3(fields! {"msg": "dropped"});
        assert!(transport.records().is_empty());

        logger.error(fields! {"msg": "x"});
        let records = transport.drain_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Error);
        assert_eq!(records[0].data["msg"], "x");
        assert!(records[0].meta.is_empty());
    }

    #[test]
    fn threshold_enables_levels_at_least_as_severe() {
        let (_, logger) = capture(Level::Warning);
        for level in Level::ALL {
            assert_eq!(logger.level_enabled(level), level <= Level::Warning);
        }
        assert_eq!(logger.min_level(), Level::Warning);
    }

    #[test]
    fn log_applies_no_threshold() {
        let (transport, logger) = capture(Level::Emergency);
        logger.log(Level::Debug3, fields! {"msg": "forced through"});
        assert_eq!(transport.drain_records().len(), 1);
    }

    #[test]
    fn meta_travels_with_every_record() {
        let (transport, logger) = capture(Level::Info);
        logger.update_meta(fields! {"requestId": "123"});
        logger.info(fields! {"msg": "t"});
        let records = transport.drain_records();
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[0].data["msg"], "t");
        assert_eq!(records[0].meta["requestId"], "123");
    }

    #[test]
    fn update_meta_is_a_shallow_merge() {
        let (transport, logger) = capture(Level::Info);
        logger.update_meta(fields! {"a": 1, "nested": {"keep": true}});
        logger.update_meta(fields! {"b": 2, "nested": {"replaced": true}});
        logger.info(fields! {});
        let records = transport.drain_records();
        assert_eq!(records[0].meta["a"], 1);
        assert_eq!(records[0].meta["b"], 2);
        // nested values are replaced wholesale
        assert_eq!(records[0].meta["nested"], serde_json::json!({"replaced": true}));
    }

    #[test]
    fn records_capture_meta_at_delivery_time() {
        let (transport, logger) = capture(Level::Info);
        logger.info(fields! {"msg": "first"});
        logger.update_meta(fields! {"phase": "late"});
        logger.info(fields! {"msg": "second"});
        let records = transport.drain_records();
        assert!(records[0].meta.is_empty());
        assert_eq!(records[1].meta["phase"], "late");
    }

    #[test]
    fn fork_isolates_metadata_both_ways() {
        let (transport, original) = capture(Level::Info);
        original.update_meta(fields! {"id": "root"});

        let fork = original.fork();
        fork.update_meta(fields! {"id": "fork", "extra": true});
        original.update_meta(fields! {"only_root": 1});

        original.info(fields! {});
        fork.info(fields! {});
        let records = transport.drain_records();
        assert_eq!(records[0].meta["id"], "root");
        assert_eq!(records[0].meta["only_root"], 1);
        assert!(records[0].meta.get("extra").is_none());
        assert_eq!(records[1].meta["id"], "fork");
        assert!(records[1].meta.get("only_root").is_none());
    }

    #[test]
    fn fork_copies_trace_without_linking_it() {
        let (transport, original) = capture(Level::Info);
        original.push_trace("a");
        let fork = original.fork();
        fork.push_trace("b");

        original.info(fields! {});
        fork.info(fields! {});
        let records = transport.drain_records();
        assert_eq!(records[0].data["code"], "a");
        assert_eq!(records[1].data["code"], "a.b");
    }

    #[test]
    fn clone_aliases_the_same_entity() {
        let (transport, logger) = capture(Level::Info);
        let alias = logger.clone();
        assert_eq!(logger, alias);
        assert_ne!(logger, logger.fork());

        alias.update_meta(fields! {"seen": "everywhere"});
        logger.info(fields! {});
        assert_eq!(transport.drain_records()[0].meta["seen"], "everywhere");
    }

    #[test]
    fn trace_accumulates_into_code() {
        let (transport, logger) = capture(Level::Info);
        logger.push_trace("a");
        logger.push_trace("b");
        logger.info(fields! {"msg": "no explicit code"});
        logger.info(fields! {"msg": "explicit", "code": "c"});
        let records = transport.drain_records();
        assert_eq!(records[0].data["code"], "a.b");
        assert_eq!(records[1].data["code"], "a.b.c");
    }

    #[test]
    fn non_string_code_is_rendered_then_prefixed() {
        let (transport, logger) = capture(Level::Info);
        logger.push_trace("a");
        logger.info(fields! {"code": 5});
        assert_eq!(transport.drain_records()[0].data["code"], "a.5");
    }

    #[test]
    fn no_trace_leaves_data_untouched() {
        let (transport, logger) = capture(Level::Info);
        logger.info(fields! {"msg": "plain"});
        logger.info(fields! {"code": "mine"});
        let records = transport.drain_records();
        assert!(records[0].data.get("code").is_none());
        assert_eq!(records[1].data["code"], "mine");
    }
}
