// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safe asynchronous dispatch: fire-and-forget, delayed, and repeating
//! execution with automatic failure logging.
//!
//! These helpers exist so that background work can fail without anyone
//! awaiting it: the action's error (or panic) is caught, run through the
//! entity's error formatter, and logged on the dispatching entity with a
//! `code` of `dispatch_failed`. Nothing propagates to the call site.
//!
//! The action runs with the dispatching entity bound as the active context,
//! so logging inside it behaves exactly as at the dispatch site.

use crate::context::Scoped;
use crate::errors::{ActionPanic, BoxError, panic_message};
use crate::level::Level;
use crate::logger::Logger;
use crate::transport::FieldMap;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;

const DISPATCH_FAILED: &str = "dispatch_failed";
const TIMEOUT_FAILED: &str = "timeout_failed";

impl Logger {
    /// Runs `action` without blocking or awaiting it in the caller's flow.
    ///
    /// The action is spawned on the ambient tokio runtime with this entity
    /// bound as the active context. If it fails, by returning `Err` or by
    /// panicking, the failure is formatted and logged at `level` with
    /// `code: "dispatch_failed"`, using the entity's state *at the time the
    /// failure is observed*: metadata updated between the `dispatch` call
    /// and the failure shows up in the failure record. The failure record
    /// passes through the same threshold check as any other record at
    /// `level`.
    ///
    /// Failures never reach the `dispatch` caller. When no runtime is
    /// ambient the action can never run, which is itself a dispatch failure
    /// and is logged immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scopelog::{fields, InMemoryTransport, Level, Logger, Settings};
    /// use std::sync::Arc;
    ///
    /// # async fn example() {
    /// let transport = Arc::new(InMemoryTransport::new());
    /// let logger = Logger::new(Settings::new(transport.clone()));
    ///
    /// logger.dispatch(Level::Error, async {
    ///     std::fs::remove_file("/tmp/scratch")?;
    ///     Ok::<(), std::io::Error>(())
    /// });
    /// // the caller moves on; a failure would surface as one record
    /// // with code "dispatch_failed"
    /// # }
    /// ```
    pub fn dispatch<F, E>(&self, level: Level, action: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(error) => {
                self.report_failure(level, DISPATCH_FAILED, error.into());
                return;
            }
        };
        let entity = self.clone();
        handle.spawn(async move {
            entity.run_contained(level, action).await;
        });
    }

    /// Schedules [`dispatch`](Logger::dispatch) of `action` after `delay`.
    ///
    /// If scheduling itself fails, because no runtime is ambient, the
    /// failure is logged immediately with `code: "timeout_failed"` instead
    /// of panicking. Once the delay elapses the action runs with full
    /// dispatch semantics.
    pub fn timeout<F, E>(&self, level: Level, delay: Duration, action: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(error) => {
                self.report_failure(level, TIMEOUT_FAILED, error.into());
                return;
            }
        };
        let entity = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            entity.run_contained(level, action).await;
        });
    }

    /// Runs `action` immediately, then repeatedly, forever.
    ///
    /// Each round builds a fresh future from `action`, runs it to
    /// completion with dispatch semantics (failures logged, never
    /// propagated, never stopping the loop), and only then waits `period`
    /// before the next round. Self-rescheduling means slow actions cannot
    /// overlap; the timer jitters under load instead.
    ///
    /// No cancellation handle is exposed: once started, the loop runs until
    /// the process (or its runtime) shuts down. Don't use `interval` for
    /// work that needs a lifecycle.
    pub fn interval<A, F, E>(&self, level: Level, period: Duration, mut action: A)
    where
        A: FnMut() -> F + Send + 'static,
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(error) => {
                self.report_failure(level, DISPATCH_FAILED, error.into());
                return;
            }
        };
        let entity = self.clone();
        handle.spawn(async move {
            loop {
                entity.run_contained(level, action()).await;
                tokio::time::sleep(period).await;
            }
        });
    }

    /// Supervises one action: the inner spawn isolates panics so the
    /// JoinError can be turned into a failure record.
    async fn run_contained<F, E>(&self, level: Level, action: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let supervised = tokio::spawn(Scoped::new(self.clone(), action));
        match supervised.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => self.report_failure(level, DISPATCH_FAILED, error.into()),
            Err(join_error) => {
                let error: BoxError = if join_error.is_panic() {
                    Box::new(ActionPanic(panic_message(join_error.into_panic())))
                } else {
                    join_error.into()
                };
                self.report_failure(level, DISPATCH_FAILED, error);
            }
        }
    }

    pub(crate) fn report_failure(&self, level: Level, code: &'static str, error: BoxError) {
        if !self.level_enabled(level) {
            return;
        }
        let formatted = (self.inner.format_error)(&error);
        let mut data = FieldMap::new();
        data.insert("code".to_owned(), Value::String(code.to_owned()));
        data.insert("error".to_owned(), formatted);
        self.log(level, data);
    }
}
