// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure values and the error-formatter seam.
//!
//! Dispatched actions report failure as a [`BoxError`]; before a failure is
//! written into a record's `error` field it passes through the entity's
//! [`ErrorFormatter`], so applications can swap in their own rendering via
//! [`Settings::with_format_error`](crate::Settings::with_format_error).

use serde_json::Value;
use std::sync::Arc;

/// Boxed failure value produced by dispatched actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Converts a caught failure into the loggable value stored under `error`.
pub type ErrorFormatter = Arc<dyn Fn(&BoxError) -> Value + Send + Sync>;

/// The default error formatter: an object with the error's `message` and,
/// when the error has sources, a `chain` of their messages outermost-first.
pub fn default_format_error(error: &BoxError) -> Value {
    let mut formatted = serde_json::Map::new();
    formatted.insert("message".to_owned(), Value::String(error.to_string()));
    let mut chain = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(Value::String(cause.to_string()));
        source = cause.source();
    }
    if !chain.is_empty() {
        formatted.insert("chain".to_owned(), Value::Array(chain));
    }
    Value::Object(formatted)
}

/// Failure recorded when a dispatched action panics instead of returning.
#[derive(Debug, thiserror::Error)]
#[error("action panicked: {0}")]
pub(crate) struct ActionPanic(pub(crate) String);

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => "non-string panic payload".to_owned(),
        },
    }
}
