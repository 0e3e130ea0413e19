// SPDX-License-Identifier: MIT OR Apache-2.0

//! A transport that writes one line per record to standard error.

use crate::level::Level;
use crate::transport::{FieldMap, Transport};
use std::io::Write;

/// Writes records to stderr as `<level> <json>` lines.
///
/// Metadata and payload are merged into a single JSON object, payload
/// fields winning on collision. This is also the transport behind the
/// uninitialized-global fallback, so a process that never calls
/// [`initialize`](crate::initialize) still gets every record on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StderrTransport;

/*
Boilerplate notes.

Zero-size and stateless, so the full derive set is free: Copy/Clone
trivially, PartialEq/Eq/Hash because all instances are interchangeable,
Default because there is nothing to configure. No Display; this is not
user-facing output itself.
*/

impl StderrTransport {
    pub fn new() -> StderrTransport {
        StderrTransport
    }
}

fn render(level: Level, data: &FieldMap, meta: &FieldMap) -> Vec<u8> {
    let mut merged = meta.clone();
    for (key, value) in data {
        merged.insert(key.clone(), value.clone());
    }
    let mut line = Vec::with_capacity(128);
    line.extend_from_slice(level.name().as_bytes());
    line.push(b' ');
    serde_json::to_writer(&mut line, &merged).expect("Can't render a log record");
    line.push(b'\n');
    line
}

impl Transport for StderrTransport {
    fn deliver(&self, level: Level, data: &FieldMap, meta: &FieldMap) {
        let line = render(level, data, meta);
        // One write per record so concurrent entities don't interleave
        // mid-line.
        std::io::stderr()
            .write_all(&line)
            .expect("Can't log to stderr");
    }
}
