// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::level::Level;
use std::fmt::Debug;

/// The open field mapping carried by every record: string keys, arbitrary
/// JSON values, unique keys.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// The output sink a [`Logger`](crate::Logger) delivers records to.
///
/// A transport is expected to render and write the record, combining `meta`
/// and `data` with `data` fields taking precedence on key collision, plus
/// the level's registry name if the output is human-readable.
pub trait Transport: Debug + Send + Sync {
    /**
        Delivers one finished record.

        `meta` borrows the entity's live metadata for the duration of this
        call; it must not be retained or mutated beyond it (later
        `update_meta` calls change the same storage). A transport must not
        log back through the entity that invoked it; the entity holds its
        state lock across this call.

        Panicking here is permitted and propagates to the direct logging
        caller. Dispatched work catches it instead, see
        [`Logger::dispatch`](crate::Logger::dispatch).
    */
    fn deliver(&self, level: Level, data: &FieldMap, meta: &FieldMap);
}

/*
Boilerplate notes.

# Transport

Only one required method, and it's synchronous. An async variant was considered and
rejected: the entity contract is "hand the record over exactly once, don't wait",
so a transport that wants async I/O should enqueue internally.
deliver takes &FieldMap rather than owned maps so the no-retention rule is enforced
by the borrow checker instead of by documentation alone.
Debug is required so entities holding Arc<dyn Transport> stay debuggable.
Send + Sync because the same transport instance is shared across every entity forked
from a common ancestor, possibly on different threads.
No prepare-to-exit hook; nothing in this crate buffers, so there is nothing to flush.
*/
