//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# scopelog

scopelog is an opinionated library for contextual structured logging.

# Development status

scopelog is experimental and the API may change.

# The problem

Most logging setups give you exactly one logger per process. That works until
the first time you ask "which request did this line come from?" and the
answer is three screens up, interleaved with two other requests.

Here are some problems:

* I want every record from one request to carry that request's id, without
  threading a logger argument through forty signatures.
* I want a subsystem to inherit the request's context but add its own fields,
  without mutating anyone else's logger.
* I want both of the above to keep working across `.await`, where plain
  thread-locals silently lie to you.

These problems cannot be solved by bolting a context map onto a single
process-global logger, so here we are.

# The model

The unit of logging is an *entity* ([`Logger`]): a transport, a severity
threshold fixed at construction, a mutable metadata map, and an optional
trace path. Records pass through the per-level methods only when the level
clears the threshold, and every delivered record carries the metadata as it
stands at delivery time.

[`Logger::fork`] gives an independent copy (own metadata, same transport).
[`Logger::update_meta`] shallow-merges fields in. [`Logger::push_trace`]
appends a dot-separated segment that prefixes each subsequent record's
`code` field.

# Levels

| Name      | Severity | Usecase                     |
|-----------|----------|-----------------------------|
| emergency | 0        | The process cannot continue |
| alert     | 1        | Someone should be woken up  |
| error     | 2        | An operation failed         |
| warning   | 3        | Suspicious condition        |
| info      | 4        | Normal operation            |
| debug1    | 5        | Coarse debugging            |
| debug2    | 6        | Fine debugging              |
| debug3    | 7        | Firehose                    |

Lower values are more severe. An entity built at `warning` accepts
`emergency` through `warning` and ignores the rest.

# Scopes

[`scope`] runs a closure with a fork of the current entity bound as the
thread's active entity, and [`current`] resolves the active entity, falling
back to the global one configured by [`initialize`]. For futures, wrap with
[`ScopeExt::scoped`] and the binding follows the future across polls, even
when the runtime migrates it between threads.

# Dispatch

An entity can run fire-and-forget work on the tokio runtime via
[`Logger::dispatch`], [`Logger::timeout`], and [`Logger::interval`].
Failures never unwind into the caller; they come back as records on the
dispatching entity.

# The API

```rust
use scopelog::{fields, Level, Settings, StderrTransport};
use std::sync::Arc;

scopelog::initialize(
    Settings::new(Arc::new(StderrTransport::new())).with_level(Level::Info),
);

scopelog::scope(|logger| {
    logger.update_meta(fields! {"request_id": "9f2c"});
    logger.info(fields! {"msg": "accepted"});
    // Anywhere downstream, no logger argument required.
    scopelog::current().warning(fields! {"msg": "cache miss"});
});
```

See [`Transport`] for plugging in your own backend and
[`InMemoryTransport`] for asserting on records in tests.
*/

mod level;
mod transport;
mod errors;
mod logger;
mod stderr_transport;
mod inmemory_transport;
pub mod global_logger;
mod macros;
mod dispatch;
pub mod context;

pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use transport::{FieldMap, Transport};
pub use errors::{BoxError, ErrorFormatter, default_format_error};
pub use stderr_transport::StderrTransport;
pub use inmemory_transport::{CapturedRecord, InMemoryTransport};
pub use global_logger::{Settings, global_logger, initialize};
pub use context::{ScopeExt, Scoped, current, scope};

#[doc(hidden)]
pub mod hidden {
    pub use crate::macros::object;
    pub use serde_json::json;
}
