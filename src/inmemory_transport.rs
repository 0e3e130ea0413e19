// SPDX-License-Identifier: MIT OR Apache-2.0

//! A transport that buffers records in memory.
//!
//! Primarily for tests: install one, run the code under test, then assert
//! on the captured records. Nothing is written anywhere else.

use crate::level::Level;
use crate::transport::{FieldMap, Transport};
use std::sync::Mutex;

/// One delivered record, with the payload and the metadata snapshot taken
/// at delivery time.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    pub level: Level,
    pub data: FieldMap,
    pub meta: FieldMap,
}

/// Captures every delivered record in a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    records: Mutex<Vec<CapturedRecord>>,
}

impl InMemoryTransport {
    pub fn new() -> InMemoryTransport {
        InMemoryTransport::default()
    }

    /// A copy of everything captured so far, in delivery order.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Takes the captured records, leaving the buffer empty.
    pub fn drain_records(&self) -> Vec<CapturedRecord> {
        std::mem::take(&mut *self.records.lock().unwrap())
    }
}

impl Transport for InMemoryTransport {
    fn deliver(&self, level: Level, data: &FieldMap, meta: &FieldMap) {
        // The borrows end when deliver returns, so capture by clone.
        let record = CapturedRecord {
            level,
            data: data.clone(),
            meta: meta.clone(),
        };
        self.records.lock().unwrap().push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn captures_in_delivery_order_and_drains() {
        let transport = InMemoryTransport::new();
        let empty = FieldMap::new();
        let mut first = FieldMap::new();
        first.insert("n".to_string(), json!(1));
        let mut second = FieldMap::new();
        second.insert("n".to_string(), json!(2));

        transport.deliver(Level::Info, &first, &empty);
        transport.deliver(Level::Error, &second, &empty);

        let records = transport.drain_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[0].data["n"], json!(1));
        assert_eq!(records[1].level, Level::Error);
        assert!(transport.records().is_empty());
    }
}
