// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`fields!`](crate::fields) macro, the ergonomic way to build a
//! record payload or a metadata update.

use crate::transport::FieldMap;

/// Builds a [`FieldMap`](crate::FieldMap) from an object literal.
///
/// The body accepts everything [`serde_json::json!`] accepts inside an
/// object: string keys, nested objects and arrays, and arbitrary
/// serializable expressions as values.
///
/// # Examples
///
/// ```rust
/// use scopelog::fields;
///
/// let status = 200;
/// let data = fields! {"msg": "accepted", "status": status, "tags": ["a", "b"]};
/// assert_eq!(data["status"], 200);
///
/// let empty = fields! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::FieldMap::new()
    };
    ($($body:tt)+) => {
        $crate::hidden::object($crate::hidden::json!({ $($body)+ }))
    };
}

/// Support function for [`fields!`]; not public API.
///
/// The macro only ever hands this an object literal, so the other arms
/// cannot occur.
#[doc(hidden)]
pub fn object(value: serde_json::Value) -> FieldMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("fields! always builds a JSON object"),
    }
}
