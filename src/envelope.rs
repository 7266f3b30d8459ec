//! Response envelope decoding.
//! The service wraps payloads inconsistently: item arrays arrive under
//! `data`, bare, or under `data.data`; tokens arrive at `data.token` or
//! flat `token`. This module is the single place that knows those shapes.

use serde_json::Value;
use tracing::warn;

/// Where the item array was found in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsShape {
    /// The body itself is the array.
    Bare,
    /// The array sits under `data`.
    Nested,
    /// The array sits under `data.data`.
    DoubleNested,
    /// No recognizable array; decoded as empty.
    Unrecognized,
}

/// Extract the item array from a response body, trying shapes in fixed
/// priority order: `data`, then the bare body, then `data.data`. An
/// unrecognizable body decodes to empty with a logged warning, never an
/// error; the returned shape lets callers tell that apart from a genuinely
/// empty result.
pub fn decode_items(body: &Value) -> (Vec<Value>, ItemsShape) {
    if let Some(arr) = body.get("data").and_then(Value::as_array) {
        return (arr.clone(), ItemsShape::Nested);
    }
    if let Some(arr) = body.as_array() {
        return (arr.clone(), ItemsShape::Bare);
    }
    if let Some(arr) = body
        .get("data")
        .and_then(|d| d.get("data"))
        .and_then(Value::as_array)
    {
        return (arr.clone(), ItemsShape::DoubleNested);
    }
    warn!(target: "catalog", "no recognizable item array in response: {}", body);
    (Vec::new(), ItemsShape::Unrecognized)
}

/// Extract a single-item payload: the object under `data` when present,
/// otherwise the bare body when it is itself an object.
pub fn decode_item(body: &Value) -> Option<&Value> {
    if let Some(obj) = body.get("data").filter(|d| d.is_object()) {
        return Some(obj);
    }
    if body.is_object() {
        return Some(body);
    }
    None
}

/// Extract a credential from an auth response: `data.token` wins over flat
/// `token`; an empty string in either spot counts as absent.
pub fn extract_token(body: &Value) -> Option<String> {
    body.get("data")
        .and_then(|d| d.get("token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            body.get("token")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
        })
        .map(str::to_string)
}

/// The human-readable `message` field of an envelope, when present.
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
