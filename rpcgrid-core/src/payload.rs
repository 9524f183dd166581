//! Opaque remote-call results and the unwrapping step that precedes decoding.

use serde_json::{Map, Value};

/// Maximum number of object keys followed while looking for the actual payload.
pub const MAX_WRAP_DEPTH: usize = 2;

/// Result of a remote call before any decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawPayload {
    /// The call returned nothing.
    #[default]
    Empty,
    /// A byte buffer (possibly gzip-compressed).
    Bytes(Vec<u8>),
    /// A string (possibly Base64, possibly Base64-wrapped gzip).
    Text(String),
    /// A structured result that may wrap the payload under one or two keys.
    Json(Value),
}

impl From<Vec<u8>> for RawPayload {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<String> for RawPayload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RawPayload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Value> for RawPayload {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

/// Unwrap a structured result down to the payload it carries.
///
/// Follows up to [`MAX_WRAP_DEPTH`] object keys: `return`, then `<method>Result`,
/// then any key ending in `Result`. A leading array is indexed at `[0]` without
/// counting as a level. Non-JSON payloads pass through unchanged.
#[must_use]
pub fn extract_payload(raw: RawPayload, method: &str) -> RawPayload {
    match raw {
        RawPayload::Json(v) => unwrap_value(v, method, MAX_WRAP_DEPTH),
        other => other,
    }
}

fn unwrap_value(v: Value, method: &str, depth: usize) -> RawPayload {
    match v {
        Value::Null => RawPayload::Empty,
        Value::String(s) => RawPayload::Text(s),
        Value::Array(items) => {
            if let Some(bytes) = byte_array(&items) {
                return RawPayload::Bytes(bytes);
            }
            match items.into_iter().next() {
                Some(first) => unwrap_value(first, method, depth),
                None => RawPayload::Empty,
            }
        }
        Value::Object(mut map) => {
            if let Some(bytes) = buffer_object(&map) {
                return RawPayload::Bytes(bytes);
            }
            if depth > 0
                && let Some(inner) = take_wrapped(&mut map, method)
            {
                return unwrap_value(inner, method, depth - 1);
            }
            RawPayload::Text(Value::Object(map).to_string())
        }
        other => RawPayload::Text(other.to_string()),
    }
}

fn take_wrapped(map: &mut Map<String, Value>, method: &str) -> Option<Value> {
    if let Some(v) = map.remove("return") {
        return Some(v);
    }
    let exact = format!("{method}Result");
    if let Some(v) = map.remove(&exact) {
        return Some(v);
    }
    let key = map.keys().find(|k| k.ends_with("Result")).cloned()?;
    map.remove(&key)
}

/// `{"type": "Buffer", "data": [..]}`, the usual JSON rendering of a byte buffer.
fn buffer_object(map: &Map<String, Value>) -> Option<Vec<u8>> {
    if map.get("type").and_then(Value::as_str) != Some("Buffer") {
        return None;
    }
    byte_array(map.get("data")?.as_array()?)
}

fn byte_array(items: &[Value]) -> Option<Vec<u8>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}
