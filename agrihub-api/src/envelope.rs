//! Normalization of the API's response envelopes.
//!
//! Endpoints wrap payloads under `data`, `resources`, `documents` and a few
//! other keys, and some of them report failure through a `success: false`
//! field on an otherwise successful response. Both conventions are folded
//! into one shape here.

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keys a payload may be wrapped under, in lookup order.
pub const PAYLOAD_KEYS: [&str; 11] = [
    "data",
    "resources",
    "resource",
    "documents",
    "document",
    "users",
    "user",
    "types",
    "items",
    "item",
    "result",
];

/// Rejects a body that carries `"success": false`.
pub fn check_success(value: Value) -> ApiResult<Value> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = message(&value).unwrap_or_else(|| "request was not successful".to_string());
        return Err(ApiError::Rejected { message });
    }
    Ok(value)
}

/// Server-supplied message, from `message` or `error`.
pub fn message(value: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Strips the envelope, returning the wrapped payload or the body itself.
///
/// An object with its own `id`/`_id` and no `success`/`message` is a bare
/// entity and is returned whole, even if one of its fields shares a name
/// with a wrapper key.
pub fn unwrap_payload(value: Value) -> Value {
    match value {
        Value::Object(map) if !is_envelope(&map) => Value::Object(map),
        Value::Object(mut map) => {
            for key in PAYLOAD_KEYS {
                if map.get(key).is_some_and(|v| !v.is_null()) {
                    if let Some(inner) = map.remove(key) {
                        return inner;
                    }
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    let marked = map.contains_key("success") || map.contains_key("message");
    let identified = map.contains_key("id") || map.contains_key("_id");
    marked || !identified
}

/// Strips the envelope and deserializes the payload.
pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(unwrap_payload(value)).map_err(|e| ApiError::Decode(e.to_string()))
}
