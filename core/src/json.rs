//! Partial JSON marshalling.
//!
//! Serializes a value and keeps only an allowlist of its top-level keys, so
//! update payloads never carry fields the server would reject.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Serialize `value` keeping only the top-level keys named in `fields`.
///
/// Keys the value itself skipped stay absent. The value must serialize to a
/// JSON object.
pub fn to_json_with_fields<T: Serialize + ?Sized>(
    value: &T,
    fields: &[&str],
) -> Result<String, ApiError> {
    let mut map = match serde_json::to_value(value).map_err(ApiError::Serialization)? {
        Value::Object(map) => map,
        other => {
            return Err(ApiError::Serialization(<serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object, got {other}"
            ))))
        }
    };
    map.retain(|key, _| fields.contains(&key.as_str()));
    serde_json::to_string(&map).map_err(ApiError::Serialization)
}
