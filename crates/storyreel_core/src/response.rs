//! Helpers for reading provider response bodies.

use serde_json::Value;

/// The provider's own error text from a response body, if it carries one.
///
/// Looks at `error`, then `detail`, then `message`. An `error` object with a
/// nested `message` is unwrapped.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use storyreel_core::error_message;
///
/// assert_eq!(error_message(&json!({"error": "quota exceeded"})).as_deref(), Some("quota exceeded"));
/// assert_eq!(error_message(&json!({"detail": "bad keyframe"})).as_deref(), Some("bad keyframe"));
/// assert_eq!(error_message(&json!({"id": "abc"})), None);
/// ```
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "detail", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Object(inner) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::Null => None,
            Value::String(_) => None,
            other => Some(other.to_string()),
        })
}
