//! Common helpers shared across Zendesk models.
//!
//! Zendesk responses are relayed as raw JSON. Whether a decoded response
//! counts as a result follows loose truthiness: `null`, `false`, `0`, `""`,
//! `"0"` and `[]` are failures, any object (even `{}`) is a success.

use serde_json::Value;

/// A decoded Zendesk response, or `None` when the call failed.
pub type ApiResponse = Option<Value>;

/// Returns true if a decoded JSON value counts as a usable response.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => is_truthy_str(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Returns true for any string except `""` and `"0"`.
pub fn is_truthy_str(s: &str) -> bool {
    !s.is_empty() && s != "0"
}

/// Renders a scalar form value as text.
///
/// Returns `None` for null, `false`, and nested arrays or objects, which
/// carry no single textual value.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Like [`value_as_text`], but also drops empty strings.
pub fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value.and_then(value_as_text).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness_of_falsy_values() {
        let falsy = [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
        ];
        for value in falsy {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn test_truthiness_of_truthy_values() {
        let truthy = [
            json!({}),
            json!(true),
            json!(1),
            json!("a"),
            json!([0]),
            json!({"ticket": null}),
        ];
        for value in truthy {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn test_value_as_text() {
        assert_eq!(value_as_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(value_as_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(value_as_text(&json!(true)).as_deref(), Some("1"));
        assert_eq!(value_as_text(&json!(false)), None);
        assert_eq!(value_as_text(&json!({"a": "b"})), None);
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(non_empty_text(Some(&json!(""))), None);
        assert_eq!(non_empty_text(None), None);
        assert_eq!(non_empty_text(Some(&json!("0"))).as_deref(), Some("0"));
    }
}
