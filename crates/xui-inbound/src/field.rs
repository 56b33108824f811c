//! Tolerant field accessors over decoded JSON.
//!
//! Absent or mistyped values resolve to empty defaults instead of failing.

use serde_json::Value;

/// Parse a blob, treating blank input as an empty object.
pub(crate) fn parse_blob(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw)
}

pub(crate) fn str_or_empty(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn opt_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn bool_or_false(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Integer field; floats are truncated and numeric strings are parsed.
pub(crate) fn int_or_zero(value: &Value, key: &str) -> i64 {
    value.get(key).map(as_int).unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn as_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Port field; out-of-range values resolve to 0.
pub(crate) fn port_or_zero(value: &Value, key: &str) -> u16 {
    u16::try_from(int_or_zero(value, key)).unwrap_or(0)
}

/// List of strings; non-string elements are skipped.
pub(crate) fn str_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Non-empty string, or `None`.
pub(crate) fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
