//! Recursive field lookup inside loosely structured settings trees.

use serde_json::Value;

/// Find the first field named `key` anywhere below `tree`, depth first.
///
/// Objects are searched entry by entry: a matching field name wins before
/// its own value is descended into. Array elements are searched in order.
/// Scalars are leaves.
pub fn search_key<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    match tree {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    return Some(v);
                }
                if let Some(found) = search_key(v, key) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|v| search_key(v, key)),
        _ => None,
    }
}

/// Find a string field named `key` anywhere below `tree`.
pub fn search_str<'a>(tree: &'a Value, key: &str) -> Option<&'a str> {
    search_key(tree, key).and_then(Value::as_str)
}

/// Resolve the `Host` entry of a header map, matching the key case-insensitively.
///
/// The value may be a single string or a list, in which case the first
/// element is used. Anything else resolves to an empty string.
pub fn search_host(headers: &Value) -> String {
    let Some(map) = headers.as_object() else {
        return String::new();
    };
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("host"))
        .and_then(|(_, v)| match v {
            Value::String(s) => Some(s.clone()),
            Value::Array(hosts) => hosts.first().and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .unwrap_or_default()
}
