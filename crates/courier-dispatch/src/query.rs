//! URL query string encoding for request parameters.

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded;

/// Request parameters: string keys mapped to arbitrary JSON values.
///
/// A `BTreeMap` keeps the encoded output deterministic; query semantics are
/// order-insensitive per HTTP convention.
pub type Params = BTreeMap<String, Value>;

/// Encode parameters as a percent-encoded query string, without the leading
/// `?`.
///
/// Scalars are rendered bare (strings lose their JSON quotes, null becomes
/// empty), arrays and objects are rendered as compact JSON.
pub fn encode_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        serializer.append_pair(name, &scalar(value));
    }
    serializer.finish()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
