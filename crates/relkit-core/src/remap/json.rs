//! The four remaps over `serde_json::Value`.
//!
//! These accept dynamically-shaped input and reject anything that is not the
//! expected array/object shape with [`RemapError::InvalidShape`] before any
//! output is built. Object key order of the input is honored, so grouped
//! sequences follow the order the keys appear in the document.

use serde_json::{Map, Value};

use super::RemapError;

/// `["a", "b", "a"]` → `{"a": 1, "b": 1}`.
///
/// # Errors
///
/// Returns [`RemapError::InvalidShape`] unless `value` is an array of strings.
pub fn to_set(value: &Value) -> Result<Value, RemapError> {
    let array = expect_array(value, || "$".to_string())?;
    let elements = array
        .iter()
        .enumerate()
        .map(|(i, element)| expect_str(element, || format!("$[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::Object(
        super::to_set(elements)
            .into_iter()
            .map(|(key, one)| (key, Value::from(one)))
            .collect(),
    ))
}

/// `{"a": "x", "b": "x"}` → `{"x": ["a", "b"]}`.
///
/// # Errors
///
/// Returns [`RemapError::InvalidShape`] unless `value` is an object of strings.
pub fn invert(value: &Value) -> Result<Value, RemapError> {
    let pairs = flat_pairs(value)?;
    Ok(Value::Object(
        super::invert(pairs)
            .into_iter()
            .map(|(key, keys)| (key, Value::from(keys)))
            .collect(),
    ))
}

/// `{"a": {"b": "c"}}` → `{"c": {"b": ["a"]}}`.
///
/// # Errors
///
/// Returns [`RemapError::InvalidShape`] unless `value` is an object of
/// objects of strings.
pub fn pivot_nested(value: &Value) -> Result<Value, RemapError> {
    let entries = nested_pairs(value)?;
    Ok(Value::Object(
        super::pivot_nested(entries)
            .into_iter()
            .map(|(target, by_inner)| {
                let inner: Map<String, Value> = by_inner
                    .into_iter()
                    .map(|(inner, outers)| (inner, Value::from(outers)))
                    .collect();
                (target, Value::Object(inner))
            })
            .collect(),
    ))
}

/// `{"a": {"b": "c"}}` → `{"b": [["a", "c"]]}`.
///
/// # Errors
///
/// Returns [`RemapError::InvalidShape`] unless `value` is an object of
/// objects of strings.
pub fn group_by_inner_key(value: &Value) -> Result<Value, RemapError> {
    let entries = nested_pairs(value)?;
    Ok(Value::Object(
        super::group_by_inner_key(entries)
            .into_iter()
            .map(|(inner, pairs)| {
                let pairs = pairs
                    .into_iter()
                    .map(|(outer, value)| Value::from(vec![outer, value]))
                    .collect();
                (inner, Value::Array(pairs))
            })
            .collect(),
    ))
}

fn flat_pairs(value: &Value) -> Result<Vec<(&str, &str)>, RemapError> {
    let object = expect_object(value, || "$".to_string())?;
    object
        .iter()
        .map(|(key, v)| expect_str(v, || format!("$.{key}")).map(|v| (key.as_str(), v)))
        .collect()
}

type NestedPairs<'a> = Vec<(&'a str, Vec<(&'a str, &'a str)>)>;

fn nested_pairs(value: &Value) -> Result<NestedPairs<'_>, RemapError> {
    let object = expect_object(value, || "$".to_string())?;
    object
        .iter()
        .map(|(outer, inner)| -> Result<_, RemapError> {
            let inner = expect_object(inner, || format!("$.{outer}"))?;
            let pairs = inner
                .iter()
                .map(|(key, v)| {
                    expect_str(v, || format!("$.{outer}.{key}")).map(|v| (key.as_str(), v))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((outer.as_str(), pairs))
        })
        .collect()
}

fn expect_str(value: &Value, path: impl FnOnce() -> String) -> Result<&str, RemapError> {
    value.as_str().ok_or_else(|| invalid(value, path(), "string"))
}

fn expect_array(value: &Value, path: impl FnOnce() -> String) -> Result<&Vec<Value>, RemapError> {
    value.as_array().ok_or_else(|| invalid(value, path(), "array"))
}

fn expect_object(
    value: &Value,
    path: impl FnOnce() -> String,
) -> Result<&Map<String, Value>, RemapError> {
    value.as_object().ok_or_else(|| invalid(value, path(), "object"))
}

fn invalid(value: &Value, path: String, expected: &'static str) -> RemapError {
    let found = kind(value);
    tracing::debug!(%path, expected, found, "rejecting remap input");
    RemapError::InvalidShape {
        path,
        expected,
        found,
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
