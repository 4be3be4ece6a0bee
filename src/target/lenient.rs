//! Forgiving field readers for target documents
//!
//! A mistyped value degrades that one field instead of rejecting the whole
//! document: scalars become their text, anything else becomes empty, and a
//! regex group that is not an integer falls back to 1.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer, Error};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub(crate) const DEFAULT_GROUP: i64 = 1;

fn text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(text)
}

/// Object of templates; non-object values read as an empty map
pub(crate) fn string_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| (key, text(value)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Nested section; non-object values read as the default section
pub(crate) fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Object(entries) => T::deserialize(Value::Object(entries)).map_err(D::Error::custom),
        _ => T::deserialize(Value::Object(Map::new())).map_err(D::Error::custom),
    }
}

pub(crate) fn group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let group = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0)
                .map(|value| value as i64)
        }),
        _ => None,
    };
    Ok(group.unwrap_or(DEFAULT_GROUP))
}
