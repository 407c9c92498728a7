//! Helpers for reading values out of a decoded manifest.

use rosdistro_core::{DistroError, Result};
use serde_yaml::{Mapping, Value};

/// Stringify a scalar (string, number or bool).
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Mapping keys must be scalars; anything else is a malformed manifest.
pub fn key_string(key: &Value, context: &str) -> Result<String> {
    scalar_string(key)
        .ok_or_else(|| DistroError::invalid(format!("{} key must be a scalar: {:?}", context, key)))
}

pub fn require_mapping<'a>(value: &'a Value, context: &str) -> Result<&'a Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| DistroError::invalid(format!("{} must be a mapping", context)))
}

/// Read a sequence of strings.
pub fn string_list(value: &Value, context: &str) -> Result<Vec<String>> {
    let Some(items) = value.as_sequence() else {
        return Err(DistroError::invalid(format!(
            "{} must be a list of names",
            context
        )));
    };

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                DistroError::invalid(format!("{} entries must be strings: {:?}", context, item))
            })
        })
        .collect()
}

/// Read either a single string or a sequence of strings.
pub fn string_or_list(value: &Value, context: &str) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        other => string_list(other, context),
    }
}
