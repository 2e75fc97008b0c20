use std::collections::BTreeMap;
use std::iter::FromIterator;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::{serde_error, HadrError};

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// JSON bytes with object keys sorted at every depth.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, HadrError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("json_write", err))?;
    Ok(bytes)
}

/// Parses JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, HadrError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Renders YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, HadrError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Parses YAML bytes.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, HadrError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}
