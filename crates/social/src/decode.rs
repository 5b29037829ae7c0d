//! JSON decoding of raw payloads.
//!
//! Decoding is pure and CPU-bound. The adapter runs these functions on its
//! designated [`promise::Executor`]; they are public so callers holding a
//! [`crate::RawPayload`] from elsewhere can apply the same rules.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DecodeError;

/// A decoded top-level JSON object.
pub type JsonMapping = serde_json::Map<String, Value>;

/// A decoded top-level JSON array.
pub type JsonSequence = Vec<Value>;

/// The top-level kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonShape {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl JsonShape {
    /// Returns the shape of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
        }
    }
}

impl std::fmt::Display for JsonShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// Decodes `bytes` as a JSON object.
pub fn decode_mapping(bytes: &[u8]) -> Result<JsonMapping, DecodeError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(mapping) => Ok(mapping),
        other => Err(DecodeError::UnexpectedShape {
            expected: JsonShape::Object,
            found: JsonShape::of(&other),
        }),
    }
}

/// Decodes `bytes` as a JSON array.
pub fn decode_sequence(bytes: &[u8]) -> Result<JsonSequence, DecodeError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(sequence) => Ok(sequence),
        other => Err(DecodeError::UnexpectedShape {
            expected: JsonShape::Array,
            found: JsonShape::of(&other),
        }),
    }
}

/// Decodes `bytes` into any deserialisable type.
///
/// Type mismatches are reported as [`DecodeError::Malformed`] with serde's
/// description of the mismatch.
pub fn decode_typed<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}
