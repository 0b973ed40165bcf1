//! The attested payload: a validated JSON object.
//!
//! Every payload is checked at the boundary, before it can reach the
//! canonicalizer:
//! - The top level is an object
//! - Numbers are integers within JavaScript's safe range (no floats)
//! - Nesting is bounded by [`MAX_DEPTH`]
//!
//! These rules keep the canonical encoding reproducible by any JSON
//! implementation on the verifying side.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Maximum nesting depth of objects and arrays.
pub const MAX_DEPTH: usize = 32;

/// Largest integer magnitude every JSON implementation represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// A key-value mapping to be attested. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Validate an arbitrary JSON value as a payload.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                for (key, value) in &map {
                    validate_value(value, 1).map_err(|e| prefix_error(key, e))?;
                }
                Ok(Self(map))
            }
            other => Err(Error::PayloadFormat(format!(
                "payload must be an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Parse and validate a payload from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::PayloadFormat(e.to_string()))?;
        Self::from_value(value)
    }

    /// A single-field payload `{"message": <text>}`.
    pub fn message(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(text.into()));
        Self(map)
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into a plain JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for Payload {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        payload.into_value()
    }
}

fn validate_value(value: &Value, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::PayloadFormat(format!(
            "nesting exceeds maximum depth of {}",
            MAX_DEPTH
        )));
    }

    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            let safe = if let Some(i) = n.as_i64() {
                (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i)
            } else if let Some(u) = n.as_u64() {
                u <= MAX_SAFE_INTEGER as u64
            } else {
                return Err(Error::PayloadFormat(format!(
                    "floating point number {} is not supported",
                    n
                )));
            };
            if safe {
                Ok(())
            } else {
                Err(Error::PayloadFormat(format!(
                    "integer {} is outside the safe range",
                    n
                )))
            }
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| {
                validate_value(item, depth + 1).map_err(|e| prefix_error(&i.to_string(), e))
            }),
        Value::Object(map) => map.iter().try_for_each(|(key, item)| {
            validate_value(item, depth + 1).map_err(|e| prefix_error(key, e))
        }),
    }
}

/// Prepend a path segment so errors point at the offending field.
fn prefix_error(segment: &str, error: Error) -> Error {
    match error {
        Error::PayloadFormat(msg) if msg.starts_with("at ") => {
            Error::PayloadFormat(format!("at {}.{}", segment, &msg[3..]))
        }
        Error::PayloadFormat(msg) => Error::PayloadFormat(format!("at {}: {}", segment, msg)),
        other => other,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
