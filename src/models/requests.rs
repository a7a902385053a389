use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding a request body
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("could not read request body: {0}")]
    Unreadable(String),
}

/// Loosely typed measurement payload posted to a prediction endpoint
///
/// Field types are not known up front; each disease schema decides how a
/// value is coerced, so the body is kept as a raw JSON object.
#[derive(Debug, Clone, Default)]
pub struct PredictionPayload {
    fields: Map<String, Value>,
}

impl PredictionPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadError> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(PayloadError::NotAnObject(json_type_name(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for PredictionPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
