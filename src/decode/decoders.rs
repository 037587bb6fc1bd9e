//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::Result;
use serde_json::Value;
use tracing::warn;

// ============================================================================
// Envelope Decoder
// ============================================================================

/// Extracts the array stored under one top-level field
///
/// A missing or null field yields no records. A field holding anything
/// other than an array also yields no records, with a warning.
#[derive(Debug, Clone)]
pub struct EnvelopeDecoder {
    field: String,
}

impl EnvelopeDecoder {
    /// Create a decoder for the named field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Name of the envelope field
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl RecordDecoder for EnvelopeDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<Value>> {
        match body.get(&self.field) {
            Some(Value::Array(records)) => Ok(records.clone()),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(other) => {
                warn!(
                    "Envelope field '{}' is not an array ({}), yielding no records",
                    self.field,
                    json_type(other)
                );
                Ok(Vec::new())
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Object Decoder
// ============================================================================

/// The entire body is a single record
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDecoder;

impl RecordDecoder for ObjectDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<Value>> {
        Ok(vec![body.clone()])
    }
}
