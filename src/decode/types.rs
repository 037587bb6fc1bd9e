//! Decoder types and traits

use super::decoders::{EnvelopeDecoder, ObjectDecoder};
use crate::error::Result;
use serde_json::Value;

/// Shape of a resource's response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Records live in the named array field
    Envelope(&'static str),
    /// The whole body is one record
    Object,
}

impl ResponseShape {
    /// Build the decoder for this shape
    pub fn decoder(self) -> Box<dyn RecordDecoder> {
        match self {
            Self::Envelope(field) => Box::new(EnvelopeDecoder::new(field)),
            Self::Object => Box::new(ObjectDecoder),
        }
    }
}

/// Trait for turning a parsed response body into records
pub trait RecordDecoder: Send + Sync {
    /// Extract the records from a parsed body, in response order
    fn decode(&self, body: &Value) -> Result<Vec<Value>>;
}
