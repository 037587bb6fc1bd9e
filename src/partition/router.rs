//! Parent stream partition router

use super::types::{ParentLink, PartitionValue};
use crate::error::{Error, Result};
use serde_json::Value;

/// Creates one partition per parent record
///
/// Every parent record must carry its key; a record without one fails the
/// dependent stream. Duplicate keys are not collapsed: each parent record
/// produces its own child request.
///
/// String keys are percent-encoded before they reach the path template, so
/// a key always fills exactly one path segment. `.` and `..` cannot be
/// encoded away and are rejected.
#[derive(Debug, Clone)]
pub struct ParentRouter {
    /// Dependent stream name, for error messages
    stream: String,
    /// Key to extract from parent records (dot path)
    parent_key: String,
    /// Field name for partition
    partition_field: String,
}

impl ParentRouter {
    /// Create a new parent router
    pub fn new(
        stream: impl Into<String>,
        parent_key: impl Into<String>,
        partition_field: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            parent_key: parent_key.into(),
            partition_field: partition_field.into(),
        }
    }

    /// Router for a dependent stream's parent link
    pub fn from_link(stream: impl Into<String>, link: &ParentLink) -> Self {
        Self::new(stream, link.parent_key, link.partition_field)
    }

    /// Field name the partition value is stored under
    pub fn partition_field(&self) -> &str {
        &self.partition_field
    }

    /// Route one parent record
    pub fn partition_for(&self, record: &Value) -> Result<PartitionValue> {
        let key = self
            .parent_key
            .split('.')
            .try_fold(record, |current, part| current.as_object()?.get(part));

        let (id, value) = match key {
            Some(Value::String(s)) if s == "." || s == ".." => {
                return Err(Error::partition(
                    &self.stream,
                    format!("parent key '{}' is not a usable path segment: {s:?}", self.parent_key),
                ))
            }
            Some(Value::String(s)) if !s.is_empty() => (
                s.clone(),
                Value::String(urlencoding::encode(s).into_owned()),
            ),
            Some(Value::Number(n)) => (n.to_string(), Value::Number(n.clone())),
            None | Some(Value::Null | Value::String(_)) => {
                return Err(Error::partition(
                    &self.stream,
                    format!("parent record has no '{}'", self.parent_key),
                ))
            }
            Some(other) => {
                return Err(Error::partition(
                    &self.stream,
                    format!("parent key '{}' is not a string or number: {other}", self.parent_key),
                ))
            }
        };

        Ok(PartitionValue::new(id).with_value(self.partition_field.clone(), value))
    }
}
