//! Partition types

use crate::template::TemplateContext;
use serde_json::{Map, Value};

/// A single partition value
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionValue {
    /// Unique identifier for this partition (the parent reference)
    pub id: String,
    /// Values to inject into path templates
    pub values: Map<String, Value>,
}

impl PartitionValue {
    /// Create a new partition value
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Map::new(),
        }
    }

    /// Add a value to the partition
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Template context exposing these values as `partition.*`
    pub fn context(&self) -> TemplateContext {
        TemplateContext::with_partition(Value::Object(self.values.clone()))
    }
}

/// How a dependent resource refers to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the parent stream
    pub stream: &'static str,
    /// Field read from each parent record
    pub parent_key: &'static str,
    /// Partition field the child path template references
    pub partition_field: &'static str,
}
