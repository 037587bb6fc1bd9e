//! Path templates
//!
//! Child resource paths name their parent reference with a placeholder,
//! e.g. `broadcasts/{{ partition.broadcast_id }}/metrics`. Rendering
//! substitutes the values of the current partition.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Current partition values
    pub partition: Value,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context for one partition
    pub fn with_partition(partition: Value) -> Self {
        Self { partition }
    }

    /// Get a value by path (e.g., "partition.broadcast_id")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let root = match parts.next()? {
            "partition" => &self.partition,
            _ => return None,
        };

        parts.try_fold(root, |current, part| current.as_object()?.get(part))
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = TEMPLATE_REGEX.replace_all(template, |cap: &regex::Captures<'_>| {
        let var_path = &cap[1];
        match ctx.get(var_path) {
            Some(value) => value_to_string(value),
            None => {
                missing.push(var_path.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partition_substitution() {
        let ctx = TemplateContext::with_partition(json!({"broadcast_id": "17"}));
        let result = render("broadcasts/{{ partition.broadcast_id }}/metrics", &ctx).unwrap();
        assert_eq!(result, "broadcasts/17/metrics");
    }

    #[test]
    fn test_number_substitution() {
        let ctx = TemplateContext::with_partition(json!({"campaign_id": 42}));
        let result = render("campaigns/{{partition.campaign_id}}/actions", &ctx).unwrap();
        assert_eq!(result, "campaigns/42/actions");
    }

    #[test]
    fn test_undefined_variable() {
        let ctx = TemplateContext::with_partition(json!({"campaign_id": 1}));
        let err = render("broadcasts/{{ partition.broadcast_id }}", &ctx).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
        assert!(err.to_string().contains("partition.broadcast_id"));

        let err = render("{{ config.api_key }}", &ctx).unwrap_err();
        assert!(err.to_string().contains("config.api_key"));
    }

    #[test]
    fn test_no_templates() {
        let ctx = TemplateContext::new();
        assert_eq!(render("activities", &ctx).unwrap(), "activities");
    }

    #[test]
    fn test_whitespace_in_template() {
        let ctx = TemplateContext::with_partition(json!({"id": "x"}));

        assert_eq!(render("{{partition.id}}", &ctx).unwrap(), "x");
        assert_eq!(render("{{ partition.id }}", &ctx).unwrap(), "x");
        assert_eq!(render("{{  partition.id  }}", &ctx).unwrap(), "x");
    }
}
