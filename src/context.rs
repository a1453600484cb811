//! Key-value context shared by the content and layout passes

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Error building a context from JSON
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
}

/// Ordered, mutable mapping from variable name to value
///
/// The same instance flows through both render passes. Values are opaque
/// to the layout renderer; only the reference engine looks inside them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    vars: IndexMap<String, Value>,
}

impl RenderContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object, keeping key order
    pub fn from_json(value: Value) -> Result<Self, ContextError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ContextError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Get a value by name, treating `null` as absent
    pub fn get_non_null(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).filter(|v| !v.is_null())
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    /// Remove a value, preserving the order of the remaining keys
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.shift_remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over variables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
