//! Template evaluation against a render context

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

use crate::context::RenderContext;
use crate::error::SyntaxError;
use crate::parser::ast::{Document, Node, Reference, SetValue, Span};

/// Errors raised while evaluating a parsed template
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Strict mode: a printed variable is not defined
    #[error("undefined variable '{name}' in template {template} at {span:?}")]
    UndefinedReference {
        template: String,
        name: String,
        span: Span,
    },
}

/// A parsed template, ready to render any number of times
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    document: Document,
}

impl Template {
    /// Parse template source
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, SyntaxError> {
        let name = name.into();
        match crate::parser::parse(source) {
            Ok(document) => Ok(Self { name, document }),
            Err(errors) => Err(SyntaxError {
                name,
                source_text: source.to_string(),
                errors,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate against `context`, applying any `#set` directives to it
    ///
    /// Undefined references print their source text, or nothing for the
    /// quiet `$!` form. With `strict`, an undefined non-quiet reference is an
    /// error instead.
    pub fn render(&self, context: &mut RenderContext, strict: bool) -> Result<String, EvalError> {
        let mut out = String::new();
        for node in &self.document.nodes {
            match &node.node {
                Node::Text(text) => out.push_str(text),
                Node::Print(reference) => match context.get(&reference.name).and_then(display) {
                    Some(text) => out.push_str(&text),
                    None if reference.quiet => {}
                    None if strict => {
                        return Err(EvalError::UndefinedReference {
                            template: self.name.clone(),
                            name: reference.name.clone(),
                            span: node.span.clone(),
                        });
                    }
                    None => out.push_str(&reference.raw),
                },
                Node::Set { target, value } => {
                    if let Some(value) = resolve(value, context) {
                        context.insert(target.clone(), value);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Value to assign; `None` when copying from an undefined variable
fn resolve(value: &SetValue, context: &RenderContext) -> Option<Value> {
    match value {
        SetValue::Literal(v) => Some(v.clone()),
        SetValue::Reference(Reference { name, .. }) => context.get_non_null(name).cloned(),
    }
}

/// Text form of a value; `None` for null
fn display(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s)),
        other => Some(Cow::Owned(other.to_string())),
    }
}
