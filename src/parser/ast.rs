//! Syntax tree for the template language

use serde_json::Value;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A variable reference like `$name` or `$!{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Variable name without sigils
    pub name: String,
    /// `$!` form: print nothing when undefined
    pub quiet: bool,
    /// Source text, printed as is when the variable is undefined
    pub raw: String,
}

impl Reference {
    /// Build from the reference token text
    pub fn from_raw(raw: &str) -> Self {
        let (name, quiet) = super::lexer::split_reference(raw);
        Self {
            name: name.to_string(),
            quiet,
            raw: raw.to_string(),
        }
    }
}

/// Right-hand side of a `#set` directive
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Literal(Value),
    Reference(Reference),
}

/// A piece of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, copied to the output
    Text(String),
    /// `$name`: print a context value
    Print(Reference),
    /// `#set($name = value)`: assign a context value
    Set { target: String, value: SetValue },
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub nodes: Vec<Spanned<Node>>,
}
