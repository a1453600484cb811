//! Reference template engine
//!
//! A small template language: literal text, `$name` / `${name}`
//! references, quiet `$!name` references, `#set($name = value)` and `##` /
//! `#* *#` comments. The layout renderer only sees it through
//! [`TemplateSource`](crate::TemplateSource), so any other engine can take
//! its place.
//!
//! # Example
//!
//! ```text
//! #set($layout = "shell")
//! <h1>$title</h1>
//! ```

mod eval;
mod registry;

use std::path::PathBuf;

use thiserror::Error;

use crate::error::SyntaxError;

pub use eval::{EvalError, Template};
pub use registry::{RegistryError, TemplateRegistry};

/// Failures of the reference engine
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Template file exists but could not be read
    #[error("error reading template file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
}
