//! Template registry: named templates in memory, with an optional directory

use std::collections::HashMap;
use std::io;
use std::path::{Component, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::context::RenderContext;
use crate::source::{LookupError, TemplateSource};

use super::eval::Template;
use super::EngineError;

/// Errors that can occur while registering templates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Duplicate template definition
    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },
}

/// Store of named templates, usable as a [`TemplateSource`]
///
/// Templates registered in memory take precedence. Other names are read from
/// `<base>/<prefix><name><suffix>` when a base path is set. Sources are parsed
/// on every lookup; nothing is cached.
///
/// Templates can be added and removed through a shared reference, so the set
/// may change between a pre-flight check and a render.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, String>>,
    /// Base path for file-backed templates
    base_path: Option<PathBuf>,
    prefix: String,
    suffix: String,
    strict: bool,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new registry that reads templates from a directory
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            ..Self::default()
        }
    }

    /// Set the file name prefix for file-backed templates
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the file name suffix for file-backed templates (e.g. `.vm`)
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Fail on undefined references instead of printing them
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Register a template, refusing to replace an existing one
    pub fn register(
        &self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut templates = self.write();
        if templates.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        templates.insert(name, source.into());
        Ok(())
    }

    /// Add or replace a template, returning the previous source
    pub fn insert(&self, name: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.write().insert(name.into(), source.into())
    }

    /// Remove an in-memory template
    pub fn remove(&self, name: &str) -> Option<String> {
        self.write().remove(name)
    }

    /// Check if a template is registered in memory
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Names of in-memory templates, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// File path a template name maps to, if file lookup is enabled
    ///
    /// Names that would escape the base directory map to nothing.
    pub fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        let base = self.base_path.as_ref()?;
        let relative = PathBuf::from(format!("{}{}{}", self.prefix, name, self.suffix));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(base.join(relative))
    }

    /// Get the source text of a template
    pub fn load_source(&self, name: &str) -> Result<String, LookupError<EngineError>> {
        if let Some(source) = self.read().get(name) {
            return Ok(source.clone());
        }

        let Some(path) = self.resolve_path(name) else {
            return Err(LookupError::not_found(name));
        };
        match std::fs::read_to_string(&path) {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LookupError::not_found(name)),
            Err(e) => Err(LookupError::invalid(
                name,
                EngineError::Read {
                    path,
                    message: e.to_string(),
                },
            )),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemplateSource for TemplateRegistry {
    type Template = Template;
    type Error = EngineError;

    fn lookup(&self, name: &str) -> Result<Template, LookupError<EngineError>> {
        let source = self.load_source(name)?;
        Template::parse(name, &source).map_err(|e| LookupError::invalid(name, e.into()))
    }

    fn render(
        &self,
        template: &Template,
        context: &mut RenderContext,
    ) -> Result<String, EngineError> {
        Ok(template.render(context, self.strict)?)
    }
}
