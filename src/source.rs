//! The template lookup capability consumed by the layout renderer

use std::sync::Arc;

use thiserror::Error;

use crate::context::RenderContext;

/// Failure to resolve a template by name
#[derive(Debug, Error)]
pub enum LookupError<E> {
    /// No template with this name exists
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// The template exists but could not be loaded (e.g. a syntax error)
    #[error("could not load template {name}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: E,
    },
}

impl<E> LookupError<E> {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid(name: impl Into<String>, source: E) -> Self {
        Self::Invalid {
            name: name.into(),
            source,
        }
    }

    /// Name of the template that failed to resolve
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name } | Self::Invalid { name, .. } => name,
        }
    }
}

/// Looks up templates by logical name and evaluates them against a context
///
/// Whether repeated lookups return a shared handle or a fresh copy is up to
/// the implementation; callers borrow a handle for one render and drop it.
pub trait TemplateSource {
    /// A resolved, renderable template
    type Template;

    /// Engine-level failure (syntax or evaluation)
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve a template by logical name
    fn lookup(&self, name: &str) -> Result<Self::Template, LookupError<Self::Error>>;

    /// Evaluate a template, possibly setting variables in `context`
    fn render(
        &self,
        template: &Self::Template,
        context: &mut RenderContext,
    ) -> Result<String, Self::Error>;
}

impl<S: TemplateSource + ?Sized> TemplateSource for &S {
    type Template = S::Template;
    type Error = S::Error;

    fn lookup(&self, name: &str) -> Result<Self::Template, LookupError<Self::Error>> {
        (**self).lookup(name)
    }

    fn render(
        &self,
        template: &Self::Template,
        context: &mut RenderContext,
    ) -> Result<String, Self::Error> {
        (**self).render(template, context)
    }
}

impl<S: TemplateSource + ?Sized> TemplateSource for Arc<S> {
    type Template = S::Template;
    type Error = S::Error;

    fn lookup(&self, name: &str) -> Result<Self::Template, LookupError<Self::Error>> {
        (**self).lookup(name)
    }

    fn render(
        &self,
        template: &Self::Template,
        context: &mut RenderContext,
    ) -> Result<String, Self::Error> {
        (**self).render(template, context)
    }
}
