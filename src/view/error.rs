//! Error types for the layout renderer

use thiserror::Error;

use crate::source::LookupError;

/// Boxed underlying cause from the template engine
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors resolving a named template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template source has no template with this name
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// The template exists but failed to load (e.g. malformed)
    #[error("could not load template {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl TemplateError {
    /// Name of the offending template
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name } | Self::Load { name, .. } => name,
        }
    }
}

impl<E> From<LookupError<E>> for TemplateError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: LookupError<E>) -> Self {
        match err {
            LookupError::NotFound { name } => Self::NotFound { name },
            LookupError::Invalid { name, source } => Self::Load {
                name,
                source: Box::new(source),
            },
        }
    }
}

/// Errors that can occur while composing a page
#[derive(Debug, Error)]
pub enum RenderError {
    /// Content or layout template could not be resolved
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The content pass failed; nothing was written to the output
    #[error("failed to render content template {name}: {source}")]
    ContentRender {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The layout pass failed; the output may hold a partial render
    #[error("failed to render layout template {name}: {source}")]
    LayoutRender {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The layout key holds something other than a template name
    #[error("context value at '{key}' is not a layout name (expected a string, got {value})")]
    InvalidLayoutName { key: String, value: String },

    /// Writing to the output sink failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn content<E>(name: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ContentRender {
            name: name.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn layout<E>(name: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::LayoutRender {
            name: name.to_string(),
            source: Box::new(source),
        }
    }

    /// Name of the template involved, if the error concerns one
    pub fn template_name(&self) -> Option<&str> {
        match self {
            Self::Template(e) => Some(e.name()),
            Self::ContentRender { name, .. } | Self::LayoutRender { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True if the template source reported `name` as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Template(TemplateError::NotFound { .. }))
    }
}

impl<E> From<LookupError<E>> for RenderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: LookupError<E>) -> Self {
        Self::Template(err.into())
    }
}
