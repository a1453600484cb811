//! Layout View - page composition from content and layout templates
//!
//! A page is rendered in two passes. The content template renders first and
//! may pick a layout by setting the `layout` variable. The chosen layout (or
//! the configured default) then renders with the content available as
//! `$screen_content`.
//!
//! # Example
//!
//! ```rust
//! use layout_view::{render_view, RenderContext, RendererConfig, TemplateRegistry};
//!
//! let registry = TemplateRegistry::new();
//! registry.insert("index", "#set($layout = \"shell\")<p>Hi</p>");
//! registry.insert("shell", "<html>$screen_content</html>");
//!
//! let page = render_view(&registry, RendererConfig::default(), "index", RenderContext::new())
//!     .unwrap();
//! assert_eq!(page, "<html><p>Hi</p></html>");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod parser;
pub mod source;
pub mod template;
pub mod view;

pub use config::{ConfigError, ViewConfig};
pub use context::{ContextError, RenderContext};
pub use error::{ParseError, SyntaxError};
pub use source::{LookupError, TemplateSource};
pub use template::{EngineError, Template, TemplateRegistry};
pub use view::{LayoutDecision, LayoutRenderer, RenderError, RendererConfig, TemplateError};

/// Render one view to a string
///
/// Convenience for one-off renders; long-lived callers should keep a
/// [`LayoutRenderer`] around instead.
pub fn render_view<S: TemplateSource>(
    source: S,
    config: RendererConfig,
    view: &str,
    mut context: RenderContext,
) -> Result<String, RenderError> {
    LayoutRenderer::with_config(source, config).render_to_string(view, &mut context)
}
