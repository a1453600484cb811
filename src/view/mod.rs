//! Page composition from a content template and a layout template
//!
//! A [`LayoutRenderer`] renders the content template first, then looks for a
//! layout: the one the page asked for through the layout key, else the
//! configured default, else none. The rendered content reaches the layout as
//! the screen content variable.
//!
//! # Example
//!
//! ```rust
//! use layout_view::{LayoutRenderer, RenderContext, RendererConfig, TemplateRegistry};
//!
//! let registry = TemplateRegistry::new();
//! registry.insert("index", "<p>Hi</p>");
//! registry.insert("shell", "<html>$screen_content</html>");
//!
//! let renderer = LayoutRenderer::with_config(
//!     registry,
//!     RendererConfig::new().with_default_layout("shell"),
//! );
//! let page = renderer
//!     .render_to_string("index", &mut RenderContext::new())
//!     .unwrap();
//! assert_eq!(page, "<html><p>Hi</p></html>");
//! ```

mod config;
mod error;
mod renderer;

pub use config::{RendererConfig, DEFAULT_LAYOUT_KEY, DEFAULT_SCREEN_CONTENT_KEY};
pub use error::{BoxError, RenderError, TemplateError};
pub use renderer::{LayoutDecision, LayoutRenderer};
