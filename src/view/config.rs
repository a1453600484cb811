//! Configuration for the layout renderer

/// Default context key a content template sets to pick its layout
pub const DEFAULT_LAYOUT_KEY: &str = "layout";

/// Default context key the layout reads the rendered content from
pub const DEFAULT_SCREEN_CONTENT_KEY: &str = "screen_content";

/// Settings fixed at construction time of a [`LayoutRenderer`](super::LayoutRenderer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Context key holding a per-page layout override
    pub layout_key: String,

    /// Context key the rendered content is exposed under
    pub screen_content_key: String,

    /// Layout used when the page does not request one
    pub default_layout: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            layout_key: DEFAULT_LAYOUT_KEY.to_string(),
            screen_content_key: DEFAULT_SCREEN_CONTENT_KEY.to_string(),
            default_layout: None,
        }
    }
}

impl RendererConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout override key
    pub fn with_layout_key(mut self, key: impl Into<String>) -> Self {
        self.layout_key = key.into();
        self
    }

    /// Set the screen content key
    pub fn with_screen_content_key(mut self, key: impl Into<String>) -> Self {
        self.screen_content_key = key.into();
        self
    }

    /// Set the default layout
    pub fn with_default_layout(mut self, name: impl Into<String>) -> Self {
        self.default_layout = Some(name.into());
        self
    }

    /// Render pages without a layout unless they request one
    pub fn without_default_layout(mut self) -> Self {
        self.default_layout = None;
        self
    }
}
