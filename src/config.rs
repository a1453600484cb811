//! File configuration for views
//!
//! A TOML file names the template directory and the layout settings:
//!
//! ```toml
//! [templates]
//! dir = "templates"
//! suffix = ".vm"
//!
//! [layout]
//! default = "layout"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::template::TemplateRegistry;
use crate::view::{RendererConfig, DEFAULT_LAYOUT_KEY, DEFAULT_SCREEN_CONTENT_KEY};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Where templates come from and how they are read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesSection {
    /// Directory holding template files
    pub dir: Option<PathBuf>,
    pub prefix: String,
    pub suffix: String,
    /// Fail on undefined references
    pub strict: bool,
}

impl Default for TemplatesSection {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: String::new(),
            suffix: ".vm".to_string(),
            strict: false,
        }
    }
}

/// Layout composition settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    /// Default layout template name
    pub default: Option<String>,
    pub key: String,
    pub screen_content_key: String,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            default: None,
            key: DEFAULT_LAYOUT_KEY.to_string(),
            screen_content_key: DEFAULT_SCREEN_CONTENT_KEY.to_string(),
        }
    }
}

/// Complete view configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub templates: TemplatesSection,
    pub layout: LayoutSection,
}

impl ViewConfig {
    /// Load configuration from a TOML file
    ///
    /// A relative template directory is taken relative to the file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let (Some(dir), Some(parent)) = (config.templates.dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = parent.join(&*dir);
            }
        }
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Renderer settings from the `[layout]` section
    pub fn renderer_config(&self) -> RendererConfig {
        let config = RendererConfig::new()
            .with_layout_key(self.layout.key.clone())
            .with_screen_content_key(self.layout.screen_content_key.clone());
        match &self.layout.default {
            Some(name) => config.with_default_layout(name.clone()),
            None => config,
        }
    }

    /// Template registry from the `[templates]` section
    pub fn registry(&self) -> TemplateRegistry {
        let registry = match &self.templates.dir {
            Some(dir) => TemplateRegistry::with_base_path(dir.clone()),
            None => TemplateRegistry::new(),
        };
        registry
            .with_prefix(self.templates.prefix.clone())
            .with_suffix(self.templates.suffix.clone())
            .with_strict(self.templates.strict)
    }
}
