//! Two-pass content + layout composition

use std::io::Write;

use serde_json::Value;

use crate::context::RenderContext;
use crate::source::TemplateSource;

use super::config::RendererConfig;
use super::error::{RenderError, TemplateError};

/// Which layout, if any, wraps the rendered content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDecision {
    /// No layout; the content is the whole page
    None,
    /// The page requested this layout through the layout key
    Explicit(String),
    /// The renderer's configured default layout
    Default(String),
}

impl LayoutDecision {
    /// Layout template name, if one was chosen
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Explicit(name) | Self::Default(name) => Some(name),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Explicit(_) => "explicit",
            Self::Default(_) => "default",
        }
    }
}

/// Renders a content template, then wraps it in a layout template
///
/// The content is rendered into a buffer first. If a layout applies, the
/// buffer is stored in the context under the screen content key and the
/// layout is rendered to the output; otherwise the buffer is written as is.
///
/// The configuration is read-only, so one renderer may serve concurrent
/// calls as long as each call gets its own context and sink.
#[derive(Debug, Clone)]
pub struct LayoutRenderer<S> {
    source: S,
    config: RendererConfig,
}

impl<S: TemplateSource> LayoutRenderer<S> {
    /// Create a renderer with default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, RendererConfig::default())
    }

    pub fn with_config(source: S, config: RendererConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Check that the content template and the default layout resolve
    ///
    /// This is a pre-flight check only: templates may disappear before the
    /// actual render, and a layout chosen by the page itself is never known
    /// here.
    pub fn validate(&self, content_name: &str) -> Result<(), TemplateError> {
        tracing::debug!(template = content_name, "checking content template");
        self.source.lookup(content_name)?;

        if let Some(layout) = &self.config.default_layout {
            tracing::debug!(template = %layout, "checking default layout template");
            self.source.lookup(layout)?;
        }
        Ok(())
    }

    /// Decide which layout applies given the context after the content pass
    pub fn resolve_layout(&self, context: &RenderContext) -> Result<LayoutDecision, RenderError> {
        let key = &self.config.layout_key;
        match context.get_non_null(key) {
            Some(Value::String(name)) => Ok(LayoutDecision::Explicit(name.clone())),
            Some(other) => Err(RenderError::InvalidLayoutName {
                key: key.clone(),
                value: other.to_string(),
            }),
            None => Ok(self
                .config
                .default_layout
                .clone()
                .map_or(LayoutDecision::None, LayoutDecision::Default)),
        }
    }

    /// Render `content_name`, wrapped in its layout, into `sink`
    ///
    /// A content failure leaves `sink` untouched. A layout failure may leave
    /// a partial layout render in `sink`.
    pub fn render<W>(
        &self,
        content_name: &str,
        context: &mut RenderContext,
        sink: &mut W,
    ) -> Result<(), RenderError>
    where
        W: Write + ?Sized,
    {
        tracing::debug!(template = content_name, "rendering screen content template");

        let content = {
            let template = self.source.lookup(content_name)?;
            self.source
                .render(&template, context)
                .map_err(|e| RenderError::content(content_name, e))?
        };

        let decision = self.resolve_layout(context)?;
        let Some(layout_name) = decision.name() else {
            tracing::debug!("no layout requested and no default layout configured");
            sink.write_all(content.as_bytes())?;
            return Ok(());
        };
        tracing::debug!(
            layout = layout_name,
            kind = decision.kind(),
            "screen content template requested layout"
        );

        context.insert(self.config.screen_content_key.clone(), content);

        let layout = self.source.lookup(layout_name)?;
        let page = self
            .source
            .render(&layout, context)
            .map_err(|e| RenderError::layout(layout_name, e))?;
        sink.write_all(page.as_bytes())?;
        Ok(())
    }

    /// Render into a fresh string
    pub fn render_to_string(
        &self,
        content_name: &str,
        context: &mut RenderContext,
    ) -> Result<String, RenderError> {
        let mut out = Vec::new();
        self.render(content_name, context, &mut out)?;
        // Both passes produce `String`s, so the buffer is valid UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use thiserror::Error;

    use crate::source::LookupError;

    #[derive(Debug, Error, PartialEq)]
    enum FakeError {
        #[error("fake engine failure")]
        Failed,
        #[error("fake syntax error")]
        Syntax,
    }

    /// What a fake template does when rendered
    #[derive(Debug, Clone)]
    enum Fake {
        /// Emit this text, replacing `{content}` with the screen content
        Text(&'static str),
        /// Set a context variable, then emit text
        SetThen(&'static str, Value, &'static str),
        Fail,
        Malformed,
    }

    #[derive(Default)]
    struct FakeSource {
        templates: HashMap<&'static str, Fake>,
        lookups: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with(mut self, name: &'static str, t: Fake) -> Self {
            self.templates.insert(name, t);
            self
        }
    }

    impl TemplateSource for FakeSource {
        type Template = Fake;
        type Error = FakeError;

        fn lookup(&self, name: &str) -> Result<Fake, LookupError<FakeError>> {
            self.lookups.borrow_mut().push(name.to_string());
            match self.templates.get(name) {
                Some(Fake::Malformed) => Err(LookupError::invalid(name, FakeError::Syntax)),
                Some(t) => Ok(t.clone()),
                None => Err(LookupError::not_found(name)),
            }
        }

        fn render(&self, t: &Fake, ctx: &mut RenderContext) -> Result<String, FakeError> {
            let content = ctx
                .get("screen_content")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            match t {
                Fake::Text(s) => Ok(s.replace("{content}", &content)),
                Fake::SetThen(key, value, s) => {
                    ctx.insert(*key, value.clone());
                    Ok(s.replace("{content}", &content))
                }
                Fake::Fail | Fake::Malformed => Err(FakeError::Failed),
            }
        }
    }

    fn site() -> FakeSource {
        FakeSource::default()
            .with("index", Fake::Text("<p>Hi</p>"))
            .with("shell", Fake::Text("<html>{content}</html>"))
            .with("alt", Fake::Text("<alt>{content}</alt>"))
    }

    #[test]
    fn test_no_layout_writes_content_verbatim() {
        let renderer = LayoutRenderer::new(site());
        let mut ctx = RenderContext::new();
        let out = renderer.render_to_string("index", &mut ctx).unwrap();
        assert_eq!(out, "<p>Hi</p>");
        assert!(!ctx.contains_key("screen_content"));
        assert_eq!(*renderer.source().lookups.borrow(), vec!["index"]);
    }

    #[test]
    fn test_default_layout_wraps_content() {
        let renderer =
            LayoutRenderer::with_config(site(), RendererConfig::new().with_default_layout("shell"));
        let mut ctx = RenderContext::new();
        let out = renderer.render_to_string("index", &mut ctx).unwrap();
        assert_eq!(out, "<html><p>Hi</p></html>");
        assert_eq!(ctx.get("screen_content"), Some(&json!("<p>Hi</p>")));
        assert!(!ctx.contains_key("layout"));
    }

    #[test]
    fn test_explicit_layout_beats_default() {
        let source = site().with("page", Fake::SetThen("layout", json!("alt"), "body"));
        let renderer =
            LayoutRenderer::with_config(source, RendererConfig::new().with_default_layout("shell"));
        let mut ctx = RenderContext::new();
        let out = renderer.render_to_string("page", &mut ctx).unwrap();
        assert_eq!(out, "<alt>body</alt>");
    }

    #[test]
    fn test_null_layout_falls_back_to_default() {
        let renderer =
            LayoutRenderer::with_config(site(), RendererConfig::new().with_default_layout("shell"));
        let mut ctx = RenderContext::new();
        ctx.insert("layout", Value::Null);
        let out = renderer.render_to_string("index", &mut ctx).unwrap();
        assert_eq!(out, "<html><p>Hi</p></html>");
    }

    #[test]
    fn test_screen_content_overwrites_previous_value() {
        let renderer =
            LayoutRenderer::with_config(site(), RendererConfig::new().with_default_layout("shell"));
        let mut ctx = RenderContext::new();
        ctx.insert("screen_content", "stale");
        renderer.render_to_string("index", &mut ctx).unwrap();
        assert_eq!(ctx.get("screen_content"), Some(&json!("<p>Hi</p>")));
    }

    #[test]
    fn test_custom_keys() {
        let source = FakeSource::default()
            .with("page", Fake::SetThen("frame", json!("shell"), "x"))
            .with("shell", Fake::Text("[{content}]"));
        let config = RendererConfig::new()
            .with_layout_key("frame")
            .with_screen_content_key("body");
        let renderer = LayoutRenderer::with_config(source, config);
        let mut ctx = RenderContext::new();
        let out = renderer.render_to_string("page", &mut ctx).unwrap();
        // The fake layout reads `screen_content`, which is never set here
        assert_eq!(out, "[]");
        assert_eq!(ctx.get("body"), Some(&json!("x")));
        assert!(!ctx.contains_key("screen_content"));
    }

    #[test]
    fn test_missing_content_writes_nothing() {
        let renderer = LayoutRenderer::new(site());
        let mut out = Vec::new();
        let err = renderer
            .render("missing", &mut RenderContext::new(), &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Template(TemplateError::NotFound { ref name }) if name == "missing"
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_content_failure_writes_nothing() {
        let source = site().with("broken", Fake::Fail);
        let renderer =
            LayoutRenderer::with_config(source, RendererConfig::new().with_default_layout("shell"));
        let mut out = Vec::new();
        let err = renderer
            .render("broken", &mut RenderContext::new(), &mut out)
            .unwrap_err();
        assert!(matches!(err, RenderError::ContentRender { ref name, .. } if name == "broken"));
        assert!(out.is_empty());
        // The layout is never looked up once the content pass fails
        assert_eq!(*renderer.source().lookups.borrow(), vec!["broken"]);
    }

    #[test]
    fn test_layout_failure_is_reported() {
        let source = site().with("bad_shell", Fake::Fail);
        let renderer = LayoutRenderer::with_config(
            source,
            RendererConfig::new().with_default_layout("bad_shell"),
        );
        let err = renderer
            .render_to_string("index", &mut RenderContext::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::LayoutRender { ref name, .. } if name == "bad_shell"));
    }

    #[test]
    fn test_missing_explicit_layout() {
        let source = site().with("page", Fake::SetThen("layout", json!("gone"), "x"));
        let renderer = LayoutRenderer::new(source);
        let mut out = Vec::new();
        let err = renderer
            .render("page", &mut RenderContext::new(), &mut out)
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.template_name(), Some("gone"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_string_layout_rejected() {
        let renderer = LayoutRenderer::new(site());
        let mut ctx = RenderContext::new();
        ctx.insert("layout", 42);
        let mut out = Vec::new();
        let err = renderer.render("index", &mut ctx, &mut out).unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayoutName { ref key, .. } if key == "layout"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_resolve_layout_priority() {
        let renderer =
            LayoutRenderer::with_config(site(), RendererConfig::new().with_default_layout("shell"));
        let mut ctx = RenderContext::new();
        assert_eq!(
            renderer.resolve_layout(&ctx).unwrap(),
            LayoutDecision::Default("shell".into())
        );
        ctx.insert("layout", "alt");
        assert_eq!(
            renderer.resolve_layout(&ctx).unwrap(),
            LayoutDecision::Explicit("alt".into())
        );

        let bare = LayoutRenderer::new(site());
        assert_eq!(
            bare.resolve_layout(&RenderContext::new()).unwrap(),
            LayoutDecision::None
        );
    }

    #[test]
    fn test_validate_checks_content_and_default_layout() {
        let renderer =
            LayoutRenderer::with_config(site(), RendererConfig::new().with_default_layout("shell"));
        renderer.validate("index").unwrap();
        assert_eq!(*renderer.source().lookups.borrow(), vec!["index", "shell"]);

        let err = renderer.validate("missing").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { ref name } if name == "missing"));
    }

    #[test]
    fn test_validate_missing_default_layout() {
        let renderer =
            LayoutRenderer::with_config(site(), RendererConfig::new().with_default_layout("nope"));
        let err = renderer.validate("index").unwrap_err();
        assert_eq!(err.name(), "nope");
    }

    #[test]
    fn test_validate_load_error() {
        let source = site().with("ugly", Fake::Malformed);
        let renderer = LayoutRenderer::new(source);
        let err = renderer.validate("ugly").unwrap_err();
        assert!(matches!(err, TemplateError::Load { ref name, .. } if name == "ugly"));
    }

    #[test]
    fn test_validate_ignores_page_override() {
        // "page" asks for a layout that does not exist; validate cannot know
        let source = site().with("page", Fake::SetThen("layout", json!("gone"), "x"));
        let renderer = LayoutRenderer::new(source);
        renderer.validate("page").unwrap();
        assert_eq!(*renderer.source().lookups.borrow(), vec!["page"]);
    }
}
