//! Renderers: brew text in, HTML out
//!
//! The renderer is an opaque capability. The pipeline only relies on the
//! [`Renderer`] contract, so the real parser (a script downloaded from the
//! Homebrewery site) and a local CommonMark fallback are interchangeable, and
//! tests can substitute a fake.

pub mod markdown;
#[cfg(feature = "native-render")]
pub mod script;

use crate::error::RenderError;
use std::collections::HashMap;

pub use markdown::MarkdownRenderer;
#[cfg(feature = "native-render")]
pub use script::ScriptRenderer;

/// Converts brew source text to an HTML fragment.
pub trait Renderer {
    /// Registry name (e.g. "homebrewery", "markdown")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Render `text`.
    ///
    /// `RenderError::Unavailable` means the renderer could not be started at
    /// all; `RenderError::Failed` means it ran and broke.
    fn render(&self, text: &str) -> Result<String, RenderError>;
}

/// Named collection of renderers.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in renderer.
    ///
    /// `parser_script` is where the downloaded Homebrewery parser lives.
    pub fn with_builtins(parser_script: impl Into<std::path::PathBuf>) -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownRenderer::new());
        #[cfg(feature = "native-render")]
        registry.register(ScriptRenderer::new(parser_script));
        #[cfg(not(feature = "native-render"))]
        let _ = parser_script.into();
        registry
    }

    /// Register a renderer, replacing any with the same name
    pub fn register<R: Renderer + 'static>(&mut self, renderer: R) {
        self.renderers
            .insert(renderer.name().to_string(), Box::new(renderer));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Renderer, RenderError> {
        self.renderers
            .get(name)
            .map(|r| r.as_ref())
            .ok_or_else(|| RenderError::NotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Sorted renderer names
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.renderers.keys().cloned().collect();
        names.sort();
        names
    }
}
