//! Render pipeline: active document to [`RenderedDocument`]
//!
//! One pass of the pipeline:
//!
//! 1. Look up the active document in [`BrewSettings`]. Unlinked documents are
//!    not brews and produce nothing.
//! 2. Take the text from the live editor buffer when one is open, otherwise
//!    read the saved file. An open but empty buffer skips the pass.
//! 3. Rewrite heading wiki links into markdown links.
//! 4. Render, then wrap the output in a single `div.brew` root.
//! 5. Pair it with the stylesheet URL of the brew's theme.

use crate::error::PipelineError;
use crate::links::substitute_links;
use crate::presenter::RenderedDocument;
use crate::remote::stylesheet_url;
use crate::render::Renderer;
use crate::settings::BrewSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Class of the single root element every rendered brew is wrapped in
pub const BREW_CLASS: &str = "brew";

/// Where the pipeline gets the active document from.
pub trait DocumentSource {
    /// Path of the active document, as registered in the settings
    fn active_path(&self) -> Option<PathBuf>;

    /// Text of the open editor buffer, if the document is being edited
    fn live_text(&self) -> Option<String> {
        None
    }

    /// Saved text of the document at `path`
    fn read_saved(&self, path: &Path) -> std::io::Result<String>;
}

/// A [`DocumentSource`] backed by a file under a root directory.
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    root: PathBuf,
    active: Option<PathBuf>,
}

impl FileDocumentSource {
    /// `active` is relative to `root`
    pub fn new(root: impl Into<PathBuf>, active: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active,
        }
    }
}

impl DocumentSource for FileDocumentSource {
    fn active_path(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    fn read_saved(&self, path: &Path) -> std::io::Result<String> {
        fs::read_to_string(self.root.join(path))
    }
}

/// Turns the active document into a [`RenderedDocument`].
pub struct RenderPipeline<'a> {
    renderer: &'a dyn Renderer,
    base_url: String,
    settings: &'a BrewSettings,
}

impl<'a> RenderPipeline<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        base_url: impl Into<String>,
        settings: &'a BrewSettings,
    ) -> Self {
        Self {
            renderer,
            base_url: base_url.into(),
            settings,
        }
    }

    /// Run one pass.
    ///
    /// `Ok(None)` means there is nothing to show: no active document, the
    /// document is not a linked brew, the live buffer is empty, or the
    /// renderer produced no markup.
    pub fn render(
        &self,
        source: &dyn DocumentSource,
    ) -> Result<Option<RenderedDocument>, PipelineError> {
        let Some(path) = source.active_path() else {
            return Ok(None);
        };
        let Some(brew) = self.settings.find(&path) else {
            tracing::trace!(path = %path.display(), "Not a linked brew");
            return Ok(None);
        };

        let text = match source.live_text() {
            Some(text) if text.is_empty() => {
                tracing::debug!(path = %path.display(), "Live buffer is empty, skipping");
                return Ok(None);
            }
            Some(text) => text,
            None => source
                .read_saved(&path)
                .map_err(|source| PipelineError::Read {
                    path: path.display().to_string(),
                    source,
                })?,
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = substitute_links(&text, &stem);

        let html = self.renderer.render(&text)?;
        if html.trim().is_empty() {
            tracing::debug!(renderer = self.renderer.name(), "Renderer produced no markup");
            return Ok(None);
        }

        tracing::debug!(
            path = %path.display(),
            renderer = self.renderer.name(),
            theme = %brew.theme,
            "Rendered brew"
        );
        Ok(Some(RenderedDocument::new(
            wrap_brew(&html),
            stylesheet_url(&self.base_url, &brew.theme),
        )))
    }
}

/// Wrap renderer output in the single `div.brew` root.
pub fn wrap_brew(html: &str) -> String {
    format!("<div class=\"{BREW_CLASS}\">{}</div>", html.trim())
}
