//! Offline CommonMark renderer
//!
//! Used when the Homebrewery parser is not installed. It does not know the
//! brew extensions (page breaks, column breaks, curly-brace blocks); those are
//! left as plain text.

use super::Renderer;
use crate::error::RenderError;
use comrak::{markdown_to_html, Options};

/// Renders brew text as GitHub-flavoured markdown with comrak.
pub struct MarkdownRenderer {
    options: Options<'static>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: default_comrak_options(),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark renderer without brew extensions"
    }

    fn render(&self, text: &str) -> Result<String, RenderError> {
        Ok(markdown_to_html(text, &self.options))
    }
}

fn default_comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.header_ids = Some(String::new());
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}
