//! Theme snippets
//!
//! A theme publishes groups of snippets. Running a snippet on the server
//! returns a block of brew text which is inserted into the editor at the
//! current selection.

use crate::error::FetchError;
use crate::remote::{Fetch, RemoteClient};
use serde::Deserialize;
use std::ops::Range;

/// Editor view a snippet group targets
pub const TEXT_VIEW: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetGroup {
    pub group_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub view: String,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

impl SnippetGroup {
    pub fn is_text(&self) -> bool {
        self.view == TEXT_VIEW
    }

    pub fn find(&self, name: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snippet {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Server path that generates the snippet text
    pub path: String,
}

/// Identifying class of a group's container: the name with its first space
/// replaced by `-`, suffixed with `-container`.
pub fn group_class(group: &SnippetGroup) -> String {
    format!("{}-container", group.group_name.replacen(' ', "-", 1))
}

/// Something holding text with a current selection.
pub trait EditorBuffer {
    /// Replace the selection with `text`
    fn replace_selection(&mut self, text: &str);
}

/// In-memory [`EditorBuffer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Range<usize>,
}

impl TextBuffer {
    /// Buffer with the cursor at the end of `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
        }
    }

    /// Select a byte range, clamped to the text and to char boundaries.
    pub fn select(&mut self, range: Range<usize>) {
        let start = self.floor_boundary(range.start);
        let end = self.floor_boundary(range.end).max(start);
        self.selection = start..end;
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    fn floor_boundary(&self, index: usize) -> usize {
        let mut index = index.min(self.text.len());
        while !self.text.is_char_boundary(index) {
            index -= 1;
        }
        index
    }
}

impl EditorBuffer for TextBuffer {
    fn replace_selection(&mut self, text: &str) {
        let start = self.selection.start;
        self.text.replace_range(self.selection.clone(), text);
        let cursor = start + text.len();
        self.selection = cursor..cursor;
    }
}

/// Open/closed state of the snippet groups of one theme.
#[derive(Debug, Clone)]
pub struct SnippetMenu {
    groups: Vec<SnippetGroup>,
    open: Option<usize>,
}

impl SnippetMenu {
    /// Menu with every group closed
    pub fn new(groups: Vec<SnippetGroup>) -> Self {
        Self { groups, open: None }
    }

    pub fn groups(&self) -> &[SnippetGroup] {
        &self.groups
    }

    /// The group currently shown, if any
    pub fn open_group(&self) -> Option<&SnippetGroup> {
        self.open.map(|i| &self.groups[i])
    }

    /// Toggle the group identified by `class` (see [`group_class`]).
    ///
    /// A closed group is opened and every other group closed; the open group
    /// is closed. Unknown classes change nothing.
    pub fn toggle(&mut self, class: &str) {
        let Some(index) = self.groups.iter().position(|g| group_class(g) == class) else {
            return;
        };
        let was_open = self.open == Some(index);
        self.hide_all();
        if !was_open {
            self.open = Some(index);
        }
    }

    pub fn hide_all(&mut self) {
        self.open = None;
    }

    /// Look up a snippet by group and snippet name
    pub fn find(&self, group_name: &str, snippet_name: &str) -> Option<&Snippet> {
        self.groups
            .iter()
            .find(|g| g.group_name == group_name)
            .and_then(|g| g.find(snippet_name))
    }

    /// Hide every group, run `snippet` on the server and insert its text.
    pub fn choose<F: Fetch>(
        &mut self,
        snippet: &Snippet,
        client: &RemoteClient<F>,
        editor: &mut dyn EditorBuffer,
    ) -> Result<(), FetchError> {
        self.hide_all();
        insert_snippet(snippet, client, editor)
    }
}

/// Run `snippet` and replace the editor selection with its output.
pub fn insert_snippet<F: Fetch>(
    snippet: &Snippet,
    client: &RemoteClient<F>,
    editor: &mut dyn EditorBuffer,
) -> Result<(), FetchError> {
    let text = client.run_snippet(&snippet.path)?;
    tracing::debug!(snippet = %snippet.name, len = text.len(), "Inserting snippet");
    editor.replace_selection(&text);
    Ok(())
}
