//! Brew registration settings.
//!
//! A document is only rendered as a brew when it has been linked here. Each
//! linked brew carries the theme its stylesheet is taken from.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Theme assigned to newly linked brews
pub const DEFAULT_THEME: &str = "5ePHB";

/// A document registered for brew rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedBrew {
    /// Path of the document, with or without the `.md` extension
    pub filepath: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl LinkedBrew {
    pub fn new(filepath: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            theme: DEFAULT_THEME.to_string(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Whether this entry refers to the document at `path`
    pub fn matches(&self, path: &str) -> bool {
        !self.filepath.is_empty()
            && (self.filepath == path || format!("{}.md", self.filepath) == path)
    }

    /// Display name: the last path component, or "Brew" when unset
    pub fn display_name(&self) -> &str {
        if self.filepath.is_empty() {
            return "Brew";
        }
        self.filepath
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filepath)
    }
}

/// All linked brews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewSettings {
    #[serde(default)]
    pub linked_files: Vec<LinkedBrew>,
}

impl BrewSettings {
    /// Brew settings for the document at `path`, if it is linked
    pub fn find(&self, path: impl AsRef<Path>) -> Option<&LinkedBrew> {
        let path = normalize_path(path.as_ref());
        self.linked_files.iter().find(|brew| brew.matches(&path))
    }

    /// Link a document. Returns `false` if it was already linked.
    pub fn add(&mut self, brew: LinkedBrew) -> bool {
        if self.linked_files.iter().any(|b| b.filepath == brew.filepath) {
            return false;
        }
        self.linked_files.push(brew);
        true
    }

    /// Unlink the brew registered as `filepath`. The document itself is untouched.
    pub fn remove(&mut self, filepath: &str) -> Option<LinkedBrew> {
        let index = self
            .linked_files
            .iter()
            .position(|b| b.filepath == filepath)?;
        Some(self.linked_files.remove(index))
    }

    /// Unlink every brew, returning how many were removed
    pub fn remove_all(&mut self) -> usize {
        let count = self.linked_files.len();
        self.linked_files.clear();
        count
    }

    /// Change the theme of a linked brew. Returns `false` if it is not linked.
    pub fn set_theme(&mut self, filepath: &str, theme: &str) -> bool {
        match self
            .linked_files
            .iter_mut()
            .find(|b| b.filepath == filepath)
        {
            Some(brew) => {
                brew.theme = theme.to_string();
                true
            }
            None => false,
        }
    }
}

/// Path as stored in the settings, without a leading `./`
pub fn normalize_path(path: &Path) -> String {
    let path = path.to_string_lossy();
    let mut rest = path.as_ref();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped.trim_start_matches('/');
    }
    rest.to_string()
}
