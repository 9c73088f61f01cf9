//! Wiki-link substitution for brew text.
//!
//! Editors write in-document references as wiki links. The brew parser only
//! understands markdown links, so before rendering:
//!
//! - `[[<file>#Heading]]`, where `<file>` is the brew's own file stem, and
//! - `[[#Heading]]`
//!
//! both become `[Heading](#heading)`. Links to other files are left alone.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static WIKI_HEADING_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[\s*([^\]#]*)#([^\]]*)\]\]").expect("valid link pattern"));

/// Rewrite heading wiki links that point into the brew `file_stem`.
pub fn substitute_links(text: &str, file_stem: &str) -> String {
    WIKI_HEADING_LINK
        .replace_all(text, |caps: &Captures| {
            let target = &caps[1];
            if !target.is_empty() && target != file_stem {
                return caps[0].to_string();
            }
            let heading = &caps[2];
            format!("[{heading}](#{})", heading_anchor(heading))
        })
        .into_owned()
}

/// Anchor for a heading: lower-cased with spaces as dashes, `None` when empty.
pub fn heading_anchor(heading: &str) -> String {
    let anchor = heading.to_lowercase().replace(' ', "-");
    if anchor.is_empty() {
        "None".to_string()
    } else {
        anchor
    }
}
