//! Reconciling presenter
//!
//! Owns the element tree mounted in a view's container and applies each new
//! [`RenderedDocument`] to it. The tree is built once:
//!
//! ```text
//! container
//! └── div.brew-reset                 wrapper
//!     ├── link rel=stylesheet        stylesheet reference
//!     └── div.brew-content           content-root, holds the rendered fragment
//! ```
//!
//! Every later pass parses the new markup into a detached scratch tree and
//! reconciles the content-root against it (see [`crate::reconcile`]). The
//! stylesheet `href` is only written when the URL actually changed, so an
//! unchanged theme never triggers a stylesheet reload.

use crate::dom::{self, TreeNode};
use crate::error::{DomError, PresentError};
use crate::reconcile::{reconcile_children, ReconcileStats};
use markup5ever_rcdom::Handle;

/// Class of the wrapper element that resets host styling
pub const WRAPPER_CLASS: &str = "brew-reset";
/// Class of the content-root element
pub const CONTENT_CLASS: &str = "brew-content";

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// HTML fragment with a single root element
    pub html: String,
    /// Theme stylesheet to reference
    pub stylesheet_url: String,
}

impl RenderedDocument {
    pub fn new(html: impl Into<String>, stylesheet_url: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            stylesheet_url: stylesheet_url.into(),
        }
    }
}

/// Something that lives inside a host-supplied container element.
pub trait Mountable {
    /// Take ownership of `container`. Anything created later goes inside it.
    fn mount(&mut self, container: Handle);

    /// Remove everything created inside the container and forget it.
    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;
}

/// The persistent tree owned by a [`Presenter`].
#[derive(Debug)]
pub struct PresentationTree {
    wrapper: Handle,
    stylesheet: Handle,
    content_root: Handle,
}

impl PresentationTree {
    fn build(stylesheet_url: &str) -> Self {
        let wrapper = dom::create_element("div", vec![("class", WRAPPER_CLASS)]);
        let stylesheet = dom::create_element(
            "link",
            vec![("href", stylesheet_url), ("rel", "stylesheet")],
        );
        let content_root = dom::create_element("div", vec![("class", CONTENT_CLASS)]);
        dom::append(&wrapper, stylesheet.clone());
        dom::append(&wrapper, content_root.clone());

        Self {
            wrapper,
            stylesheet,
            content_root,
        }
    }

    pub fn stylesheet(&self) -> &Handle {
        &self.stylesheet
    }

    pub fn content_root(&self) -> &Handle {
        &self.content_root
    }

    /// Current `href` of the stylesheet link
    pub fn stylesheet_url(&self) -> Option<String> {
        dom::get_attr(&self.stylesheet, "href")
    }

    /// Serialized markup currently held by the content-root
    pub fn content_html(&self) -> Result<String, DomError> {
        dom::inner_html(&self.content_root)
    }
}

/// How a pass was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// The tree did not exist and was built from scratch
    Bootstrap,
    /// The existing tree was patched in place
    Reconcile,
}

/// Summary of a successful [`Presenter::present`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentReport {
    pub mode: PresentMode,
    pub stylesheet_updated: bool,
    pub stats: ReconcileStats,
}

/// Applies rendered documents to a persistent, mounted element tree.
#[derive(Debug, Default)]
pub struct Presenter {
    container: Option<Handle>,
    tree: Option<PresentationTree>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mounted tree, once the first document has been presented
    pub fn tree(&self) -> Option<&PresentationTree> {
        self.tree.as_ref()
    }

    pub fn container(&self) -> Option<&Handle> {
        self.container.as_ref()
    }

    /// Drop the current tree so the next pass bootstraps a new one.
    pub fn reset(&mut self) {
        if let (Some(container), Some(tree)) = (&self.container, self.tree.take()) {
            dom::detach(container, &tree.wrapper);
        }
    }

    /// Bring the mounted tree in line with `doc`.
    ///
    /// On error the visible tree is left as it was.
    pub fn present(&mut self, doc: &RenderedDocument) -> Result<PresentReport, PresentError> {
        let container = self.container.as_ref().ok_or(PresentError::NotMounted)?;

        let scratch = dom::parse_fragment(doc.html.trim());
        if scratch.child_count() == 0 {
            tracing::warn!(len = doc.html.len(), "Rendered markup produced no nodes");
            return Err(PresentError::MalformedInput(
                "markup produced no nodes".to_string(),
            ));
        }

        let Some(tree) = &self.tree else {
            let tree = PresentationTree::build(&doc.stylesheet_url);
            while let Some(node) = scratch.remove_child(0) {
                tree.content_root.append_child(node);
            }
            dom::append(container, tree.wrapper.clone());
            self.tree = Some(tree);
            tracing::debug!("Built presentation tree");

            return Ok(PresentReport {
                mode: PresentMode::Bootstrap,
                stylesheet_updated: false,
                stats: ReconcileStats::default(),
            });
        };

        let stylesheet_updated =
            tree.stylesheet_url().as_deref() != Some(doc.stylesheet_url.as_str());
        if stylesheet_updated {
            dom::set_attr(&tree.stylesheet, "href", &doc.stylesheet_url);
            tracing::debug!(url = %doc.stylesheet_url, "Updated stylesheet link");
        }

        if tree.content_root.child_count() == 0 {
            tracing::warn!("Content root has no rendered child, skipping reconciliation");
            return Err(PresentError::InconsistentTreeState(
                "content root has no child".to_string(),
            ));
        }

        let mut stats = ReconcileStats::default();
        reconcile_children(&tree.content_root, &scratch, &mut stats)?;
        tracing::debug!(
            visited = stats.visited,
            inserted = stats.inserted,
            removed = stats.removed,
            replaced = stats.replaced,
            "Reconciled presentation tree"
        );

        Ok(PresentReport {
            mode: PresentMode::Reconcile,
            stylesheet_updated,
            stats,
        })
    }
}

impl Mountable for Presenter {
    fn mount(&mut self, container: Handle) {
        self.unmount();
        self.container = Some(container);
    }

    fn unmount(&mut self) {
        self.reset();
        self.container = None;
    }

    fn is_mounted(&self) -> bool {
        self.container.is_some()
    }
}
