//! Brew preview view
//!
//! A [`BrewView`] is what a host mounts to show a brew. Each update runs the
//! render pipeline and hands the result to its [`Presenter`]. Failures never
//! clear the view: the previous preview stays on screen and the problem is
//! logged.

use crate::dom;
use crate::error::{DomError, PresentError};
use crate::pipeline::{DocumentSource, RenderPipeline};
use crate::presenter::{Mountable, PresentReport, Presenter, RenderedDocument};
use markup5ever_rcdom::Handle;

/// Container class used when the view creates its own container
pub const VIEW_CLASS: &str = "brew-view";

/// A mountable preview of the active brew.
#[derive(Debug, Default)]
pub struct BrewView {
    presenter: Presenter,
    title: String,
}

impl BrewView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            presenter: Presenter::new(),
            title: title.into(),
        }
    }

    /// View mounted into a fresh detached `div.brew-view`
    pub fn detached(title: impl Into<String>) -> Self {
        let mut view = Self::new(title);
        view.mount(dom::create_element("div", vec![("class", VIEW_CLASS)]));
        view
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Run one render pass and present its result.
    ///
    /// Returns the presenter's report when the view changed.
    pub fn update(
        &mut self,
        pipeline: &RenderPipeline<'_>,
        source: &dyn DocumentSource,
    ) -> Option<PresentReport> {
        if !self.is_mounted() {
            tracing::warn!("Update requested on an unmounted view");
            return None;
        }

        let doc = match pipeline.render(source) {
            Ok(Some(doc)) => doc,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "Unable to render brew");
                return None;
            }
        };

        match self.show(&doc) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!(error = %err, "Unable to present brew");
                None
            }
        }
    }

    /// Present an already rendered document.
    pub fn show(&mut self, doc: &RenderedDocument) -> Result<PresentReport, PresentError> {
        self.presenter.present(doc)
    }

    /// Markup currently inside the container
    pub fn container_html(&self) -> Result<String, DomError> {
        match self.presenter.container() {
            Some(container) => dom::inner_html(container),
            None => Ok(String::new()),
        }
    }

    /// Standalone HTML page showing the current preview.
    pub fn page_html(&self) -> Result<String, DomError> {
        let body_html = self.container_html()?;
        let page_css = include_str!("../css/page.css");
        let escaped_title = html_escape(&self.title);

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="brew-preview">
  <title>{escaped_title}</title>
  <style>
{page_css}
  </style>
</head>
<body>
<div class="{VIEW_CLASS}">
{body_html}
</div>
</body>
</html>"#
        ))
    }
}

impl Mountable for BrewView {
    fn mount(&mut self, container: Handle) {
        self.presenter.mount(container);
    }

    fn unmount(&mut self) {
        self.presenter.unmount();
    }

    fn is_mounted(&self) -> bool {
        self.presenter.is_mounted()
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
