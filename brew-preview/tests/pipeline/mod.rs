use brew_preview::dom::TreeNode;
use brew_preview::presenter::{Mountable, PresentMode};
use brew_preview::render::MarkdownRenderer;
use brew_preview::{
    BrewSettings, BrewView, FileDocumentSource, LinkedBrew, RenderPipeline, RendererRegistry,
};
use std::fs;
use std::path::PathBuf;

const BASE: &str = "http://localhost:8000";

fn settings() -> BrewSettings {
    let mut settings = BrewSettings::default();
    settings.add(LinkedBrew::new("campaign/Dragons").with_theme("5eDMG"));
    settings
}

#[test]
fn markdown_brew_renders_into_view() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("campaign")).unwrap();
    fs::write(
        dir.path().join("campaign/Dragons.md"),
        "# Dragons\n\nSee [[Dragons#Red Dragon]].\n",
    )
    .unwrap();

    let settings = settings();
    let renderer = MarkdownRenderer::new();
    let pipeline = RenderPipeline::new(&renderer, BASE, &settings);
    let source = FileDocumentSource::new(dir.path(), Some(PathBuf::from("campaign/Dragons.md")));

    let mut view = BrewView::detached("Dragons");
    let report = view.update(&pipeline, &source).unwrap();
    assert_eq!(report.mode, PresentMode::Bootstrap);

    let html = view.container_html().unwrap();
    assert!(html.contains("<div class=\"brew\">"));
    assert!(html.contains("Dragons</h1>"));
    assert!(html.contains("<a href=\"#red-dragon\">Red Dragon</a>"));
    assert!(html.contains("http://localhost:8000/api/themes/5eDMG/style.css"));
}

#[test]
fn editing_the_file_keeps_untouched_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("campaign/Dragons.md");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "# Dragons\n\nFirst draft.\n").unwrap();

    let settings = settings();
    let renderer = MarkdownRenderer::new();
    let pipeline = RenderPipeline::new(&renderer, BASE, &settings);
    let source = FileDocumentSource::new(dir.path(), Some(PathBuf::from("campaign/Dragons.md")));

    let mut view = BrewView::detached("Dragons");
    view.update(&pipeline, &source).unwrap();
    let brew = view
        .presenter()
        .tree()
        .unwrap()
        .content_root()
        .child(0)
        .unwrap();
    let heading = brew.child(0).unwrap();

    fs::write(&file, "# Dragons\n\nSecond draft.\n").unwrap();
    let report = view.update(&pipeline, &source).unwrap();

    assert_eq!(report.mode, PresentMode::Reconcile);
    assert!(!report.stylesheet_updated);
    assert!(!report.stats.is_noop());
    assert!(brew.child(0).unwrap().same_node(&heading));
    assert!(view.container_html().unwrap().contains("<p>Second draft.</p>"));
}

#[test]
fn unlinked_document_leaves_view_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Goblins.md"), "# Goblins\n").unwrap();

    let settings = settings();
    let registry = RendererRegistry::with_builtins(dir.path().join("parser.js"));
    let renderer = registry.get("markdown").unwrap();
    let pipeline = RenderPipeline::new(renderer, BASE, &settings);
    let source = FileDocumentSource::new(dir.path(), Some(PathBuf::from("Goblins.md")));

    let mut view = BrewView::detached("Goblins");
    assert!(view.update(&pipeline, &source).is_none());
    assert!(view.is_mounted());
    assert_eq!(view.container_html().unwrap(), "");
}

#[test]
fn page_is_a_complete_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("campaign")).unwrap();
    fs::write(dir.path().join("campaign/Dragons.md"), "Hello\n").unwrap();

    let settings = settings();
    let renderer = MarkdownRenderer::new();
    let pipeline = RenderPipeline::new(&renderer, BASE, &settings);
    let source = FileDocumentSource::new(dir.path(), Some(PathBuf::from("campaign/Dragons.md")));

    let mut view = BrewView::detached("Dragons");
    view.update(&pipeline, &source).unwrap();
    let page = view.page_html().unwrap();

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>Dragons</title>"));
    assert!(page.contains("<div class=\"brew-content\"><div class=\"brew\"><p>Hello</p></div></div>"));
    assert!(page.trim_end().ends_with("</html>"));
}
