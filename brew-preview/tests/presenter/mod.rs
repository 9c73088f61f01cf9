use brew_preview::dom::{self, TreeNode};
use brew_preview::presenter::{Mountable, PresentMode, Presenter, RenderedDocument};
use brew_preview::PresentError;
use insta::assert_snapshot;

const PHB: &str = "http://localhost:8000/api/themes/5ePHB/style.css";
const DMG: &str = "http://localhost:8000/api/themes/5eDMG/style.css";

fn mounted() -> (Presenter, markup5ever_rcdom::Handle) {
    let container = dom::create_element("div", vec![("class", "workspace-leaf")]);
    let mut presenter = Presenter::new();
    presenter.mount(container.clone());
    (presenter, container)
}

#[test]
fn bootstrap_markup() {
    let (mut presenter, container) = mounted();
    presenter
        .present(&RenderedDocument::new(
            "<div class=\"brew\"><div class=\"page\"><h1>Dragons</h1></div></div>",
            PHB,
        ))
        .unwrap();

    assert_snapshot!(
        dom::outer_html(&container).unwrap(),
        @r#"<div class="workspace-leaf"><div class="brew-reset"><link href="http://localhost:8000/api/themes/5ePHB/style.css" rel="stylesheet"><div class="brew-content"><div class="brew"><div class="page"><h1>Dragons</h1></div></div></div></div></div>"#
    );
}

#[test]
fn theme_switch_only_touches_the_link() {
    let (mut presenter, container) = mounted();
    let html = "<div class=\"brew\"><div class=\"page\"><p>Lair</p></div></div>";
    presenter.present(&RenderedDocument::new(html, PHB)).unwrap();
    let page = presenter
        .tree()
        .unwrap()
        .content_root()
        .child(0)
        .unwrap();

    let report = presenter.present(&RenderedDocument::new(html, DMG)).unwrap();

    assert!(report.stylesheet_updated);
    assert!(report.stats.is_noop());
    assert!(presenter
        .tree()
        .unwrap()
        .content_root()
        .child(0)
        .unwrap()
        .same_node(&page));
    assert_snapshot!(
        dom::inner_html(&container).unwrap(),
        @r#"<div class="brew-reset"><link href="http://localhost:8000/api/themes/5eDMG/style.css" rel="stylesheet"><div class="brew-content"><div class="brew"><div class="page"><p>Lair</p></div></div></div></div>"#
    );
}

#[test]
fn editing_one_page_keeps_the_others() {
    let (mut presenter, _container) = mounted();
    presenter
        .present(&RenderedDocument::new(
            "<div class=\"brew\"><div class=\"page\"><p>one</p></div><div class=\"page\"><p>two</p></div></div>",
            PHB,
        ))
        .unwrap();
    let brew = presenter.tree().unwrap().content_root().child(0).unwrap();
    let first_page = brew.child(0).unwrap();
    let second_page = brew.child(1).unwrap();

    let report = presenter
        .present(&RenderedDocument::new(
            "<div class=\"brew\"><div class=\"page\"><p>one</p></div><div class=\"page\"><p>TWO</p></div></div>",
            PHB,
        ))
        .unwrap();

    assert_eq!(report.mode, PresentMode::Reconcile);
    assert!(!report.stylesheet_updated);
    assert_eq!(report.stats.replaced, 1);
    assert!(brew.child(0).unwrap().same_node(&first_page));
    assert!(brew.child(1).unwrap().same_node(&second_page));
    assert_eq!(
        dom::inner_html(&second_page).unwrap(),
        "<p>TWO</p>"
    );
}

#[test]
fn adding_a_page_appends_it() {
    let (mut presenter, _container) = mounted();
    presenter
        .present(&RenderedDocument::new(
            "<div class=\"brew\"><div class=\"page\">a</div></div>",
            PHB,
        ))
        .unwrap();

    let report = presenter
        .present(&RenderedDocument::new(
            "<div class=\"brew\"><div class=\"page\">a</div><div class=\"page\">b</div></div>",
            PHB,
        ))
        .unwrap();

    assert_eq!(report.stats.inserted, 1);
    assert_eq!(report.stats.replaced, 0);
    assert_snapshot!(
        presenter.tree().unwrap().content_html().unwrap(),
        @r#"<div class="brew"><div class="page">a</div><div class="page">b</div></div>"#
    );
}

#[test]
fn removing_a_page_trims_the_tail() {
    let (mut presenter, _container) = mounted();
    presenter
        .present(&RenderedDocument::new(
            "<div class=\"brew\"><p>a</p><p>b</p><p>c</p></div>",
            PHB,
        ))
        .unwrap();

    let report = presenter
        .present(&RenderedDocument::new("<div class=\"brew\"><p>a</p></div>", PHB))
        .unwrap();

    assert_eq!(report.stats.removed, 2);
    assert_eq!(
        presenter.tree().unwrap().content_html().unwrap(),
        "<div class=\"brew\"><p>a</p></div>"
    );
}

#[test]
fn blank_markup_is_malformed() {
    let (mut presenter, container) = mounted();
    let err = presenter
        .present(&RenderedDocument::new("\n\t ", PHB))
        .unwrap_err();

    assert!(matches!(err, PresentError::MalformedInput(_)));
    assert!(presenter.tree().is_none());
    assert_eq!(container.child_count(), 0);
}

#[test]
fn remount_moves_to_new_container() {
    let (mut presenter, old_container) = mounted();
    presenter
        .present(&RenderedDocument::new("<div>x</div>", PHB))
        .unwrap();

    let new_container = dom::create_element("div", vec![]);
    presenter.mount(new_container.clone());
    assert_eq!(old_container.child_count(), 0);
    assert!(presenter.tree().is_none());

    let report = presenter
        .present(&RenderedDocument::new("<div>x</div>", PHB))
        .unwrap();
    assert_eq!(report.mode, PresentMode::Bootstrap);
    assert_eq!(new_container.child_count(), 1);
}
