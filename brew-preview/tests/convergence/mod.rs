//! Property tests for reconciliation
//!
//! Trees are generated in a canonical form the HTML parser reproduces
//! byte-for-byte: a single `div` root, no whitespace, no adjacent text nodes.

use brew_preview::dom::{self, TreeNode};
use brew_preview::presenter::{Mountable, PresentMode, Presenter, RenderedDocument};
use brew_preview::reconcile::{reconcile_children, ReconcileStats};
use proptest::prelude::*;

static TAGS: &[&str] = &["div", "span", "section", "article", "aside"];
static CLASSES: &[&str] = &["page", "note", "monster", "spell"];

const STYLESHEET: &str = "http://localhost:8000/api/themes/5ePHB/style.css";

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Element {
        tag: &'static str,
        class: Option<&'static str>,
        children: Vec<Node>,
    },
}

impl Node {
    fn to_html(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element {
                tag,
                class,
                children,
            } => {
                let attrs = class
                    .map(|c| format!(" class=\"{c}\""))
                    .unwrap_or_default();
                let inner: String = children.iter().map(Node::to_html).collect();
                format!("<{tag}{attrs}>{inner}</{tag}>")
            }
        }
    }
}

fn merge_text(children: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for child in children {
        if let (Some(Node::Text(prev)), Node::Text(next)) = (merged.last_mut(), &child) {
            prev.push_str(next);
            continue;
        }
        merged.push(child);
    }
    merged
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = "[a-z]{1,6}".prop_map(Node::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(TAGS),
            prop::option::of(prop::sample::select(CLASSES)),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, class, children)| Node::Element {
                tag,
                class,
                children: merge_text(children),
            })
    })
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(node(), 0..5).prop_map(|children| {
        Node::Element {
            tag: "div",
            class: Some("brew"),
            children: merge_text(children),
        }
        .to_html()
    })
}

proptest! {
    #[test]
    fn generated_markup_is_canonical(html in document()) {
        let parsed = dom::parse_fragment(&html);
        prop_assert_eq!(dom::inner_html(&parsed).unwrap(), html);
    }

    #[test]
    fn reconciled_tree_matches_target(old in document(), new in document()) {
        let live = dom::parse_fragment(&old);
        let target = dom::parse_fragment(&new);

        let mut stats = ReconcileStats::default();
        reconcile_children(&live, &target, &mut stats).unwrap();

        prop_assert_eq!(dom::inner_html(&live).unwrap(), new);
    }

    #[test]
    fn second_pass_is_a_noop(old in document(), new in document()) {
        let live = dom::parse_fragment(&old);
        let target = dom::parse_fragment(&new);
        reconcile_children(&live, &target, &mut ReconcileStats::default()).unwrap();

        let mut stats = ReconcileStats::default();
        reconcile_children(&live, &target, &mut stats).unwrap();
        prop_assert!(stats.is_noop(), "second pass changed the tree: {:?}", stats);
    }

    #[test]
    fn identical_markup_keeps_every_node(html in document()) {
        let live = dom::parse_fragment(&html);
        let root = live.child(0).unwrap();
        let target = dom::parse_fragment(&html);

        let mut stats = ReconcileStats::default();
        reconcile_children(&live, &target, &mut stats).unwrap();

        prop_assert!(stats.is_noop());
        prop_assert!(live.child(0).unwrap().same_node(&root));
    }

    #[test]
    fn presenter_converges_over_a_sequence(docs in prop::collection::vec(document(), 1..6)) {
        let container = dom::create_element("div", vec![]);
        let mut presenter = Presenter::new();
        presenter.mount(container.clone());

        for (i, html) in docs.iter().enumerate() {
            let report = presenter
                .present(&RenderedDocument::new(html.clone(), STYLESHEET))
                .unwrap();
            let expected = if i == 0 { PresentMode::Bootstrap } else { PresentMode::Reconcile };
            prop_assert_eq!(report.mode, expected);
            prop_assert_eq!(&presenter.tree().unwrap().content_html().unwrap(), html);
            prop_assert_eq!(container.child_count(), 1);
        }
    }
}
