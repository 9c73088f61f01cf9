//! DOM tree access for the presenter
//!
//! The presenter and the reconciliation walk only need a handful of tree
//! operations. They are expressed by the [`TreeNode`] trait so the algorithm
//! does not depend on a particular DOM. The implementation shipped here is
//! built on the `html5ever` + `markup5ever_rcdom` ecosystem:
//!
//! - `html5ever`: HTML5 parser and serializer from the Servo project
//! - `markup5ever_rcdom`: reference-counted DOM where node identity is `Rc` identity
//!
//! Nodes are shared `Rc` handles with interior mutability, so a whole tree is
//! single-threaded by construction.

use crate::error::DomError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope,
    Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Minimal tree interface the reconciliation walk depends on.
///
/// Children are addressed by position. Implementations must keep node
/// identity stable for nodes that are not explicitly replaced or removed.
pub trait TreeNode: Clone {
    /// Number of direct children
    fn child_count(&self) -> usize;

    /// Child at `index`, if any
    fn child(&self, index: usize) -> Option<Self>;

    /// Append `child` as the last child
    fn append_child(&self, child: Self);

    /// Remove and return the child at `index`
    fn remove_child(&self, index: usize) -> Option<Self>;

    /// Put `replacement` at `index`, returning the node it displaced
    fn replace_child(&self, index: usize, replacement: Self) -> Option<Self>;

    /// Detached copy of this node and its whole subtree
    fn deep_copy(&self) -> Self;

    /// Serialized markup of this node including itself
    fn outer_html(&self) -> Result<String, DomError>;

    /// Whether both handles point at the same node
    fn same_node(&self, other: &Self) -> bool;
}

impl TreeNode for Handle {
    fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    fn child(&self, index: usize) -> Option<Self> {
        self.children.borrow().get(index).cloned()
    }

    fn append_child(&self, child: Self) {
        append(self, child);
    }

    fn remove_child(&self, index: usize) -> Option<Self> {
        let mut children = self.children.borrow_mut();
        if index >= children.len() {
            return None;
        }
        let removed = children.remove(index);
        removed.parent.set(None);
        Some(removed)
    }

    fn replace_child(&self, index: usize, replacement: Self) -> Option<Self> {
        let mut children = self.children.borrow_mut();
        let slot = children.get_mut(index)?;
        replacement.parent.set(Some(Rc::downgrade(self)));
        let previous = std::mem::replace(slot, replacement);
        previous.parent.set(None);
        Some(previous)
    }

    fn deep_copy(&self) -> Self {
        deep_copy(self)
    }

    fn outer_html(&self) -> Result<String, DomError> {
        serialize_node(self, TraversalScope::IncludeNode)
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Parse an HTML fragment into a detached container element.
///
/// The container is never attached to a visible tree. Its children are the
/// top-level nodes of `html` in document order. Content the HTML5 algorithm
/// would hoist into `<head>` (e.g. a leading `<style>`) is kept, in order,
/// ahead of the body content.
pub fn parse_fragment(html: &str) -> Handle {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let container = create_element("div", vec![]);

    let Some(root) = find_child_element(&dom.document, "html") else {
        return container;
    };

    for section in ["head", "body"] {
        if let Some(part) = find_child_element(&root, section) {
            let nodes = std::mem::take(&mut *part.children.borrow_mut());
            for node in nodes {
                append(&container, node);
            }
        }
    }

    container
}

/// Create a detached element with attributes
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a detached text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Append `child` to `parent`, updating the child's parent pointer
pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Remove `child` from `parent` by identity. Returns whether it was found.
pub fn detach(parent: &Handle, child: &Handle) -> bool {
    let mut children = parent.children.borrow_mut();
    match children.iter().position(|c| Rc::ptr_eq(c, child)) {
        Some(index) => {
            children.remove(index).parent.set(None);
            true
        }
        None => false,
    }
}

/// Local tag name of an element, `None` for other node kinds
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Value of attribute `name` on an element
pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Set attribute `name` on an element, adding it if absent.
///
/// Returns `false` when `node` is not an element.
pub fn set_attr(node: &Handle, name: &str, value: &str) -> bool {
    let NodeData::Element { attrs, .. } = &node.data else {
        return false;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
        Some(attr) => attr.value = value.to_string().into(),
        None => attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        }),
    }
    true
}

/// Detached copy of `node` and its subtree
pub fn deep_copy(node: &Handle) -> Handle {
    let data = match &node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(deep_copy)),
            mathml_annotation_xml_integration_point: *mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction { target, contents } => {
            NodeData::ProcessingInstruction {
                target: target.clone(),
                contents: contents.clone(),
            }
        }
    };

    let copy = Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data,
    });
    for child in node.children.borrow().iter() {
        append(&copy, deep_copy(child));
    }
    copy
}

/// Serialized markup of the children of `node`
pub fn inner_html(node: &Handle) -> Result<String, DomError> {
    serialize_node(node, TraversalScope::ChildrenOnly(None))
}

/// Serialized markup of `node` itself
pub fn outer_html(node: &Handle) -> Result<String, DomError> {
    serialize_node(node, TraversalScope::IncludeNode)
}

fn serialize_node(node: &Handle, scope: TraversalScope) -> Result<String, DomError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(node.clone()), opts)?;
    Ok(String::from_utf8(output)?)
}

fn find_child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| tag_name(child).as_deref() == Some(tag))
        .cloned()
}
