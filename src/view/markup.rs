//! HTML markup surface built on html5ever.
//!
//! Parsing: markup → RcDom (fragment, body context) → view nodes.
//! Serializing: view nodes → RcDom nodes → HTML string.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, LocalName, ParseOpts, QualName, ns};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

use super::types::{ViewElement, ViewNode};
use crate::error::{Error, Result};

/// Parse an HTML fragment into view nodes.
///
/// The parser recovers from malformed markup the way browsers do, so this
/// never fails. Comments, doctypes and processing instructions are dropped.
pub fn parse_fragment(markup: &str) -> Vec<ViewNode> {
    let context = QualName::new(None, ns!(html), LocalName::from("body"));
    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context,
        Vec::new(),
        false,
    )
    .one(markup);

    // Fragment parsing places the content under a synthetic <html> root.
    let mut nodes = Vec::new();
    for root in dom.document.children.borrow().iter() {
        nodes.extend(root.children.borrow().iter().filter_map(to_view));
    }
    nodes
}

/// Serialize view nodes to an HTML string.
pub fn serialize(nodes: &[ViewNode]) -> Result<String> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut output = Vec::new();
    for node in nodes {
        let serializable = SerializableHandle::from(to_handle(node));
        html5ever::serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| Error::Markup(format!("HTML serialization failed: {e}")))?;
    }

    String::from_utf8(output)
        .map_err(|e| Error::Markup(format!("UTF-8 conversion failed: {e}")))
}

fn to_view(handle: &Handle) -> Option<ViewNode> {
    match &handle.data {
        NodeData::Text { contents } => {
            let text: &str = &contents.borrow();
            Some(ViewNode::text(text))
        }
        NodeData::Element { name, attrs, .. } => {
            let mut element = ViewElement::new(&*name.local);
            for attr in attrs.borrow().iter() {
                element = element.with_param(&*attr.name.local, &*attr.value);
            }
            let children = handle.children.borrow().iter().filter_map(to_view).collect();
            Some(ViewNode::Element(element.with_children(children)))
        }
        _ => None,
    }
}

fn to_handle(node: &ViewNode) -> Handle {
    match node {
        ViewNode::Text(text) => create_node(NodeData::Text {
            contents: RefCell::new(text.clone().into()),
        }),
        ViewNode::Element(element) => {
            let attrs = element
                .params()
                .iter()
                .map(|(name, value)| Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(name.as_str())),
                    value: value.clone().into(),
                })
                .collect();
            let handle = create_node(NodeData::Element {
                name: QualName::new(None, ns!(html), LocalName::from(element.name())),
                attrs: RefCell::new(attrs),
                template_contents: Default::default(),
                mathml_annotation_xml_integration_point: false,
            });
            handle
                .children
                .borrow_mut()
                .extend(element.children().iter().map(to_handle));
            handle
        }
    }
}

fn create_node(data: NodeData) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data,
    })
}
