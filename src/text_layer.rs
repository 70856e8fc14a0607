//! Text layer model
//!
//! The text layer is rendered by the host independently of the annotation
//! surface. This crate reads node positions and inserts screen reader hints
//! into nodes; it never adds, removes or reorders nodes.

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::{point_intersects_rect, ClientRect};

/// Attribute that makes a text-layer node discoverable by the hint pass
pub const ATTR_DISCOVERABLE: &str = "data-canvas-width";

/// Position of a node within its page's text layer
pub type NodeId = usize;

/// Inline style of an element that is read aloud but never painted
pub const SCREEN_READER_ONLY_STYLE: &str =
    "position: absolute; left: -10000px; top: auto; width: 1px; height: 1px; overflow: hidden";

/// An invisible element holding one text node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenReaderHint {
    pub content: String,
}

impl ScreenReaderHint {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn style(&self) -> &'static str {
        SCREEN_READER_ONLY_STYLE
    }

    /// HTML rendition of the hint
    pub fn to_html(&self) -> String {
        format!("<div style=\"{}\">{}</div>", self.style(), escape(&self.content))
    }
}

/// Child content of a text-layer node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TextLayerChild {
    Text { text: String },
    Hint(ScreenReaderHint),
}

/// One text fragment positioned over the page image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayerNode {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub bounds: ClientRect,
    #[serde(default)]
    pub children: Vec<TextLayerChild>,
}

impl TextLayerNode {
    /// A discoverable node holding `text`
    pub fn new(text: &str, bounds: ClientRect) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(ATTR_DISCOVERABLE.to_string(), bounds.width().to_string());
        Self {
            attributes,
            bounds,
            children: vec![TextLayerChild::Text {
                text: text.to_string(),
            }],
        }
    }

    pub fn is_discoverable(&self) -> bool {
        self.attributes.contains_key(ATTR_DISCOVERABLE)
    }

    pub fn bounding_client_rect(&self) -> ClientRect {
        self.bounds
    }

    /// Insert a hint before every existing child
    pub fn prepend_hint(&mut self, hint: ScreenReaderHint) {
        self.children.insert(0, TextLayerChild::Hint(hint));
    }

    /// Insert a hint after every existing child
    pub fn append_hint(&mut self, hint: ScreenReaderHint) {
        self.children.push(TextLayerChild::Hint(hint));
    }

    pub fn hints(&self) -> impl Iterator<Item = &ScreenReaderHint> {
        self.children.iter().filter_map(|c| match c {
            TextLayerChild::Hint(h) => Some(h),
            TextLayerChild::Text { .. } => None,
        })
    }

    /// HTML rendition of the node, hints included
    pub fn to_html(&self) -> String {
        let attributes: String = self
            .attributes
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, escape(v)))
            .collect();
        let children: String = self
            .children
            .iter()
            .map(|c| match c {
                TextLayerChild::Text { text } => escape(text).into_owned(),
                TextLayerChild::Hint(h) => h.to_html(),
            })
            .collect();

        format!("<span{}>{}</span>", attributes, children)
    }

    /// Visible text, hints excluded
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                TextLayerChild::Text { text } => Some(text.as_str()),
                TextLayerChild::Hint(_) => None,
            })
            .collect()
    }
}

/// All text nodes of one page, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub nodes: Vec<TextLayerNode>,
}

impl TextLayer {
    pub fn new(nodes: Vec<TextLayerNode>) -> Self {
        Self { nodes }
    }

    pub fn node(&self, id: NodeId) -> Option<&TextLayerNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TextLayerNode> {
        self.nodes.get_mut(id)
    }

    /// Ids of discoverable nodes whose bounds contain `(x, y)`, in order
    pub fn nodes_at(&self, x: f64, y: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_discoverable())
            .filter(|(_, n)| point_intersects_rect(x, y, &n.bounding_client_rect()))
            .map(|(id, _)| id)
            .collect()
    }
}
