//! SVG surface model
//!
//! The surface is the vector drawing area overlaying one page image. It owns
//! its children outright; every render pass replaces them.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::error::Result;
use crate::geometry::ClientRect;

/// Marks an element as an annotation container
pub const ATTR_CONTAINER: &str = "data-pdf-annotate-container";
/// JSON-serialized viewport of the last render
pub const ATTR_VIEWPORT: &str = "data-pdf-annotate-viewport";
/// Document id of the last rendered response
pub const ATTR_DOCUMENT: &str = "data-pdf-annotate-document";
/// Page number of the last rendered response
pub const ATTR_PAGE: &str = "data-pdf-annotate-page";
/// Annotation uuid on a drawn child
pub const ATTR_ANNOTATION_ID: &str = "data-pdf-annotate-id";
/// Annotation type on a drawn child
pub const ATTR_ANNOTATION_TYPE: &str = "data-pdf-annotate-type";

/// One node of SVG markup
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

/// An SVG element with ordered attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style child append
    pub fn child(mut self, node: impl Into<SvgNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn set_attribute(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn write(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

impl SvgNode {
    fn write(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
        match self {
            SvgNode::Element(el) => el.write(writer),
            SvgNode::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
                Ok(())
            }
        }
    }
}

impl From<SvgElement> for SvgNode {
    fn from(el: SvgElement) -> Self {
        SvgNode::Element(el)
    }
}

/// The annotation layer's root `<svg>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    attributes: BTreeMap<String, String>,
    children: Vec<SvgNode>,
    /// On-screen position, supplied by the host layout
    bounds: ClientRect,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface positioned on screen
    pub fn with_bounds(bounds: ClientRect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn bounding_client_rect(&self) -> ClientRect {
        self.bounds
    }

    pub fn set_attribute(&mut self, key: &str, value: impl ToString) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn remove_attribute(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn append_child(&mut self, node: impl Into<SvgNode>) {
        self.children.push(node.into());
    }

    /// Drop every child
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Whether the surface was tagged for `page_number`
    pub fn is_page(&self, page_number: u32) -> bool {
        self.get_attribute(ATTR_PAGE)
            .is_some_and(|p| p == page_number.to_string())
    }

    /// Serialize the surface as `<svg>` markup
    pub fn to_svg_string(&self) -> Result<String> {
        let mut root = SvgElement::new("svg").attr("xmlns", "http://www.w3.org/2000/svg");
        for (key, value) in &self.attributes {
            root.set_attribute(key, value);
        }
        root.children = self.children.clone();

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        root.write(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }
}
