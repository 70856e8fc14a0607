//! Annotation types as returned by the annotation store
//!
//! An annotation is discriminated by its `type` field. Highlight-like types
//! carry ordered `rectangles`; the others carry point, box, path or text
//! geometry. Fields this crate does not interpret are preserved.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::geometry::Rect;

/// One page's worth of annotations, as returned by an annotation source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationResponse {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    /// Missing or non-array values deserialize to an empty list
    #[serde(default, deserialize_with = "lenient_annotations")]
    pub annotations: Vec<Annotation>,
}

impl AnnotationResponse {
    pub fn new(document_id: &str, page_number: u32, annotations: Vec<Annotation>) -> Self {
        Self {
            document_id: document_id.to_string(),
            page_number,
            annotations,
        }
    }
}

fn lenient_annotations<'de, D>(deserializer: D) -> Result<Vec<Annotation>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Annotation type discriminant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationType {
    Highlight,
    Strikeout,
    Underline,
    Area,
    Drawing,
    Point,
    Textbox,
    /// Any type this crate has no built-in knowledge of
    Other(String),
}

impl AnnotationType {
    pub fn as_str(&self) -> &str {
        match self {
            AnnotationType::Highlight => "highlight",
            AnnotationType::Strikeout => "strikeout",
            AnnotationType::Underline => "underline",
            AnnotationType::Area => "area",
            AnnotationType::Drawing => "drawing",
            AnnotationType::Point => "point",
            AnnotationType::Textbox => "textbox",
            AnnotationType::Other(name) => name,
        }
    }

    /// Types whose span gets screen reader boundary markers
    pub fn is_hinted(&self) -> bool {
        matches!(self, AnnotationType::Highlight | AnnotationType::Strikeout)
    }
}

impl From<String> for AnnotationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "highlight" => AnnotationType::Highlight,
            "strikeout" => AnnotationType::Strikeout,
            "underline" => AnnotationType::Underline,
            "area" => AnnotationType::Area,
            "drawing" => AnnotationType::Drawing,
            "point" => AnnotationType::Point,
            "textbox" => AnnotationType::Textbox,
            _ => AnnotationType::Other(value),
        }
    }
}

impl From<&str> for AnnotationType {
    fn from(value: &str) -> Self {
        AnnotationType::from(value.to_string())
    }
}

impl From<AnnotationType> for String {
    fn from(value: AnnotationType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub annotation_type: AnnotationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ordered; the first and last entries bound the visual span
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rectangles: Vec<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Freehand path vertices, `[x, y]` pairs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<[f64; 2]>,
    /// Font size for text boxes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    fn empty(annotation_type: AnnotationType) -> Self {
        Self {
            annotation_type,
            uuid: None,
            color: None,
            rectangles: Vec::new(),
            x: None,
            y: None,
            width: None,
            height: None,
            lines: Vec::new(),
            size: None,
            content: None,
            extra: Map::new(),
        }
    }

    /// Create a highlight over the given rectangles
    pub fn new_highlight(rectangles: Vec<Rect>) -> Self {
        Self {
            rectangles,
            ..Self::empty(AnnotationType::Highlight)
        }
    }

    /// Create a strikeout over the given rectangles
    pub fn new_strikeout(rectangles: Vec<Rect>) -> Self {
        Self {
            rectangles,
            ..Self::empty(AnnotationType::Strikeout)
        }
    }

    /// Create an area annotation
    pub fn new_area(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::empty(AnnotationType::Area)
        }
    }

    /// Create a freehand drawing
    pub fn new_drawing(lines: Vec<[f64; 2]>, stroke_width: f64) -> Self {
        Self {
            lines,
            width: Some(stroke_width),
            ..Self::empty(AnnotationType::Drawing)
        }
    }

    /// Create a comment point
    pub fn new_point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::empty(AnnotationType::Point)
        }
    }

    /// Create a text box
    pub fn new_textbox(x: f64, y: f64, size: f64, content: &str) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            size: Some(size),
            content: Some(content.to_string()),
            ..Self::empty(AnnotationType::Textbox)
        }
    }

    pub fn with_uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Identifier used in log lines and error messages
    pub fn label(&self) -> &str {
        self.uuid.as_deref().unwrap_or("<no uuid>")
    }

    pub fn first_rect(&self) -> Option<&Rect> {
        self.rectangles.first()
    }

    pub fn last_rect(&self) -> Option<&Rect> {
        self.rectangles.last()
    }
}
