//! Built-in drawing strategies
//!
//! Geometry is emitted in content coordinates; the registry applies the
//! viewport transform to the returned element.

use crate::annotations::Annotation;
use crate::error::{RenderError, Result};
use crate::geometry::Rect;
use crate::surface::{SvgElement, SvgNode};

use super::DrawStrategy;

const HIGHLIGHT_COLOR: &str = "#ffff00";
const STRIKEOUT_COLOR: &str = "#ff0000";
const AREA_COLOR: &str = "#ff0000";
const INK_COLOR: &str = "#000000";
const POINT_SIZE: f64 = 25.0;

/// Prefix bare hex colors with `#`
pub fn normalize_color(color: &str) -> String {
    let is_bare_hex = matches!(color.len(), 3 | 6) && color.chars().all(|c| c.is_ascii_hexdigit());
    if is_bare_hex {
        format!("#{}", color)
    } else {
        color.to_string()
    }
}

fn color_or(annotation: &Annotation, fallback: &str) -> String {
    normalize_color(annotation.color.as_deref().unwrap_or(fallback))
}

fn require(annotation: &Annotation, value: Option<f64>, field: &'static str) -> Result<f64> {
    value.ok_or_else(|| RenderError::MissingGeometry {
        uuid: annotation.label().to_string(),
        field,
    })
}

fn rect_element(rect: &Rect) -> SvgElement {
    SvgElement::new("rect")
        .attr("x", rect.x)
        .attr("y", rect.y)
        .attr("width", rect.width)
        .attr("height", rect.height)
}

fn line_element(rect: &Rect, y: f64) -> SvgElement {
    SvgElement::new("line")
        .attr("x1", rect.x)
        .attr("y1", y)
        .attr("x2", rect.x + rect.width)
        .attr("y2", y)
}

/// Translucent fill over every rectangle
pub struct HighlightStrategy;

impl DrawStrategy for HighlightStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        let group = SvgElement::new("g")
            .attr("fill", color_or(annotation, HIGHLIGHT_COLOR))
            .attr("fill-opacity", 0.2);

        Ok(annotation
            .rectangles
            .iter()
            .fold(group, |g, r| g.child(rect_element(r))))
    }
}

/// A line through the vertical middle of every rectangle
pub struct StrikeoutStrategy;

impl DrawStrategy for StrikeoutStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        let group = SvgElement::new("g")
            .attr("stroke", color_or(annotation, STRIKEOUT_COLOR))
            .attr("stroke-width", 1);

        Ok(annotation.rectangles.iter().fold(group, |g, r| {
            g.child(line_element(r, r.y + r.height / 2.0))
        }))
    }
}

/// A line along the bottom edge of every rectangle
pub struct UnderlineStrategy;

impl DrawStrategy for UnderlineStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        let group = SvgElement::new("g")
            .attr("stroke", color_or(annotation, STRIKEOUT_COLOR))
            .attr("stroke-width", 1);

        Ok(annotation
            .rectangles
            .iter()
            .fold(group, |g, r| g.child(line_element(r, r.y + r.height))))
    }
}

/// Unfilled outlined box
pub struct AreaStrategy;

impl DrawStrategy for AreaStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        let rect = Rect::new(
            require(annotation, annotation.x, "x")?,
            require(annotation, annotation.y, "y")?,
            require(annotation, annotation.width, "width")?,
            require(annotation, annotation.height, "height")?,
        );

        Ok(rect_element(&rect)
            .attr("stroke", AREA_COLOR)
            .attr("stroke-width", 3)
            .attr("fill", "none"))
    }
}

/// Freehand path through `lines`
pub struct DrawingStrategy;

impl DrawStrategy for DrawingStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        if annotation.lines.is_empty() {
            return Err(RenderError::MissingGeometry {
                uuid: annotation.label().to_string(),
                field: "lines",
            });
        }

        let d = annotation
            .lines
            .iter()
            .enumerate()
            .map(|(i, [x, y])| format!("{}{} {}", if i == 0 { "M" } else { "L" }, x, y))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(SvgElement::new("path")
            .attr("d", d)
            .attr("stroke", color_or(annotation, INK_COLOR))
            .attr("stroke-width", annotation.width.unwrap_or(1.0))
            .attr("fill", "none"))
    }
}

/// Comment marker icon
pub struct PointStrategy;

impl DrawStrategy for PointStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        let x = require(annotation, annotation.x, "x")?;
        let y = require(annotation, annotation.y, "y")?;

        let outline = SvgElement::new("rect")
            .attr("width", 1000)
            .attr("height", 1000)
            .attr("stroke", INK_COLOR)
            .attr("stroke-width", 40)
            .attr("fill", "#ffffff");
        let bubble = SvgElement::new("path")
            .attr("d", "M200 250h600v350h-250l-150 150v-150h-200z")
            .attr("stroke", INK_COLOR)
            .attr("stroke-width", 50)
            .attr("fill", "none");

        Ok(SvgElement::new("svg")
            .attr("x", x)
            .attr("y", y)
            .attr("width", POINT_SIZE)
            .attr("height", POINT_SIZE)
            .attr("viewBox", "0 0 1000 1000")
            .child(outline)
            .child(bubble))
    }
}

/// Free text
pub struct TextboxStrategy;

impl DrawStrategy for TextboxStrategy {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        let x = require(annotation, annotation.x, "x")?;
        let y = require(annotation, annotation.y, "y")?;
        let size = annotation.size.unwrap_or(12.0);

        Ok(SvgElement::new("text")
            .attr("x", x)
            .attr("y", y)
            .attr("fill", color_or(annotation, INK_COLOR))
            .attr("font-size", size)
            .child(SvgNode::Text(annotation.content.clone().unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("ff0"), "#ff0");
        assert_eq!(normalize_color("00ff00"), "#00ff00");
        assert_eq!(normalize_color("#123456"), "#123456");
        assert_eq!(normalize_color("red"), "red");
    }

    #[test]
    fn test_highlight_one_rect_per_rectangle() {
        let annotation = Annotation::new_highlight(vec![
            Rect::new(10.0, 10.0, 50.0, 12.0),
            Rect::new(10.0, 24.0, 30.0, 12.0),
        ])
        .with_color("00ff00");

        let el = HighlightStrategy.build(&annotation).unwrap();
        assert_eq!(el.name, "g");
        assert_eq!(el.get_attribute("fill"), Some("#00ff00"));
        assert_eq!(el.get_attribute("fill-opacity"), Some("0.2"));
        assert_eq!(el.children.len(), 2);
    }

    #[test]
    fn test_strikeout_line_through_middle() {
        let annotation = Annotation::new_strikeout(vec![Rect::new(10.0, 20.0, 40.0, 10.0)]);
        let el = StrikeoutStrategy.build(&annotation).unwrap();

        let SvgNode::Element(line) = &el.children[0] else {
            panic!("expected line element");
        };
        assert_eq!(line.get_attribute("y1"), Some("25"));
        assert_eq!(line.get_attribute("x2"), Some("50"));
        assert_eq!(el.get_attribute("stroke"), Some("#ff0000"));
    }

    #[test]
    fn test_area_requires_box() {
        let mut annotation = Annotation::new_area(Rect::new(1.0, 2.0, 3.0, 4.0)).with_uuid("a-9");
        assert!(AreaStrategy.build(&annotation).is_ok());

        annotation.height = None;
        let err = AreaStrategy.build(&annotation).unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingGeometry { ref uuid, field: "height" } if uuid == "a-9"
        ));
    }

    #[test]
    fn test_drawing_path() {
        let annotation = Annotation::new_drawing(vec![[0.0, 0.0], [5.5, 2.0], [7.0, 9.0]], 2.0);
        let el = DrawingStrategy.build(&annotation).unwrap();
        assert_eq!(el.get_attribute("d"), Some("M0 0 L5.5 2 L7 9"));
        assert_eq!(el.get_attribute("stroke-width"), Some("2"));

        let empty = Annotation::new_drawing(vec![], 1.0);
        assert!(DrawingStrategy.build(&empty).is_err());
    }

    #[test]
    fn test_textbox_content() {
        let annotation = Annotation::new_textbox(5.0, 6.0, 14.0, "note");
        let el = TextboxStrategy.build(&annotation).unwrap();
        assert_eq!(el.get_attribute("font-size"), Some("14"));
        assert_eq!(el.children, vec![SvgNode::Text("note".to_string())]);
    }

    #[test]
    fn test_point_icon_size() {
        let el = PointStrategy.build(&Annotation::new_point(3.0, 4.0)).unwrap();
        assert_eq!(el.name, "svg");
        assert_eq!(el.get_attribute("width"), Some("25"));
        assert_eq!(el.children.len(), 2);
    }
}
