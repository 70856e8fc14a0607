//! Per-annotation drawing
//!
//! The renderer only knows the `AnnotationDrawer` capability. The stock
//! implementation is a `DrawerRegistry` mapping each type discriminant to a
//! `DrawStrategy` that builds that annotation's markup.

mod shapes;

use std::collections::HashMap;

use crate::annotations::{Annotation, AnnotationType};
use crate::error::{RenderError, Result};
use crate::surface::{SvgElement, Surface, ATTR_ANNOTATION_ID, ATTR_ANNOTATION_TYPE};
use crate::viewport::Viewport;

pub use shapes::{
    normalize_color, AreaStrategy, DrawingStrategy, HighlightStrategy, PointStrategy,
    StrikeoutStrategy, TextboxStrategy, UnderlineStrategy,
};

/// Appends the markup for exactly one annotation to a surface
pub trait AnnotationDrawer {
    fn append_child(
        &self,
        surface: &mut Surface,
        annotation: &Annotation,
        viewport: &Viewport,
    ) -> Result<()>;
}

/// Builds the markup of one annotation type
pub trait DrawStrategy: Send + Sync {
    fn build(&self, annotation: &Annotation) -> Result<SvgElement>;
}

impl<F> DrawStrategy for F
where
    F: Fn(&Annotation) -> Result<SvgElement> + Send + Sync,
{
    fn build(&self, annotation: &Annotation) -> Result<SvgElement> {
        self(annotation)
    }
}

/// Type discriminant to drawing strategy
#[derive(Default)]
pub struct DrawerRegistry {
    strategies: HashMap<AnnotationType, Box<dyn DrawStrategy>>,
    skip_unknown: bool,
}

impl DrawerRegistry {
    /// An empty registry; every annotation fails as unsupported
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a strategy for every built-in annotation type
    pub fn with_defaults() -> Self {
        Self::new()
            .register(AnnotationType::Highlight, HighlightStrategy)
            .register(AnnotationType::Strikeout, StrikeoutStrategy)
            .register(AnnotationType::Underline, UnderlineStrategy)
            .register(AnnotationType::Area, AreaStrategy)
            .register(AnnotationType::Drawing, DrawingStrategy)
            .register(AnnotationType::Point, PointStrategy)
            .register(AnnotationType::Textbox, TextboxStrategy)
    }

    /// Register or replace the strategy for a type
    pub fn register(
        mut self,
        annotation_type: AnnotationType,
        strategy: impl DrawStrategy + 'static,
    ) -> Self {
        self.strategies.insert(annotation_type, Box::new(strategy));
        self
    }

    /// Leave annotations without a strategy undrawn instead of failing the page
    pub fn skip_unknown(mut self) -> Self {
        self.skip_unknown = true;
        self
    }

    pub fn supports(&self, annotation_type: &AnnotationType) -> bool {
        self.strategies.contains_key(annotation_type)
    }
}

impl AnnotationDrawer for DrawerRegistry {
    fn append_child(
        &self,
        surface: &mut Surface,
        annotation: &Annotation,
        viewport: &Viewport,
    ) -> Result<()> {
        let Some(strategy) = self.strategies.get(&annotation.annotation_type) else {
            if self.skip_unknown {
                tracing::debug!(
                    "Skipping annotation {:?} of unsupported type {}",
                    annotation.uuid,
                    annotation.annotation_type
                );
                return Ok(());
            }
            return Err(RenderError::UnsupportedType(annotation.annotation_type.to_string()));
        };

        let mut child = strategy.build(annotation)?;
        if let Some(uuid) = &annotation.uuid {
            child.set_attribute(ATTR_ANNOTATION_ID, uuid);
        }
        child.set_attribute(ATTR_ANNOTATION_TYPE, &annotation.annotation_type);
        child.set_attribute("transform", viewport.svg_transform());

        surface.append_child(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::surface::SvgNode;

    fn drawn(surface: &Surface, index: usize) -> &SvgElement {
        match &surface.children()[index] {
            SvgNode::Element(el) => el,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_tags_drawn_child() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let viewport = Viewport::new(1.5, 0, 918.0, 1188.0);
        let highlight =
            Annotation::new_highlight(vec![Rect::new(1.0, 2.0, 3.0, 4.0)]).with_uuid("h-1");

        registry.append_child(&mut surface, &highlight, &viewport).unwrap();

        let child = drawn(&surface, 0);
        assert_eq!(child.get_attribute(ATTR_ANNOTATION_ID), Some("h-1"));
        assert_eq!(child.get_attribute(ATTR_ANNOTATION_TYPE), Some("highlight"));
        assert_eq!(
            child.get_attribute("transform"),
            Some("scale(1.5) rotate(0) translate(0, 0)")
        );
    }

    #[test]
    fn test_unsupported_type() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let viewport = Viewport::new(1.0, 0, 612.0, 792.0);
        let stamp: Annotation = serde_json::from_str(r#"{"type": "stamp"}"#).unwrap();

        let err = registry
            .append_child(&mut surface, &stamp, &viewport)
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedType(t) if t == "stamp"));
        assert!(surface.children().is_empty());
    }

    #[test]
    fn test_skip_unknown_leaves_type_undrawn() {
        let registry = DrawerRegistry::with_defaults().skip_unknown();
        let mut surface = Surface::new();
        let viewport = Viewport::new(1.0, 0, 612.0, 792.0);
        let stamp: Annotation = serde_json::from_str(r#"{"type": "stamp"}"#).unwrap();
        let point = Annotation::new_point(5.0, 5.0);

        registry.append_child(&mut surface, &stamp, &viewport).unwrap();
        registry.append_child(&mut surface, &point, &viewport).unwrap();

        assert_eq!(surface.children().len(), 1);
        assert_eq!(drawn(&surface, 0).get_attribute(ATTR_ANNOTATION_TYPE), Some("point"));
    }

    #[test]
    fn test_register_closure_strategy() {
        let registry = DrawerRegistry::new().register(
            AnnotationType::Other("stamp".to_string()),
            |_: &Annotation| -> Result<SvgElement> { Ok(SvgElement::new("circle").attr("r", 4)) },
        );
        assert!(registry.supports(&AnnotationType::from("stamp")));
        assert!(!registry.supports(&AnnotationType::Highlight));

        let mut surface = Surface::new();
        let stamp: Annotation = serde_json::from_str(r#"{"type": "stamp"}"#).unwrap();
        registry
            .append_child(&mut surface, &stamp, &Viewport::new(1.0, 0, 1.0, 1.0))
            .unwrap();
        assert_eq!(drawn(&surface, 0).name, "circle");
    }
}
