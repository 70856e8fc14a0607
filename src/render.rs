//! Render pass: reset, tag and repopulate an annotation surface

use crate::annotations::AnnotationResponse;
use crate::draw::AnnotationDrawer;
use crate::error::Result;
use crate::surface::{Surface, ATTR_CONTAINER, ATTR_DOCUMENT, ATTR_PAGE, ATTR_VIEWPORT};
use crate::viewport::Viewport;

/// Render a page's annotations to `surface`
///
/// Prior children are dropped and the surface is stamped with the viewport.
/// Document and page attributes are set only when `data` is present, so a
/// host can tell an empty page (attributes present, no children) from a
/// page that was never given data (attributes absent).
///
/// Drawing errors are not caught: the first failing annotation stops the
/// pass and its error is returned. Annotations drawn before it stay.
pub fn render<'s, D>(
    surface: &'s mut Surface,
    viewport: &Viewport,
    data: Option<&AnnotationResponse>,
    drawer: &D,
) -> Result<&'s mut Surface>
where
    D: AnnotationDrawer + ?Sized,
{
    reset_surface(surface, viewport)?;

    let Some(data) = data else {
        tracing::debug!("No annotation data, surface cleared");
        return Ok(surface);
    };

    surface.set_attribute(ATTR_DOCUMENT, &data.document_id);
    surface.set_attribute(ATTR_PAGE, data.page_number);

    if data.annotations.is_empty() {
        tracing::debug!(
            "No annotations for document {} page {}",
            data.document_id,
            data.page_number
        );
        return Ok(surface);
    }

    for annotation in &data.annotations {
        drawer.append_child(surface, annotation, viewport)?;
    }

    tracing::debug!(
        "Rendered {} annotations for document {} page {}",
        data.annotations.len(),
        data.document_id,
        data.page_number
    );

    Ok(surface)
}

fn reset_surface(surface: &mut Surface, viewport: &Viewport) -> Result<()> {
    surface.clear();
    surface.set_attribute(ATTR_CONTAINER, true);
    surface.set_attribute(ATTR_VIEWPORT, viewport.to_json()?);
    surface.remove_attribute(ATTR_DOCUMENT);
    surface.remove_attribute(ATTR_PAGE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, AnnotationType};
    use crate::draw::DrawerRegistry;
    use crate::error::RenderError;
    use crate::geometry::Rect;
    use std::cell::RefCell;

    /// Records every call instead of drawing
    #[derive(Default)]
    struct RecordingDrawer {
        calls: RefCell<Vec<(AnnotationType, f64)>>,
    }

    impl AnnotationDrawer for RecordingDrawer {
        fn append_child(
            &self,
            _surface: &mut Surface,
            annotation: &Annotation,
            viewport: &Viewport,
        ) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((annotation.annotation_type.clone(), viewport.scale));
            Ok(())
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(1.5, 0, 918.0, 1188.0)
    }

    fn highlight(y: f64) -> Annotation {
        Annotation::new_highlight(vec![Rect::new(10.0, y, 100.0, 12.0)])
    }

    #[test]
    fn test_none_removes_identity() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let data = AnnotationResponse::new("d1", 3, vec![highlight(10.0)]);
        render(&mut surface, &viewport(), Some(&data), &registry).unwrap();
        assert_eq!(surface.children().len(), 1);

        render(&mut surface, &viewport(), None, &registry).unwrap();
        assert!(!surface.has_attribute(ATTR_DOCUMENT));
        assert!(!surface.has_attribute(ATTR_PAGE));
        assert!(surface.children().is_empty());
        assert_eq!(surface.get_attribute(ATTR_CONTAINER), Some("true"));
    }

    #[test]
    fn test_empty_response_is_tagged() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let data = AnnotationResponse::new("d1", 3, vec![]);

        render(&mut surface, &viewport(), Some(&data), &registry).unwrap();
        assert_eq!(surface.get_attribute(ATTR_DOCUMENT), Some("d1"));
        assert_eq!(surface.get_attribute(ATTR_PAGE), Some("3"));
        assert!(surface.children().is_empty());
    }

    #[test]
    fn test_rerender_replaces_children() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let data = AnnotationResponse::new("d1", 1, vec![highlight(10.0), highlight(30.0)]);

        render(&mut surface, &viewport(), Some(&data), &registry).unwrap();
        let once = surface.children().to_vec();
        render(&mut surface, &viewport(), Some(&data), &registry).unwrap();

        assert_eq!(surface.children(), once.as_slice());
        assert_eq!(surface.children().len(), 2);
    }

    #[test]
    fn test_drawer_called_in_order_with_viewport() {
        let drawer = RecordingDrawer::default();
        let mut surface = Surface::new();
        let data = AnnotationResponse::new(
            "d1",
            1,
            vec![
                highlight(10.0),
                Annotation::new_strikeout(vec![Rect::new(0.0, 0.0, 5.0, 5.0)]),
            ],
        );

        render(&mut surface, &viewport(), Some(&data), &drawer).unwrap();
        assert_eq!(
            *drawer.calls.borrow(),
            vec![(AnnotationType::Highlight, 1.5), (AnnotationType::Strikeout, 1.5)]
        );
    }

    #[test]
    fn test_viewport_attribute_round_trip() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let mut vp = viewport();
        vp.offset_x = 12.5;
        vp.extra
            .insert("transform".to_string(), serde_json::json!([1.5, 0, 0, -1.5, 0, 1188]));

        render(&mut surface, &vp, None, &registry).unwrap();
        let stamped = surface.get_attribute(ATTR_VIEWPORT).unwrap();
        assert_eq!(Viewport::from_json(stamped).unwrap(), vp);
    }

    #[test]
    fn test_drawing_failure_aborts_remaining() {
        let registry = DrawerRegistry::with_defaults();
        let mut surface = Surface::new();
        let stamp: Annotation = serde_json::from_str(r#"{"type": "stamp"}"#).unwrap();
        let data = AnnotationResponse::new("d1", 2, vec![highlight(10.0), stamp, highlight(50.0)]);

        let err = render(&mut surface, &viewport(), Some(&data), &registry).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedType(_)));
        assert_eq!(surface.children().len(), 1);
        assert_eq!(surface.get_attribute(ATTR_PAGE), Some("2"));
    }
}
