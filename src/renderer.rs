//! Page renderer: the render pass plus its deferred hint pass

use tokio::task::JoinHandle;

use crate::annotations::AnnotationResponse;
use crate::config::RenderConfig;
use crate::draw::{AnnotationDrawer, DrawerRegistry};
use crate::error::{HintError, RenderError, Result};
use crate::hints::{schedule_hints, HintReport, HintTrigger};
use crate::render::render;
use crate::surface::Surface;
use crate::viewer::SharedViewer;
use crate::viewport::Viewport;

/// Handle of a spawned hint pass
pub type HintHandle = JoinHandle<std::result::Result<HintReport, HintError>>;

/// Renders annotation pages with one drawer and one configuration
pub struct PageRenderer<D = DrawerRegistry> {
    drawer: D,
    config: RenderConfig,
}

impl PageRenderer<DrawerRegistry> {
    /// Renderer using the built-in drawing strategies
    pub fn new(config: RenderConfig) -> Self {
        Self::with_drawer(DrawerRegistry::with_defaults(), config)
    }
}

impl<D: AnnotationDrawer> PageRenderer<D> {
    pub fn with_drawer(drawer: D, config: RenderConfig) -> Self {
        Self { drawer, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The fixed-delay trigger from configuration
    pub fn delay_trigger(&self) -> HintTrigger {
        HintTrigger::Delay(self.config.hints.delay())
    }

    /// Render onto a standalone surface; no hint pass is scheduled
    pub fn render<'s>(
        &self,
        surface: &'s mut Surface,
        viewport: &Viewport,
        data: Option<&AnnotationResponse>,
    ) -> Result<&'s mut Surface> {
        render(surface, viewport, data, &self.drawer)
    }

    /// Render the page in slot `page_index` and schedule its hint pass
    ///
    /// The hint pass is spawned only when hints are enabled and `data` has
    /// annotations. It starts once `trigger` fires; the returned handle may
    /// be dropped, which detaches it. Must be called within a Tokio runtime.
    pub fn render_page(
        &self,
        viewer: &SharedViewer,
        page_index: usize,
        viewport: &Viewport,
        data: Option<&AnnotationResponse>,
        trigger: HintTrigger,
    ) -> Result<Option<HintHandle>> {
        {
            let mut guard = viewer.lock();
            let page = guard
                .page_mut(page_index)
                .ok_or(RenderError::PageNotFound(page_index))?;
            render(&mut page.surface, viewport, data, &self.drawer)?;
        }

        let Some(data) = data.filter(|d| !d.annotations.is_empty()) else {
            return Ok(None);
        };

        if !self.config.hints.enabled {
            tracing::debug!("Screen reader hints disabled, page {}", data.page_number);
            return Ok(None);
        }

        Ok(Some(schedule_hints(
            viewer.clone(),
            data.page_number,
            data.annotations.clone(),
            trigger,
            self.config.hints.probe_offset,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Annotation;
    use crate::geometry::{ClientRect, Rect};
    use crate::text_layer::{TextLayer, TextLayerNode};
    use crate::viewer::{PageView, Viewer};

    fn shared_viewer() -> SharedViewer {
        let surface = Surface::with_bounds(ClientRect::from_origin(0.0, 0.0, 612.0, 792.0));
        let text_layer = TextLayer::new(vec![TextLayerNode::new(
            "Lorem",
            ClientRect::from_origin(0.0, 0.0, 200.0, 20.0),
        )]);
        let mut viewer = Viewer::new();
        viewer.add_page(PageView::new(surface, text_layer));
        viewer.into_shared()
    }

    fn data() -> AnnotationResponse {
        AnnotationResponse::new(
            "doc",
            1,
            vec![Annotation::new_highlight(vec![Rect::new(0.0, 0.0, 50.0, 10.0)])],
        )
    }

    #[tokio::test]
    async fn test_render_page_schedules_hints() {
        let renderer = PageRenderer::new(RenderConfig::default());
        let viewer = shared_viewer();
        let viewport = Viewport::new(1.0, 0, 612.0, 792.0);

        let handle = renderer
            .render_page(&viewer, 0, &viewport, Some(&data()), HintTrigger::Immediate)
            .unwrap()
            .expect("hint pass scheduled");
        assert_eq!(viewer.lock().page(0).unwrap().surface.children().len(), 1);

        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.inserted, 2);
    }

    #[tokio::test]
    async fn test_no_hint_pass_without_annotations() {
        let renderer = PageRenderer::new(RenderConfig::default());
        let viewer = shared_viewer();
        let viewport = Viewport::new(1.0, 0, 612.0, 792.0);

        let empty = AnnotationResponse::new("doc", 1, vec![]);
        assert!(renderer
            .render_page(&viewer, 0, &viewport, Some(&empty), HintTrigger::Immediate)
            .unwrap()
            .is_none());
        assert!(renderer
            .render_page(&viewer, 0, &viewport, None, HintTrigger::Immediate)
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_hints_disabled() {
        let mut config = RenderConfig::default();
        config.hints.enabled = false;
        let renderer = PageRenderer::new(config);
        let viewer = shared_viewer();
        let viewport = Viewport::new(1.0, 0, 612.0, 792.0);

        let handle = renderer
            .render_page(&viewer, 0, &viewport, Some(&data()), renderer.delay_trigger())
            .unwrap();
        assert!(handle.is_none());
        assert_eq!(viewer.lock().page(0).unwrap().surface.children().len(), 1);
    }

    #[test]
    fn test_unknown_page_slot() {
        let renderer = PageRenderer::new(RenderConfig::default());
        let viewer = shared_viewer();
        let viewport = Viewport::new(1.0, 0, 612.0, 792.0);

        let err = renderer
            .render_page(&viewer, 4, &viewport, None, HintTrigger::Immediate)
            .unwrap_err();
        assert!(matches!(err, RenderError::PageNotFound(4)));
    }
}
