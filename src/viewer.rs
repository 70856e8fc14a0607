//! Page containers shared between the renderer and the deferred hint pass

use parking_lot::Mutex;
use std::sync::Arc;

use crate::surface::Surface;
use crate::text_layer::TextLayer;

/// One page container: the annotation surface and its sibling text layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub surface: Surface,
    pub text_layer: TextLayer,
}

impl PageView {
    pub fn new(surface: Surface, text_layer: TextLayer) -> Self {
        Self {
            surface,
            text_layer,
        }
    }
}

/// Every page container of an open document, in host order
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pages: Vec<PageView>,
}

/// Viewer handle shared with spawned hint passes
pub type SharedViewer = Arc<Mutex<Viewer>>;

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedViewer {
        Arc::new(Mutex::new(self))
    }

    /// Add a page container, returning its slot index
    pub fn add_page(&mut self, page: PageView) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Remove a page container; later slots shift down
    pub fn remove_page(&mut self, index: usize) -> Option<PageView> {
        (index < self.pages.len()).then(|| self.pages.remove(index))
    }

    pub fn page(&self, index: usize) -> Option<&PageView> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut PageView> {
        self.pages.get_mut(index)
    }

    /// The container whose surface was last rendered for `page_number`
    pub fn find_page(&self, page_number: u32) -> Option<&PageView> {
        self.pages.iter().find(|p| p.surface.is_page(page_number))
    }

    pub fn find_page_mut(&mut self, page_number: u32) -> Option<&mut PageView> {
        self.pages.iter_mut().find(|p| p.surface.is_page(page_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ATTR_PAGE;

    #[test]
    fn test_find_by_page_attribute() {
        let mut viewer = Viewer::new();
        let untagged = viewer.add_page(PageView::default());
        let tagged = viewer.add_page(PageView::default());
        viewer
            .page_mut(tagged)
            .unwrap()
            .surface
            .set_attribute(ATTR_PAGE, 7);

        assert_eq!(untagged, 0);
        assert!(viewer.find_page(7).is_some());
        assert!(viewer.find_page(1).is_none());

        viewer.remove_page(tagged);
        assert!(viewer.find_page(7).is_none());
        assert!(viewer.remove_page(5).is_none());
    }
}
