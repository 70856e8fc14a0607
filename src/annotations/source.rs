//! Annotation retrieval boundary
//!
//! The renderer never talks to storage itself; hosts hand it whatever an
//! `AnnotationSource` returns for a page.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::types::{Annotation, AnnotationResponse};

/// Source of persisted annotations
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    /// Fetch every annotation on one page of a document
    async fn get_annotations(
        &self,
        document_id: &str,
        page_number: u32,
    ) -> anyhow::Result<AnnotationResponse>;
}

/// In-memory source keyed by document and page
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: RwLock<HashMap<(String, u32), Vec<Annotation>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation to a page
    pub fn add(&self, document_id: &str, page_number: u32, annotation: Annotation) {
        self.pages
            .write()
            .entry((document_id.to_string(), page_number))
            .or_default()
            .push(annotation);
    }

    /// Load a full response, replacing that page's annotations
    pub fn load(&self, response: AnnotationResponse) {
        self.pages.write().insert(
            (response.document_id, response.page_number),
            response.annotations,
        );
    }
}

#[async_trait]
impl AnnotationSource for MemorySource {
    async fn get_annotations(
        &self,
        document_id: &str,
        page_number: u32,
    ) -> anyhow::Result<AnnotationResponse> {
        let annotations = self
            .pages
            .read()
            .get(&(document_id.to_string(), page_number))
            .cloned()
            .unwrap_or_default();

        Ok(AnnotationResponse::new(document_id, page_number, annotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[tokio::test]
    async fn test_get_by_page() {
        let source = MemorySource::new();
        source.add("doc", 1, Annotation::new_highlight(vec![Rect::new(0.0, 0.0, 5.0, 5.0)]));
        source.add("doc", 1, Annotation::new_point(3.0, 3.0));
        source.add("doc", 2, Annotation::new_point(1.0, 1.0));

        let page_one = source.get_annotations("doc", 1).await.unwrap();
        assert_eq!(page_one.annotations.len(), 2);
        assert_eq!(page_one.page_number, 1);

        let missing = source.get_annotations("other", 1).await.unwrap();
        assert!(missing.annotations.is_empty());
        assert_eq!(missing.document_id, "other");
    }

    #[tokio::test]
    async fn test_load_replaces_page() {
        let source = MemorySource::new();
        source.add("doc", 1, Annotation::new_point(3.0, 3.0));
        source.load(AnnotationResponse::new("doc", 1, vec![]));

        let page = source.get_annotations("doc", 1).await.unwrap();
        assert!(page.annotations.is_empty());
    }
}
