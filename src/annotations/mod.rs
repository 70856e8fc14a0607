//! Annotation module
//!
//! The annotation data model consumed by the renderer, plus the retrieval
//! boundary hosts implement to feed it.
//!
//! # Annotation types
//!
//! - Highlight and strikeout (rectangle spans, screen reader hinted)
//! - Underline
//! - Area, drawing, point and text box
//! - Anything else, preserved as `AnnotationType::Other`

mod source;
mod types;

pub use source::{AnnotationSource, MemorySource};
pub use types::{Annotation, AnnotationResponse, AnnotationType};
