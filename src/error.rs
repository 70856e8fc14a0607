//! Error types for the annotation layer

use thiserror::Error;

/// Result type for the synchronous render phase
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised while resetting a surface or drawing annotations
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No drawing strategy registered for annotation type: {0}")]
    UnsupportedType(String),

    #[error("Annotation {uuid} is missing {field}")]
    MissingGeometry { uuid: String, field: &'static str },

    #[error("Drawing failed: {0}")]
    Draw(String),

    #[error("No page container at slot {0}")]
    PageNotFound(usize),

    #[error("Surface has no viewport attribute")]
    MissingViewport,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SVG serialization error: {0}")]
    Svg(#[from] quick_xml::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised by the deferred hint pass
///
/// These never reach the caller of `render`; they surface through the
/// hint task's join handle and the log.
#[derive(Error, Debug)]
pub enum HintError {
    #[error("No surface tagged for page {0}")]
    SurfaceNotFound(u32),

    #[error("Text layer readiness signal dropped for page {0}")]
    SignalDropped(u32),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
