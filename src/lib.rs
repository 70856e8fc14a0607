//! Annotation Layer
//!
//! Renders a page's persisted annotations onto an SVG surface overlaying the
//! page image, and marks highlighted and struck-out spans in the page's text
//! layer so screen readers can find them.
//!
//! # Modules
//!
//! - `render`: the synchronous render pass (reset, tag, draw)
//! - `draw`: per-type drawing strategies behind `AnnotationDrawer`
//! - `hints`: the deferred screen reader hint pass
//! - `renderer`: `PageRenderer`, tying both passes to shared page state

pub mod annotations;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod hints;
pub mod render;
pub mod renderer;
pub mod surface;
pub mod text_layer;
pub mod viewer;
pub mod viewport;

pub use annotations::{Annotation, AnnotationResponse, AnnotationSource, AnnotationType, MemorySource};
pub use config::RenderConfig;
pub use draw::{AnnotationDrawer, DrawStrategy, DrawerRegistry};
pub use error::{HintError, RenderError};
pub use geometry::{point_intersects_rect, ClientRect, Point, Rect};
pub use hints::{elements_from_point, insert_screen_reader_hints, schedule_hints, HintReport, HintTrigger};
pub use render::render;
pub use renderer::{HintHandle, PageRenderer};
pub use surface::Surface;
pub use text_layer::{ScreenReaderHint, TextLayer, TextLayerNode};
pub use viewer::{PageView, SharedViewer, Viewer};
pub use viewport::{scale_up, Viewport};
