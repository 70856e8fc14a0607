//! Page viewport and the content-to-display scale transform

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RenderError, Result};
use crate::geometry::Point;
use crate::surface::{Surface, ATTR_VIEWPORT};

/// Display parameters of one rendered page
///
/// Fields this crate does not interpret are kept in `extra` so the value
/// survives a round-trip through the surface's viewport attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scale: f64,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Viewport {
    pub fn new(scale: f64, rotation: i32, width: f64, height: f64) -> Self {
        Self {
            scale,
            rotation,
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
            extra: Map::new(),
        }
    }

    /// Rotation normalized into `0..360`
    pub fn normalized_rotation(&self) -> i32 {
        self.rotation.rem_euclid(360)
    }

    /// Translation that keeps rotated content inside the page box
    pub fn translation(&self) -> Point {
        match self.normalized_rotation() {
            90 => Point::new(0.0, -(self.width / self.scale)),
            180 => Point::new(-(self.width / self.scale), -(self.height / self.scale)),
            270 => Point::new(-(self.height / self.scale), 0.0),
            _ => Point::new(0.0, 0.0),
        }
    }

    /// SVG transform attribute for a drawn annotation
    pub fn svg_transform(&self) -> String {
        let trans = self.translation();
        format!(
            "scale({}) rotate({}) translate({}, {})",
            self.scale, self.rotation, trans.x, trans.y
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Map a content-space point to display space using the surface's viewport
pub fn scale_up(surface: &Surface, point: Point) -> Result<Point> {
    let viewport = surface_viewport(surface)?;
    Ok(Point::new(point.x * viewport.scale, point.y * viewport.scale))
}

fn surface_viewport(surface: &Surface) -> Result<Viewport> {
    let json = surface
        .get_attribute(ATTR_VIEWPORT)
        .ok_or(RenderError::MissingViewport)?;
    Viewport::from_json(json)
}
