//! Platform-independent core of the map viewer: the screen/image transform,
//! pan and zoom handling, and freehand annotations kept in image space.

mod annotation;
mod color;
mod config;
mod controller;
mod error;
mod input;
mod surface;
mod transform;
mod viewport;

use serde::{Deserialize, Serialize};

pub use annotation::AnnotationLayer;
pub use color::Color;
pub use config::ViewerConfig;
pub use controller::{DragState, PanZoomController};
pub use error::{ColorParseError, ConfigError};
pub use input::{InputEvent, PointerButton};
pub use surface::{ImagePlacement, Rect, RenderSurface};
pub use transform::{ScaleBounds, ViewportTransform};
pub use viewport::{clamp_viewport, ImageSize, ImageState, Mode, Viewport, ViewportState};

#[cfg(test)]
pub(crate) use surface::recording;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A freehand stroke. Points are in image space.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub points: Vec<Point>,
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.is_finite() {
        return None;
    }
    Some(point)
}
