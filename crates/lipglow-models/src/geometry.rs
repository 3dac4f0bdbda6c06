//! Point and viewport types for the three coordinate spaces.
//!
//! - **Face-local**: [`FacePoint`], normalized within a face bounding box
//! - **Image-normalized**: [`crate::NormalizedRect`], normalized within the frame
//! - **Screen**: [`ScreenPoint`], pixels in the display surface (origin top-left)

use serde::{Deserialize, Serialize};

/// A landmark point normalized to [0,1] within a face bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacePoint {
    pub x: f64,
    pub y: f64,
}

impl FacePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in display-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Size of the display surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when the viewport has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether a pixel point falls inside the viewport.
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}
