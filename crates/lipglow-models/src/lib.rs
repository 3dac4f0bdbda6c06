//! Shared data models for the lipglow face overlay.
//!
//! This crate provides Serde-serializable types for:
//! - Normalized and pixel-space geometry
//! - Selectable facial features and their menu entries
//! - Face observations reported by a landmark detector

pub mod feature;
pub mod geometry;
pub mod observation;

// Re-export common types
pub use feature::{Feature, FeatureParseError, MenuOption};
pub use geometry::{FacePoint, ScreenPoint, Viewport};
pub use observation::{FaceLandmarks, FaceObservation, LandmarkRegion};

use serde::{Deserialize, Serialize};

/// A normalized rectangle (0.0 to 1.0) representing a relative region of a frame.
///
/// Detector space has its origin at the bottom-left corner of the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// X coordinate of the bottom-left corner (0.0 = left, 1.0 = right)
    pub x: f64,
    /// Y coordinate of the bottom-left corner (0.0 = bottom, 1.0 = top)
    pub y: f64,
    /// Width of the rectangle (0.0 to 1.0)
    pub width: f64,
    /// Height of the rectangle (0.0 to 1.0)
    pub height: f64,
}

impl NormalizedRect {
    /// Create a new normalized rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the rectangle is valid (within 0.0-1.0 range).
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.001 // Allow small epsilon for float precision
            && self.y + self.height <= 1.001
    }

    /// True when either side has zero (or negative) extent.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Center of the rectangle in normalized image space.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
