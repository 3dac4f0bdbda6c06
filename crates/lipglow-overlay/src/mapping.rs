//! Coordinate mapping from face-local landmark space to screen pixels.
//!
//! Three spaces are involved:
//! - **Face-local**: landmark normalized within the face bounding box
//! - **Image-normalized**: [0,1]² over the full frame, origin bottom-left
//! - **Screen**: display pixels, origin top-left
//!
//! # Forward mapping
//! ```text
//! img_x     = bbox.x + p.x * bbox.width
//! img_y     = bbox.y + p.y * bbox.height
//! flipped_y = 1 - img_y
//! screen    = (img_x * viewport.width, flipped_y * viewport.height)
//! ```
//!
//! No clamping is applied. A face box partly outside the frame yields
//! off-screen points, which the renderer clips.
//!
//! # Usage
//! ```rust
//! use lipglow_models::{FacePoint, NormalizedRect, Viewport};
//! use lipglow_overlay::mapping::map_to_screen;
//!
//! let bbox = NormalizedRect::new(0.25, 0.25, 0.5, 0.5);
//! let p = map_to_screen(FacePoint::new(0.0, 0.0), &bbox, Viewport::new(1000.0, 1000.0));
//! assert_eq!((p.x, p.y), (250.0, 750.0));
//! ```

use lipglow_models::{FacePoint, NormalizedRect, ScreenPoint, Viewport};

/// Map a face-local landmark to display pixels.
#[inline]
pub fn map_to_screen(point: FacePoint, bbox: &NormalizedRect, viewport: Viewport) -> ScreenPoint {
    let img_x = bbox.x + point.x * bbox.width;
    let img_y = bbox.y + point.y * bbox.height;

    // Detector origin is bottom-left, display origin is top-left
    let flipped_y = 1.0 - img_y;

    ScreenPoint::new(img_x * viewport.width, flipped_y * viewport.height)
}

/// Map a display pixel back into face-local space.
///
/// Returns `None` when the box or viewport has zero extent, since the
/// forward mapping is not invertible there.
pub fn map_from_screen(
    point: ScreenPoint,
    bbox: &NormalizedRect,
    viewport: Viewport,
) -> Option<FacePoint> {
    if bbox.is_degenerate() || viewport.is_empty() {
        return None;
    }

    let img_x = point.x / viewport.width;
    let img_y = 1.0 - point.y / viewport.height;

    Some(FacePoint::new(
        (img_x - bbox.x) / bbox.width,
        (img_y - bbox.y) / bbox.height,
    ))
}

/// A face box and viewport captured together for repeated projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    pub bbox: NormalizedRect,
    pub viewport: Viewport,
}

impl ScreenMapping {
    pub fn new(bbox: NormalizedRect, viewport: Viewport) -> Self {
        Self { bbox, viewport }
    }

    /// Forward mapping, see [`map_to_screen`].
    #[inline]
    pub fn project(&self, point: FacePoint) -> ScreenPoint {
        map_to_screen(point, &self.bbox, self.viewport)
    }

    /// Inverse mapping, see [`map_from_screen`].
    pub fn unproject(&self, point: ScreenPoint) -> Option<FacePoint> {
        map_from_screen(point, &self.bbox, self.viewport)
    }
}
