//! Face observations produced by one detection pass.

use crate::geometry::FacePoint;
use crate::NormalizedRect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named landmark group reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkRegion {
    /// Outer lip contour, ordered from a fixed mouth corner
    OuterLips,
    InnerLips,
    LeftEye,
    RightEye,
    LeftEyebrow,
    RightEyebrow,
    Nose,
    /// Jaw line from ear to ear
    FaceContour,
}

/// Landmark point sequences keyed by region.
///
/// Points are normalized within the owning face's bounding box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    regions: BTreeMap<LandmarkRegion, Vec<FacePoint>>,
}

impl FaceLandmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_region(mut self, region: LandmarkRegion, points: Vec<FacePoint>) -> Self {
        self.insert(region, points);
        self
    }

    pub fn insert(&mut self, region: LandmarkRegion, points: Vec<FacePoint>) {
        self.regions.insert(region, points);
    }

    /// Ordered points for a region, if the detector reported it.
    pub fn region(&self, region: LandmarkRegion) -> Option<&[FacePoint]> {
        self.regions.get(&region).map(|v| v.as_slice())
    }

    pub fn region_mut(&mut self, region: LandmarkRegion) -> Option<&mut Vec<FacePoint>> {
        self.regions.get_mut(&region)
    }

    /// Shortcut for the outer lip contour.
    pub fn outer_lips(&self) -> Option<&[FacePoint]> {
        self.region(LandmarkRegion::OuterLips)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LandmarkRegion, &Vec<FacePoint>)> {
        self.regions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&LandmarkRegion, &mut Vec<FacePoint>)> {
        self.regions.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Result of one detection pass for a single face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Face region normalized within the image, origin bottom-left
    pub bounding_box: NormalizedRect,
    /// Landmark groups, absent when the detector could not place them
    pub landmarks: Option<FaceLandmarks>,
    /// Detector confidence (0.0-1.0)
    pub confidence: f64,
}

impl FaceObservation {
    /// Create an observation without landmarks.
    pub fn new(bounding_box: NormalizedRect) -> Self {
        Self {
            bounding_box,
            landmarks: None,
            confidence: 1.0,
        }
    }

    /// Create an observation carrying landmarks.
    pub fn with_landmarks(bounding_box: NormalizedRect, landmarks: FaceLandmarks) -> Self {
        Self {
            bounding_box,
            landmarks: Some(landmarks),
            confidence: 1.0,
        }
    }

    /// Outer lip contour, if landmarks were reported and include it.
    pub fn outer_lips(&self) -> Option<&[FacePoint]> {
        self.landmarks.as_ref().and_then(|l| l.outer_lips())
    }
}
