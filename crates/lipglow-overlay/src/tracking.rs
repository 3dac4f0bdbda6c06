//! Temporal tracking state carried across frames.
//!
//! The detection pipeline owns one [`TrackingState`] for the lifetime of a
//! capture session and lends it to the detector on every frame. Detectors
//! use it to stabilise landmark estimates:
//! - Landmark points are blended with an exponential moving average
//! - The last face box and frames-since-seen are kept for re-acquisition
//! - State resets after `max_gap` consecutive frames without a face

use lipglow_models::{FaceLandmarks, FaceObservation, FacePoint, LandmarkRegion, NormalizedRect};
use std::collections::HashMap;
use tracing::debug;

/// Per-session temporal context.
#[derive(Debug, Clone)]
pub struct TrackingState {
    /// Weight of the newest estimate in the moving average (0, 1]
    alpha: f64,
    /// Frames without a face before the state is dropped
    max_gap: u32,
    /// Frames processed this session
    frames_seen: u64,
    /// Consecutive frames without a face
    gap: u32,
    /// Last reported face box
    last_box: Option<NormalizedRect>,
    /// Smoothed landmark points per region
    smoothed: HashMap<LandmarkRegion, Vec<FacePoint>>,
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::new(0.6, 5)
    }
}

impl TrackingState {
    /// Create a tracking state.
    pub fn new(alpha: f64, max_gap: u32) -> Self {
        Self {
            alpha: alpha.clamp(f64::EPSILON, 1.0),
            max_gap,
            frames_seen: 0,
            gap: 0,
            last_box: None,
            smoothed: HashMap::new(),
        }
    }

    /// Frames processed since the session started.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Consecutive frames without a face.
    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Last face box, if a face is currently tracked.
    pub fn last_box(&self) -> Option<NormalizedRect> {
        self.last_box
    }

    /// Whether a face is currently being tracked.
    pub fn is_tracking(&self) -> bool {
        self.last_box.is_some()
    }

    /// Fold one detection result into the state.
    ///
    /// Landmarks of the first face are replaced by their smoothed values, so
    /// detectors can call this right before returning.
    pub fn update(&mut self, observations: &mut [FaceObservation]) {
        self.frames_seen += 1;

        let Some(face) = observations.first_mut() else {
            self.mark_missed();
            return;
        };

        self.gap = 0;
        self.last_box = Some(face.bounding_box);

        match face.landmarks.as_mut() {
            Some(landmarks) => self.smooth(landmarks),
            None => self.smoothed.clear(),
        }
    }

    /// Record a frame with no face.
    pub fn mark_missed(&mut self) {
        self.gap = self.gap.saturating_add(1);
        if self.gap > self.max_gap && self.is_tracking() {
            debug!(gap = self.gap, "Face lost, resetting tracking state");
            self.reset();
        }
    }

    /// Drop all temporal context.
    pub fn reset(&mut self) {
        self.last_box = None;
        self.smoothed.clear();
    }

    fn smooth(&mut self, landmarks: &mut FaceLandmarks) {
        let alpha = self.alpha;
        // Regions missing from this frame start over when they come back
        self.smoothed.retain(|region, _| landmarks.region(*region).is_some());
        for (region, points) in landmarks.iter_mut() {
            // A changed point count means the previous estimate does not line up
            let aligned = self
                .smoothed
                .get(region)
                .is_some_and(|prev| prev.len() == points.len());
            if !aligned {
                self.smoothed.insert(*region, points.clone());
                continue;
            }
            if let Some(prev) = self.smoothed.get_mut(region) {
                for (p, s) in points.iter_mut().zip(prev.iter_mut()) {
                    s.x = alpha * p.x + (1.0 - alpha) * s.x;
                    s.y = alpha * p.y + (1.0 - alpha) * s.y;
                    *p = *s;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: f64, lips: Vec<FacePoint>) -> FaceObservation {
        FaceObservation::with_landmarks(
            NormalizedRect::new(x, 0.2, 0.4, 0.4),
            FaceLandmarks::new().with_region(LandmarkRegion::OuterLips, lips),
        )
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut state = TrackingState::new(0.5, 3);
        let mut obs = vec![face(0.1, vec![FacePoint::new(0.2, 0.2)])];
        state.update(&mut obs);
        assert_eq!(obs[0].outer_lips().unwrap()[0], FacePoint::new(0.2, 0.2));
        assert!(state.is_tracking());
        assert_eq!(state.frames_seen(), 1);
    }

    #[test]
    fn test_landmarks_are_smoothed() {
        let mut state = TrackingState::new(0.5, 3);
        state.update(&mut [face(0.1, vec![FacePoint::new(0.0, 0.0)])]);

        let mut obs = vec![face(0.1, vec![FacePoint::new(1.0, 1.0)])];
        state.update(&mut obs);
        let p = obs[0].outer_lips().unwrap()[0];
        assert!((p.x - 0.5).abs() < 1e-9);
        assert!((p.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_point_count_change_restarts_region() {
        let mut state = TrackingState::new(0.5, 3);
        state.update(&mut [face(0.1, vec![FacePoint::new(0.0, 0.0)])]);

        let mut obs = vec![face(0.1, vec![FacePoint::new(1.0, 1.0), FacePoint::new(0.5, 0.5)])];
        state.update(&mut obs);
        assert_eq!(obs[0].outer_lips().unwrap()[0], FacePoint::new(1.0, 1.0));
    }

    #[test]
    fn test_absent_region_is_forgotten() {
        let mut state = TrackingState::new(0.5, 3);
        state.update(&mut [face(0.1, vec![FacePoint::new(0.0, 0.0)])]);

        let mut without_lips = FaceObservation::with_landmarks(
            NormalizedRect::new(0.1, 0.2, 0.4, 0.4),
            FaceLandmarks::new()
                .with_region(LandmarkRegion::LeftEye, vec![FacePoint::new(0.3, 0.3)]),
        );
        state.update(std::slice::from_mut(&mut without_lips));

        let mut obs = vec![face(0.1, vec![FacePoint::new(1.0, 1.0)])];
        state.update(&mut obs);
        assert_eq!(obs[0].outer_lips().unwrap()[0], FacePoint::new(1.0, 1.0));
    }

    #[test]
    fn test_face_without_landmarks_drops_smoothing() {
        let mut state = TrackingState::new(0.5, 3);
        state.update(&mut [face(0.1, vec![FacePoint::new(0.0, 0.0)])]);
        state.update(&mut [FaceObservation::new(NormalizedRect::new(0.1, 0.2, 0.4, 0.4))]);
        assert!(state.is_tracking());

        let mut obs = vec![face(0.1, vec![FacePoint::new(1.0, 1.0)])];
        state.update(&mut obs);
        assert_eq!(obs[0].outer_lips().unwrap()[0], FacePoint::new(1.0, 1.0));
    }

    #[test]
    fn test_reset_after_gap() {
        let mut state = TrackingState::new(0.5, 2);
        state.update(&mut [face(0.1, vec![FacePoint::new(0.0, 0.0)])]);

        state.update(&mut []);
        state.update(&mut []);
        assert!(state.is_tracking());
        state.update(&mut []);
        assert!(!state.is_tracking());
        assert_eq!(state.gap(), 3);

        // Fresh estimate after reset is not blended with stale points
        let mut obs = vec![face(0.1, vec![FacePoint::new(1.0, 1.0)])];
        state.update(&mut obs);
        assert_eq!(obs[0].outer_lips().unwrap()[0], FacePoint::new(1.0, 1.0));
        assert_eq!(state.gap(), 0);
    }
}
