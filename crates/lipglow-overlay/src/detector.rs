//! Face landmark detector interface.

use async_trait::async_trait;
use lipglow_models::FaceObservation;

use crate::error::DetectorResult;
use crate::frame::Frame;
use crate::tracking::TrackingState;

/// A face-landmark detector.
///
/// Called by the detection worker with one frame at a time. Implementations
/// may read and update `tracking` to carry temporal context between frames;
/// the same state is passed for the whole capture session.
#[async_trait]
pub trait LandmarkDetector: Send {
    /// Detect faces and their landmarks in `frame`.
    ///
    /// # Errors
    /// - [`DetectorError::UnsupportedFrame`] / [`DetectorError::Invocation`]
    ///   when the request could not be started
    /// - [`DetectorError::RequestFailed`] when it ran and failed
    ///
    /// [`DetectorError::UnsupportedFrame`]: crate::error::DetectorError::UnsupportedFrame
    /// [`DetectorError::Invocation`]: crate::error::DetectorError::Invocation
    /// [`DetectorError::RequestFailed`]: crate::error::DetectorError::RequestFailed
    async fn detect_face_landmarks(
        &mut self,
        frame: &Frame,
        tracking: &mut TrackingState,
    ) -> DetectorResult<Vec<FaceObservation>>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
