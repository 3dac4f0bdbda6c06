//! Per-frame detection pipeline.
//!
//! Each frame moves through `received -> detection requested -> detection
//! completed`. On completion the first face is turned into an overlay path,
//! or the overlay is cleared, and the result is sent to the render context.
//! A detector that cannot even be invoked for a frame drops that frame
//! without touching the overlay.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use lipglow_models::{Feature, FaceObservation, Viewport};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use crate::config::OverlayConfig;
use crate::contour::build_lip_contours;
use crate::detector::LandmarkDetector;
use crate::error::{OverlayError, OverlayResult};
use crate::frame::Frame;
use crate::frame_source::FrameQueue;
use crate::mapping::ScreenMapping;
use crate::metrics;
use crate::path::OverlayPath;
use crate::render::RenderCommand;
use crate::selector::FeatureSelector;
use crate::tracking::TrackingState;

/// Why a frame ended with the overlay cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// Detection completed without any face
    NoFaces,
    /// Detection ran and reported an error
    DetectionFailed,
    /// Nothing is selected
    NoSelection,
    /// The selected feature has no overlay
    FeatureNotWired(Feature),
    /// The face carries no outer-lip landmarks
    MissingLandmarks,
    /// Too few outer-lip points to build a contour
    InsufficientLandmarks { count: usize },
}

impl ClearReason {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClearReason::NoFaces => "no_faces",
            ClearReason::DetectionFailed => "detection_failed",
            ClearReason::NoSelection => "no_selection",
            ClearReason::FeatureNotWired(_) => "feature_not_wired",
            ClearReason::MissingLandmarks => "missing_landmarks",
            ClearReason::InsufficientLandmarks { .. } => "insufficient_landmarks",
        }
    }
}

impl fmt::Display for ClearReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// An overlay was published
    Rendered { point_count: usize },
    /// `None` was published
    Cleared(ClearReason),
    /// The detector could not be invoked; the overlay was left alone
    Dropped,
}

/// Runs the detector on frames and forwards overlay updates.
pub struct DetectionPipeline<D: LandmarkDetector> {
    detector: D,
    tracking: TrackingState,
    selector: FeatureSelector,
    viewport: Viewport,
    min_lip_points: usize,
    render_tx: mpsc::Sender<RenderCommand>,
    /// Frames handed to the detector
    frames_processed: u64,
}

impl<D: LandmarkDetector> DetectionPipeline<D> {
    pub fn new(
        detector: D,
        selector: FeatureSelector,
        config: &OverlayConfig,
        render_tx: mpsc::Sender<RenderCommand>,
    ) -> Self {
        Self {
            detector,
            tracking: TrackingState::new(config.landmark_smoothing, config.max_track_gap),
            selector,
            viewport: config.viewport,
            min_lip_points: config.min_lip_points,
            render_tx,
            frames_processed: 0,
        }
    }

    /// Frames handed to the detector, whatever the outcome.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Session-long tracking state.
    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    /// Run detection on one frame and publish the result.
    ///
    /// Only fails when the render context has gone away.
    pub async fn process_frame(&mut self, frame: Frame) -> OverlayResult<FrameOutcome> {
        let frame_id = frame.id;
        self.frames_processed += 1;
        trace!(frame_id, "Detection requested");

        let started = Instant::now();
        let result = self
            .detector
            .detect_face_landmarks(&frame, &mut self.tracking)
            .await;
        metrics::record_detection(started.elapsed().as_secs_f64());

        let observations = match result {
            Ok(observations) => observations,
            Err(e) if e.clears_overlay() => {
                debug!(frame_id, error = %e, "Detection completed with error");
                return self.clear(frame_id, ClearReason::DetectionFailed).await;
            }
            Err(e) => {
                debug!(frame_id, error = %e, "Frame dropped");
                metrics::record_frame_dropped("invocation");
                return Ok(FrameOutcome::Dropped);
            }
        };

        match self.overlay_for(&observations) {
            Ok(path) => {
                let point_count = path.point_count();
                self.send(frame_id, Some(path)).await?;
                debug!(frame_id, point_count, "Overlay rendered");
                Ok(FrameOutcome::Rendered { point_count })
            }
            Err(reason) => self.clear(frame_id, reason).await,
        }
    }

    /// Build the overlay for the first face, gated on the current selection.
    fn overlay_for(&self, observations: &[FaceObservation]) -> Result<OverlayPath, ClearReason> {
        let face = observations.first().ok_or(ClearReason::NoFaces)?;
        if observations.len() > 1 {
            trace!(faces = observations.len(), "Ignoring all but the first face");
        }

        match self.selector.current() {
            None => return Err(ClearReason::NoSelection),
            Some(feature) if !feature.has_overlay() => {
                return Err(ClearReason::FeatureNotWired(feature))
            }
            Some(_) => {}
        }

        let lips = face.outer_lips().ok_or(ClearReason::MissingLandmarks)?;
        let mapping = ScreenMapping::new(face.bounding_box, self.viewport);
        build_lip_contours(lips, self.min_lip_points, |p| mapping.project(p))
            .ok_or(ClearReason::InsufficientLandmarks { count: lips.len() })
    }

    async fn clear(&mut self, frame_id: u64, reason: ClearReason) -> OverlayResult<FrameOutcome> {
        self.send(frame_id, None).await?;
        metrics::record_overlay_cleared(reason.as_str());
        debug!(frame_id, reason = %reason, "Overlay cleared");
        Ok(FrameOutcome::Cleared(reason))
    }

    async fn send(&mut self, frame_id: u64, path: Option<OverlayPath>) -> OverlayResult<()> {
        self.render_tx
            .send(RenderCommand::Publish { frame_id, path })
            .await
            .map_err(|_| OverlayError::RenderChannelClosed)
    }

    /// Drain `queue` until it closes, shutdown is signalled or the render
    /// context goes away.
    ///
    /// Frames already waiting are processed before a shutdown signal is
    /// honoured.
    pub async fn run(mut self, queue: Arc<FrameQueue>, mut shutdown: watch::Receiver<bool>) -> Self {
        info!(detector = self.detector.name(), "Detection worker started");
        loop {
            tokio::select! {
                biased;
                frame = queue.recv() => {
                    let Some(frame) = frame else {
                        break;
                    };
                    if let Err(e) = self.process_frame(frame).await {
                        warn!(error = %e, "Stopping detection worker");
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown signal received, stopping detection worker");
                        break;
                    }
                }
            }
        }
        info!(frames = self.frames_processed, "Detection worker stopped");
        self
    }
}
