//! Synthetic platform: a timer-driven camera, a landmark detector that
//! reports a slowly drifting face, and a permission provider with a fixed
//! answer.

use std::f64::consts::TAU;
use std::time::Duration;

use async_trait::async_trait;
use lipglow_models::{FaceLandmarks, FaceObservation, FacePoint, LandmarkRegion, NormalizedRect};
use lipglow_overlay::{
    CameraAuthorization, CameraPermissions, CaptureSession, DetectorError, DetectorResult, Frame,
    FrameSink, LandmarkDetector, OverlayError, OverlayResult, PixelFormat, TrackingState,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Points in the synthetic outer-lip contour.
pub const SYNTHETIC_LIP_POINTS: usize = 20;

/// Timer-driven capture session producing blank BGRA frames.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    interval: Duration,
    budget: u64,
    progress_tx: Option<watch::Sender<u64>>,
    progress_rx: watch::Receiver<u64>,
    task: Option<JoinHandle<()>>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32, interval: Duration, budget: u64) -> Self {
        let (progress_tx, progress_rx) = watch::channel(0);
        Self {
            width,
            height,
            interval,
            budget,
            progress_tx: Some(progress_tx),
            progress_rx,
            task: None,
        }
    }

    /// Number of frames delivered so far.
    pub fn progress(&self) -> watch::Receiver<u64> {
        self.progress_rx.clone()
    }
}

impl CaptureSession for SyntheticCamera {
    fn start(&mut self, sink: FrameSink) -> OverlayResult<()> {
        let progress = self
            .progress_tx
            .take()
            .ok_or_else(|| OverlayError::capture_setup("camera already started"))?;
        if self.width == 0 || self.height == 0 {
            return Err(OverlayError::capture_setup("camera reports no usable format"));
        }

        let (width, height, period, budget) = (self.width, self.height, self.interval, self.budget);
        info!(width, height, ?period, budget, "Synthetic camera started");

        self.task = Some(tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            for id in 1..=budget {
                ticker.tick().await;
                let frame = Frame::blank(id, started.elapsed(), width, height, PixelFormat::Bgra8);
                if !sink.on_frame(frame) {
                    break;
                }
                let _ = progress.send(id);
            }
            debug!("Synthetic camera finished");
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Synthetic camera stopped");
        }
    }
}

/// Detector that reports one face whose box drifts sideways.
pub struct SyntheticDetector {
    latency: Duration,
    dropout_every: u64,
}

impl SyntheticDetector {
    pub fn new(latency: Duration, dropout_every: u64) -> Self {
        Self {
            latency,
            dropout_every,
        }
    }

    /// The face reported for `frame_id`.
    pub fn face_at(frame_id: u64) -> FaceObservation {
        let t = frame_id as f64 / 90.0 * TAU;
        let bbox = NormalizedRect::new(0.25 + 0.1 * t.sin(), 0.3, 0.5, 0.45);

        let lips = (0..SYNTHETIC_LIP_POINTS)
            .map(|i| {
                // Start at the left mouth corner and go around clockwise
                let a = std::f64::consts::PI - i as f64 / SYNTHETIC_LIP_POINTS as f64 * TAU;
                let open = 0.08 + 0.02 * (t * 3.0).sin();
                FacePoint::new(0.5 + 0.22 * a.cos(), 0.25 + open * a.sin())
            })
            .collect();

        FaceObservation::with_landmarks(
            bbox,
            FaceLandmarks::new().with_region(LandmarkRegion::OuterLips, lips),
        )
    }
}

#[async_trait]
impl LandmarkDetector for SyntheticDetector {
    async fn detect_face_landmarks(
        &mut self,
        frame: &Frame,
        tracking: &mut TrackingState,
    ) -> DetectorResult<Vec<FaceObservation>> {
        if frame.format == PixelFormat::Nv12 {
            return Err(DetectorError::unsupported_frame("nv12"));
        }
        if !frame.is_well_formed() {
            return Err(DetectorError::invocation("frame buffer size mismatch"));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut faces = if self.dropout_every > 0 && frame.id % self.dropout_every == 0 {
            Vec::new()
        } else {
            vec![Self::face_at(frame.id)]
        };
        tracking.update(&mut faces);
        Ok(faces)
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Permission provider with a fixed status; prompts are always granted.
pub struct SyntheticPermissions {
    status: CameraAuthorization,
}

impl SyntheticPermissions {
    pub fn new(status: CameraAuthorization) -> Self {
        Self { status }
    }
}

#[async_trait]
impl CameraPermissions for SyntheticPermissions {
    fn status(&self) -> CameraAuthorization {
        self.status
    }

    async fn request_access(&self) -> bool {
        true
    }
}
