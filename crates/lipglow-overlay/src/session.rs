//! Top-level overlay session.
//!
//! Wires the pieces together: permission check, render loop, detection
//! worker and capture session. The UI talks to a running session only
//! through its [`FeatureSelector`] and the shared display surface.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::capture::{ensure_camera_access, CameraPermissions, CaptureSession};
use crate::config::OverlayConfig;
use crate::detector::LandmarkDetector;
use crate::error::OverlayResult;
use crate::frame_source::{FrameQueue, FrameSink};
use crate::pipeline::DetectionPipeline;
use crate::render::{run_render_loop, DisplaySurface, OverlayRenderer, SharedSurface};
use crate::selector::FeatureSelector;

/// Totals reported when a session shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    /// Frames handed to the detector
    pub frames_processed: u64,
    /// Frames superseded before reaching the detector
    pub frames_dropped: u64,
    /// Whether an overlay was still attached at shutdown
    pub overlay_visible: bool,
}

/// A running overlay session.
pub struct OverlaySession<S: DisplaySurface> {
    selector: FeatureSelector,
    queue: Arc<FrameQueue>,
    surface: SharedSurface<S>,
    capture: Box<dyn CaptureSession>,
    capturing: bool,
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<u64>,
    render: JoinHandle<OverlayRenderer<S>>,
}

impl<S: DisplaySurface> OverlaySession<S> {
    /// Check camera access, then start rendering, detection and capture.
    ///
    /// A capture setup failure is logged and the session keeps running with
    /// an empty view.
    ///
    /// # Errors
    /// - `PermissionDenied` when camera access is refused; nothing is started
    /// - `Config` when `config` is invalid
    pub async fn start<D, C, P>(
        config: OverlayConfig,
        selector: FeatureSelector,
        surface: SharedSurface<S>,
        detector: D,
        capture: C,
        permissions: &P,
    ) -> OverlayResult<Self>
    where
        D: LandmarkDetector + 'static,
        C: CaptureSession + 'static,
        P: CameraPermissions + ?Sized,
    {
        config.validate()?;
        ensure_camera_access(permissions, &config.settings_url).await?;

        let (render_tx, render_rx) = mpsc::channel(config.render_channel_capacity);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let queue = Arc::new(FrameQueue::new(config.backpressure));

        let renderer = OverlayRenderer::new(Arc::clone(&surface));
        let render = tokio::spawn(run_render_loop(renderer, render_rx));

        let pipeline = DetectionPipeline::new(detector, selector.clone(), &config, render_tx);
        let worker_queue = Arc::clone(&queue);
        let worker = tokio::spawn(async move {
            let pipeline = pipeline.run(worker_queue, shutdown_rx).await;
            pipeline.frames_processed()
        });

        let mut capture: Box<dyn CaptureSession> = Box::new(capture);
        let capturing = match capture.start(FrameSink::new(Arc::clone(&queue))) {
            Ok(()) => {
                info!(backpressure = ?config.backpressure, "Overlay session started");
                true
            }
            Err(e) => {
                warn!(error = %e, "Capture setup failed, continuing without camera");
                false
            }
        };

        Ok(Self {
            selector,
            queue,
            surface,
            capture,
            capturing,
            shutdown,
            worker,
            render,
        })
    }

    /// Handle for changing the selected feature.
    pub fn selector(&self) -> FeatureSelector {
        self.selector.clone()
    }

    /// Ingress for frames, for capture sources started outside the session.
    pub fn sink(&self) -> FrameSink {
        FrameSink::new(Arc::clone(&self.queue))
    }

    /// Shared display surface the overlay is drawn on.
    pub fn surface(&self) -> SharedSurface<S> {
        Arc::clone(&self.surface)
    }

    /// Whether the capture session started successfully.
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Stop capture, drain the worker and the render loop.
    pub async fn shutdown(mut self) -> SessionSummary {
        if self.capturing {
            self.capture.stop();
        }
        self.queue.close();
        let _ = self.shutdown.send(true);

        let frames_processed = match self.worker.await {
            Ok(frames) => frames,
            Err(e) => {
                warn!(error = %e, "Detection worker ended abnormally");
                0
            }
        };
        let overlay_visible = match self.render.await {
            Ok(renderer) => renderer.has_overlay(),
            Err(e) => {
                warn!(error = %e, "Render loop ended abnormally");
                false
            }
        };

        let summary = SessionSummary {
            frames_processed,
            frames_dropped: self.queue.dropped(),
            overlay_visible,
        };
        info!(?summary, "Overlay session stopped");
        summary
    }
}
