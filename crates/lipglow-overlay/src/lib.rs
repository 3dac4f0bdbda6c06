//! Live face-feature overlay pipeline.
//!
//! This crate provides:
//! - Mapping of face-local landmarks into display coordinates
//! - Lip contour construction and rasterisation
//! - A single-slot overlay renderer driven from a render task
//! - A per-frame detection worker with configurable backpressure
//! - Capture session and camera permission seams

pub mod capture;
pub mod config;
pub mod contour;
pub mod detector;
pub mod error;
pub mod frame;
pub mod frame_source;
pub mod mapping;
pub mod metrics;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod session;
pub mod tracking;

pub use capture::{ensure_camera_access, CameraAuthorization, CameraPermissions, CaptureSession};
pub use config::{BackpressurePolicy, OverlayConfig};
pub use contour::{build_lip_contours, MIN_LIP_CONTOUR_POINTS};
pub use detector::LandmarkDetector;
pub use error::{DetectorError, DetectorResult, OverlayError, OverlayResult};
pub use frame::{Frame, PixelFormat};
pub use frame_source::{FrameQueue, FrameSink};
pub use mapping::{map_from_screen, map_to_screen, ScreenMapping};
pub use path::{OverlayPath, PathCommand, Subpath};
pub use pipeline::{ClearReason, DetectionPipeline, FrameOutcome};
pub use render::{
    lock_surface, run_render_loop, DisplaySurface, LayerHandle, LayerTree, OverlayRenderer,
    OverlayShape, RenderCommand, SharedSurface, OVERLAY_FILL,
};
pub use selector::FeatureSelector;
pub use session::{OverlaySession, SessionSummary};
pub use tracking::TrackingState;
