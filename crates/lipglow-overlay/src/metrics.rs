//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; they are no-ops until the host
//! application installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const FRAMES_RECEIVED_TOTAL: &str = "lipglow_frames_received_total";
    pub const FRAMES_DROPPED_TOTAL: &str = "lipglow_frames_dropped_total";
    pub const DETECTION_DURATION_SECONDS: &str = "lipglow_detection_duration_seconds";
    pub const OVERLAYS_PUBLISHED_TOTAL: &str = "lipglow_overlays_published_total";
    pub const OVERLAYS_CLEARED_TOTAL: &str = "lipglow_overlays_cleared_total";
}

/// Record a frame arriving at the frame source.
pub fn record_frame_received() {
    counter!(names::FRAMES_RECEIVED_TOTAL).increment(1);
}

/// Record a frame that never reached the detector, or whose detection failed
/// before completion.
pub fn record_frame_dropped(reason: &'static str) {
    counter!(names::FRAMES_DROPPED_TOTAL, "reason" => reason).increment(1);
}

/// Record how long one detector call took.
pub fn record_detection(duration_secs: f64) {
    histogram!(names::DETECTION_DURATION_SECONDS).record(duration_secs);
}

/// Record an overlay being drawn.
pub fn record_overlay_published() {
    counter!(names::OVERLAYS_PUBLISHED_TOTAL).increment(1);
}

/// Record an overlay being cleared, labelled by cause.
pub fn record_overlay_cleared(reason: &'static str) {
    counter!(names::OVERLAYS_CLEARED_TOTAL, "reason" => reason).increment(1);
}
