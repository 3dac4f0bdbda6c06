//! Configuration for the overlay pipeline.

use lipglow_models::Viewport;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::contour::MIN_LIP_CONTOUR_POINTS;
use crate::error::OverlayError;

/// What the frame source does when detection falls behind capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Keep only the newest undelivered frame; older ones are dropped
    #[default]
    Latest,
    /// Queue every frame and process them in capture order
    Queue,
}

impl FromStr for BackpressurePolicy {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" | "drop" => Ok(BackpressurePolicy::Latest),
            "queue" | "all" => Ok(BackpressurePolicy::Queue),
            _ => Err(OverlayError::config(format!("unknown backpressure policy: {}", s))),
        }
    }
}

/// Configuration for the overlay session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Display surface size the overlay is mapped into
    pub viewport: Viewport,

    /// Frame handling when detection cannot keep up (default: latest)
    pub backpressure: BackpressurePolicy,

    /// Capacity of the worker -> render channel (default: 8)
    pub render_channel_capacity: usize,

    /// Outer lip contours with this many points or fewer are skipped (default: 10)
    pub min_lip_points: usize,

    /// EMA weight given to the newest landmark estimate (default: 0.6)
    pub landmark_smoothing: f64,

    /// Frames without a face before tracking state is reset (default: 5)
    pub max_track_gap: u32,

    /// Deep link opened from the permission alert
    pub settings_url: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(390.0, 844.0),
            backpressure: BackpressurePolicy::Latest,
            render_channel_capacity: 8,
            min_lip_points: MIN_LIP_CONTOUR_POINTS,
            landmark_smoothing: 0.6,
            max_track_gap: 5,
            settings_url: "app-settings:".to_string(),
        }
    }
}

impl OverlayConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            viewport: Viewport::new(
                std::env::var("LIPGLOW_VIEWPORT_WIDTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.viewport.width),
                std::env::var("LIPGLOW_VIEWPORT_HEIGHT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.viewport.height),
            ),
            backpressure: std::env::var("LIPGLOW_BACKPRESSURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.backpressure),
            render_channel_capacity: std::env::var("LIPGLOW_RENDER_CHANNEL_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.render_channel_capacity),
            min_lip_points: std::env::var("LIPGLOW_MIN_LIP_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_lip_points),
            landmark_smoothing: std::env::var("LIPGLOW_LANDMARK_SMOOTHING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.landmark_smoothing),
            max_track_gap: std::env::var("LIPGLOW_MAX_TRACK_GAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_track_gap),
            settings_url: std::env::var("LIPGLOW_SETTINGS_URL")
                .unwrap_or(defaults.settings_url),
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.viewport.is_empty() {
            return Err(OverlayError::config("viewport must have a positive size"));
        }
        if self.render_channel_capacity == 0 {
            return Err(OverlayError::config("render channel capacity must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.landmark_smoothing) || self.landmark_smoothing == 0.0 {
            return Err(OverlayError::config("landmark smoothing must be in (0, 1]"));
        }
        Ok(())
    }
}
