//! App configuration.

use std::path::PathBuf;
use std::time::Duration;

use lipglow_overlay::{CameraAuthorization, OverlayConfig};

use crate::error::{AppError, AppResult};
use crate::script::SelectionScript;

/// App configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pipeline settings
    pub overlay: OverlayConfig,
    /// Synthetic camera frame size
    pub frame_width: u32,
    pub frame_height: u32,
    /// Synthetic camera frame rate
    pub fps: u32,
    /// Frames to capture before exiting
    pub frame_budget: u64,
    /// Simulated detector latency
    pub detect_latency: Duration,
    /// Report no face on every Nth frame (0 = never)
    pub dropout_every: u64,
    /// Scheduled menu taps
    pub selection_script: SelectionScript,
    /// Camera authorization the synthetic platform reports
    pub camera_permission: CameraAuthorization,
    /// Where to write the final composited frame
    pub snapshot_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            frame_width: 640,
            frame_height: 480,
            fps: 30,
            frame_budget: 150,
            detect_latency: Duration::from_millis(12),
            dropout_every: 0,
            selection_script: SelectionScript::default(),
            camera_permission: CameraAuthorization::Authorized,
            snapshot_path: None,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let selection_script = match std::env::var("LIPGLOW_SELECTION_SCRIPT") {
            Ok(s) => s.parse()?,
            Err(_) => "Lips@0".parse()?,
        };
        let camera_permission = match std::env::var("LIPGLOW_CAMERA_PERMISSION") {
            Ok(s) => parse_authorization(&s)?,
            Err(_) => CameraAuthorization::Authorized,
        };

        let config = Self {
            overlay: OverlayConfig::from_env(),
            frame_width: std::env::var("LIPGLOW_FRAME_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(640),
            frame_height: std::env::var("LIPGLOW_FRAME_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(480),
            fps: std::env::var("LIPGLOW_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            frame_budget: std::env::var("LIPGLOW_FRAME_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(150),
            detect_latency: Duration::from_millis(
                std::env::var("LIPGLOW_DETECT_LATENCY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(12),
            ),
            dropout_every: std::env::var("LIPGLOW_DROPOUT_EVERY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            selection_script,
            camera_permission,
            snapshot_path: std::env::var("LIPGLOW_SNAPSHOT_PATH").ok().map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.fps == 0 {
            return Err(AppError::config("fps must be at least 1"));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AppError::config("frame size must be non-zero"));
        }
        self.overlay.validate()?;
        Ok(())
    }

    /// Time between synthetic frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

fn parse_authorization(s: &str) -> AppResult<CameraAuthorization> {
    match s.to_lowercase().as_str() {
        "authorized" => Ok(CameraAuthorization::Authorized),
        "not_determined" | "notdetermined" => Ok(CameraAuthorization::NotDetermined),
        "denied" => Ok(CameraAuthorization::Denied),
        "restricted" => Ok(CameraAuthorization::Restricted),
        _ => Err(AppError::config(format!("unknown camera permission: {}", s))),
    }
}
