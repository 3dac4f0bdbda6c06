//! Error types for the overlay pipeline.

use thiserror::Error;

/// Result type for overlay operations.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Result type for a single detector invocation.
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Alert title shown when camera access is refused.
pub const PERMISSION_ALERT_TITLE: &str = "Camera Access Denied";

/// Alert body shown when camera access is refused.
pub const PERMISSION_ALERT_MESSAGE: &str =
    "Please enable camera access in Settings to use this feature.";

/// Errors surfaced by the session, capture and render plumbing.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Capture setup failed: {0}")]
    CaptureSetup(String),

    #[error("{title}: {message}")]
    PermissionDenied {
        title: &'static str,
        message: &'static str,
        /// Deep link into the system settings page for this app
        settings_url: String,
    },

    #[error("Render channel closed")]
    RenderChannelClosed,

    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl OverlayError {
    /// Create a capture setup error.
    pub fn capture_setup(message: impl Into<String>) -> Self {
        Self::CaptureSetup(message.into())
    }

    /// Create a permission denied error carrying the user-facing alert text.
    pub fn permission_denied(settings_url: impl Into<String>) -> Self {
        Self::PermissionDenied {
            title: PERMISSION_ALERT_TITLE,
            message: PERMISSION_ALERT_MESSAGE,
            settings_url: settings_url.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Only permission failures are shown to the user; everything else is
    /// absorbed and logged.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, OverlayError::PermissionDenied { .. })
    }
}

/// Errors from one detector call.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The frame's pixel format is not accepted by the detector
    #[error("Unsupported frame: {0}")]
    UnsupportedFrame(String),

    /// The detector could not be invoked at all
    #[error("Detector invocation failed: {0}")]
    Invocation(String),

    /// The request ran but completed with an error
    #[error("Detection request failed: {0}")]
    RequestFailed(String),
}

impl DetectorError {
    pub fn unsupported_frame(message: impl Into<String>) -> Self {
        Self::UnsupportedFrame(message.into())
    }

    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }

    /// Whether this failure reached the completion stage.
    ///
    /// A completed-but-failed request clears the overlay. An invocation that
    /// never ran drops the frame and leaves the overlay untouched.
    pub fn clears_overlay(&self) -> bool {
        matches!(self, DetectorError::RequestFailed(_))
    }
}
