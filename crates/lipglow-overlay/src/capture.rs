//! Camera capture and authorization seams.
//!
//! The platform camera is abstracted as a [`CaptureSession`] that pushes
//! frames into a [`FrameSink`], plus a [`CameraPermissions`] provider that
//! reports and requests camera authorization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{OverlayError, OverlayResult};
use crate::frame_source::FrameSink;

/// Camera authorization as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAuthorization {
    Authorized,
    /// The user has not been asked yet
    NotDetermined,
    Denied,
    /// Blocked by policy; the user cannot grant access
    Restricted,
}

/// Platform camera permission provider.
#[async_trait]
pub trait CameraPermissions: Send + Sync {
    /// Current authorization without prompting.
    fn status(&self) -> CameraAuthorization;

    /// Prompt the user. Returns whether access was granted.
    async fn request_access(&self) -> bool;
}

/// Check camera authorization, prompting once if the user was never asked.
///
/// # Errors
/// [`OverlayError::PermissionDenied`] carrying the alert text and the
/// settings deep link when access is denied or restricted.
pub async fn ensure_camera_access<P>(permissions: &P, settings_url: &str) -> OverlayResult<()>
where
    P: CameraPermissions + ?Sized,
{
    match permissions.status() {
        CameraAuthorization::Authorized => Ok(()),
        CameraAuthorization::NotDetermined => {
            info!("Requesting camera access");
            if permissions.request_access().await {
                info!("Camera access granted");
                Ok(())
            } else {
                warn!("Camera access refused at prompt");
                Err(OverlayError::permission_denied(settings_url))
            }
        }
        status @ (CameraAuthorization::Denied | CameraAuthorization::Restricted) => {
            warn!(?status, "Camera access unavailable");
            Err(OverlayError::permission_denied(settings_url))
        }
    }
}

/// A front-camera capture session.
///
/// `start` configures the device and begins delivering frames to `sink`
/// from the capture callback. It is not retried on failure.
pub trait CaptureSession: Send {
    /// Configure the front camera and start pushing frames.
    ///
    /// # Errors
    /// [`OverlayError::CaptureSetup`] when no suitable device exists or it
    /// cannot be added to the session.
    fn start(&mut self, sink: FrameSink) -> OverlayResult<()>;

    /// Stop delivering frames.
    fn stop(&mut self);
}
