//! Error types for capture and detection.

use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while starting or running the frame loop.
///
/// Only capability and configuration errors escape `FrameLoop::start`.
/// Per-frame landmark failures are reported to the observer and the loop
/// keeps running.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture device is already held by another frame loop")]
    CaptureBusy,

    #[error("Invalid detection configuration: {0}")]
    InvalidConfig(String),

    #[error("Landmark detection failed: {0}")]
    LandmarkFailed(String),
}

impl VisionError {
    /// Create a permission denial error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Create a missing-device error.
    pub fn device_unavailable(message: impl Into<String>) -> Self {
        Self::DeviceUnavailable(message.into())
    }

    /// Create a configuration validation error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a landmark failure error.
    pub fn landmark_failed(message: impl Into<String>) -> Self {
        Self::LandmarkFailed(message.into())
    }

    /// Whether the caller can fix this by re-requesting camera access and
    /// starting again.
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            VisionError::PermissionDenied(_)
                | VisionError::DeviceUnavailable(_)
                | VisionError::CaptureBusy
        )
    }
}
