//! Collaborator traits for the camera and the landmark model.
//!
//! The frame loop never talks to hardware or to an inference runtime
//! directly. Platform shells implement these traits; tests and the simulator
//! use the scripted implementations in [`crate::synthetic`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use mindread_models::LandmarkSet;

use crate::error::VisionResult;

/// One captured video frame.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Raster data at the device's natural resolution.
    pub image: Arc<RgbImage>,
    /// Capture time, relative to when the stream was opened.
    pub timestamp: Duration,
}

impl VideoFrame {
    pub fn new(image: Arc<RgbImage>, timestamp: Duration) -> Self {
        Self { image, timestamp }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A camera that can be opened for streaming.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Request access and start streaming.
    ///
    /// # Errors
    /// `PermissionDenied` or `DeviceUnavailable` when the camera cannot be
    /// used. Nothing is retried here; callers re-request permission and try
    /// again.
    async fn open(&self) -> VisionResult<Box<dyn CaptureStream>>;

    /// Device name for logging.
    fn name(&self) -> &str;
}

/// An open camera stream.
#[async_trait]
pub trait CaptureStream: Send {
    /// Latest frame, or `None` once the device has gone away
    /// (unplugged, permission revoked).
    async fn next_frame(&mut self) -> Option<VideoFrame>;

    /// Stop streaming and hand the device back to the platform.
    async fn release(&mut self);
}

/// Face landmark model.
///
/// Returns landmarks for at most one face; `Ok(None)` means no face was
/// found in the frame, which is normal and not an error.
#[async_trait]
pub trait LandmarkSource: Send + Sync {
    async fn detect(&self, frame: &VideoFrame) -> VisionResult<Option<LandmarkSet>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
