//! Exclusive access to the camera.
//!
//! The camera is a singleton: at most one frame loop may stream from it at a
//! time. `SharedCamera` hands out a single `CaptureLease`; a second `acquire`
//! while the lease is alive fails with `CaptureBusy`. Dropping or releasing
//! the lease frees the camera for the next loop.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

use crate::error::{VisionError, VisionResult};
use crate::source::{CaptureDevice, CaptureStream, VideoFrame};

/// Cloneable handle to a camera that enforces single ownership.
#[derive(Clone)]
pub struct SharedCamera {
    device: Arc<dyn CaptureDevice>,
    permit: Arc<Semaphore>,
}

impl SharedCamera {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn name(&self) -> &str {
        self.device.name()
    }

    /// Whether a lease is currently held.
    pub fn is_busy(&self) -> bool {
        self.permit.available_permits() == 0
    }

    /// Take the camera and open a stream.
    ///
    /// # Errors
    /// `CaptureBusy` if another lease is alive, otherwise whatever the device
    /// reports from `open`. On failure the camera stays free.
    pub async fn acquire(&self) -> VisionResult<CaptureLease> {
        let permit = Arc::clone(&self.permit)
            .try_acquire_owned()
            .map_err(|_| VisionError::CaptureBusy)?;

        let stream = self.device.open().await?;
        info!(device = self.device.name(), "Camera acquired");

        Ok(CaptureLease {
            stream,
            device_name: self.device.name().to_string(),
            _permit: permit,
        })
    }
}

impl std::fmt::Debug for SharedCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCamera")
            .field("device", &self.device.name())
            .field("busy", &self.is_busy())
            .finish()
    }
}

/// An open stream plus the right to use the camera.
pub struct CaptureLease {
    stream: Box<dyn CaptureStream>,
    device_name: String,
    _permit: OwnedSemaphorePermit,
}

impl CaptureLease {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub async fn next_frame(&mut self) -> Option<VideoFrame> {
        self.stream.next_frame().await
    }

    /// Stop the stream and give the camera back.
    pub async fn release(mut self) {
        self.stream.release().await;
        debug!(device = %self.device_name, "Camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::ScriptedCamera;
    use std::time::Duration;

    #[tokio::test]
    async fn test_second_acquire_is_busy() {
        let camera = SharedCamera::new(Arc::new(ScriptedCamera::new(
            Duration::from_millis(100),
            10,
        )));

        let lease = camera.acquire().await.unwrap();
        assert!(camera.is_busy());
        assert!(matches!(
            camera.clone().acquire().await,
            Err(VisionError::CaptureBusy)
        ));

        lease.release().await;
        assert!(!camera.is_busy());
        assert!(camera.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_open_leaves_camera_free() {
        let camera = SharedCamera::new(Arc::new(ScriptedCamera::denied()));
        let err = camera.acquire().await.err().unwrap();
        assert!(matches!(err, VisionError::PermissionDenied(_)));
        assert!(!camera.is_busy());
    }
}
