//! Head-orientation input for the quadrant game.
//!
//! This crate provides:
//! - Camera and landmark-model collaborator traits
//! - Exclusive camera leasing
//! - Stateless zone classification from facial landmarks
//! - Debounced dwell confirmation
//! - The per-frame capture loop with stale-result protection
//! - Overlay geometry for the preview
//! - Scripted camera and landmark sources for tests and simulation

pub mod capture;
pub mod classifier;
pub mod config;
pub mod dwell;
pub mod error;
pub mod frame_loop;
pub mod metrics;
pub mod overlay;
pub mod source;
pub mod synthetic;

pub use capture::{CaptureLease, SharedCamera};
pub use classifier::ZoneClassifier;
pub use config::{DetectionConfig, DEFAULT_DETECTION_THRESHOLD, DEFAULT_FRAME_INTERVAL};
pub use dwell::{DwellPhase, DwellState, DwellTimer, DwellUpdate};
pub use error::{VisionError, VisionResult};
pub use frame_loop::{
    FrameLoop, FrameLoopHandle, FrameObserver, LoopDirective, LoopStats, StopReason, ZoneCallback,
};
pub use overlay::{FaceOverlay, PixelPoint};
pub use source::{CaptureDevice, CaptureStream, LandmarkSource, VideoFrame};
