//! Scripted capture and landmark sources.
//!
//! Deterministic stand-ins for the camera and the landmark model, used by
//! tests and by the simulator binary. Frame timestamps advance by a fixed
//! step regardless of wall-clock time, so dwell timing is exact.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use mindread_models::{LandmarkSet, Point2, Zone};

use crate::error::{VisionError, VisionResult};
use crate::source::{CaptureDevice, CaptureStream, LandmarkSource, VideoFrame};

/// Rotation ratio used for synthetic turned faces.
pub const SYNTHETIC_TURN_RATIO: f64 = 0.8;

const SYNTHETIC_WIDTH: u32 = 64;
const SYNTHETIC_HEIGHT: u32 = 48;

/// Front-facing face whose nose is displaced by `ratio` half eye-distances.
pub fn face_with_ratio(ratio: f64) -> LandmarkSet {
    let (left_eye_x, right_eye_x) = (0.4, 0.6);
    let center_x = 0.5;
    let half_eye = (right_eye_x - left_eye_x) * 0.5;
    let nose_x = center_x + ratio * half_eye;

    let contour: Vec<Point2> = (0..16)
        .map(|i| {
            let angle = i as f64 / 16.0 * std::f64::consts::TAU;
            Point2::new(center_x + 0.18 * angle.cos(), 0.5 + 0.25 * angle.sin())
        })
        .collect();

    LandmarkSet::from_features(
        Point2::new(nose_x, 0.5),
        Point2::new(left_eye_x, 0.4),
        Point2::new(right_eye_x, 0.4),
        Point2::new(0.42 + ratio * 0.02, 0.65),
        Point2::new(0.58 + ratio * 0.02, 0.65),
        &contour,
    )
}

/// Landmarks a model would return for a player looking toward `zone`.
pub fn synthetic_face(zone: Zone) -> Option<LandmarkSet> {
    match zone {
        Zone::Left => Some(face_with_ratio(-SYNTHETIC_TURN_RATIO)),
        Zone::Right => Some(face_with_ratio(SYNTHETIC_TURN_RATIO)),
        Zone::Center => Some(face_with_ratio(0.0)),
        Zone::None => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBehavior {
    Stream,
    Denied,
    Missing,
}

/// Camera that emits blank frames at a fixed timestamp step.
#[derive(Debug)]
pub struct ScriptedCamera {
    frame_step: Duration,
    frame_limit: Option<u64>,
    behavior: OpenBehavior,
    opened: AtomicUsize,
    released: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    /// Camera that delivers `frame_count` frames and then disappears.
    pub fn new(frame_step: Duration, frame_count: u64) -> Self {
        Self::with(frame_step, Some(frame_count), OpenBehavior::Stream)
    }

    /// Camera that streams until released.
    pub fn endless(frame_step: Duration) -> Self {
        Self::with(frame_step, None, OpenBehavior::Stream)
    }

    /// Camera whose permission prompt is always refused.
    pub fn denied() -> Self {
        Self::with(Duration::from_millis(33), None, OpenBehavior::Denied)
    }

    /// Machine without a camera.
    pub fn missing() -> Self {
        Self::with(Duration::from_millis(33), None, OpenBehavior::Missing)
    }

    fn with(frame_step: Duration, frame_limit: Option<u64>, behavior: OpenBehavior) -> Self {
        Self {
            frame_step,
            frame_limit,
            behavior,
            opened: AtomicUsize::new(0),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of successful `open` calls.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of streams released.
    pub fn release_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for ScriptedCamera {
    async fn open(&self) -> VisionResult<Box<dyn CaptureStream>> {
        match self.behavior {
            OpenBehavior::Denied => Err(VisionError::permission_denied(
                "user dismissed the camera prompt",
            )),
            OpenBehavior::Missing => Err(VisionError::device_unavailable("no camera attached")),
            OpenBehavior::Stream => {
                self.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ScriptedStream {
                    image: Arc::new(RgbImage::new(SYNTHETIC_WIDTH, SYNTHETIC_HEIGHT)),
                    frame_step: self.frame_step,
                    frame_limit: self.frame_limit,
                    next_index: 0,
                    released: Arc::clone(&self.released),
                    live: true,
                }))
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedStream {
    image: Arc<RgbImage>,
    frame_step: Duration,
    frame_limit: Option<u64>,
    next_index: u64,
    released: Arc<AtomicUsize>,
    live: bool,
}

#[async_trait]
impl CaptureStream for ScriptedStream {
    async fn next_frame(&mut self) -> Option<VideoFrame> {
        if !self.live || self.frame_limit.is_some_and(|limit| self.next_index >= limit) {
            return None;
        }
        let index = u32::try_from(self.next_index).ok()?;
        let timestamp = self.frame_step.checked_mul(index)?;
        self.next_index += 1;
        Some(VideoFrame::new(Arc::clone(&self.image), timestamp))
    }

    async fn release(&mut self) {
        if self.live {
            self.live = false;
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// What the scripted landmark model reports for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFrame {
    /// A face looking toward the zone (`Zone::None` means no face).
    Look(Zone),
    /// The model errors on this frame.
    Fail,
}

type Script = Box<dyn Fn(Duration) -> ScriptedFrame + Send + Sync>;

/// Landmark source driven by a function of the frame timestamp.
pub struct ScriptedLandmarks {
    script: Script,
    latency: Duration,
    calls: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedLandmarks {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(Duration) -> ScriptedFrame + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            latency: Duration::ZERO,
            calls: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Same gaze on every frame.
    pub fn constant(zone: Zone) -> Self {
        Self::new(move |_| ScriptedFrame::Look(zone))
    }

    /// Piecewise script: each entry applies from its timestamp until the next.
    /// Frames before the first entry have no face.
    pub fn timeline(steps: Vec<(Duration, ScriptedFrame)>) -> Self {
        Self::new(move |at| {
            steps
                .iter()
                .rev()
                .find(|(from, _)| *from <= at)
                .map_or(ScriptedFrame::Look(Zone::None), |(_, frame)| *frame)
        })
    }

    /// Simulate a slow model by sleeping before each result.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Largest number of overlapping `detect` calls seen.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LandmarkSource for ScriptedLandmarks {
    async fn detect(&self, frame: &VideoFrame) -> VisionResult<Option<LandmarkSet>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match (self.script)(frame.timestamp) {
            ScriptedFrame::Look(zone) => Ok(synthetic_face(zone)),
            ScriptedFrame::Fail => Err(VisionError::landmark_failed(format!(
                "scripted failure at {:?}",
                frame.timestamp
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
