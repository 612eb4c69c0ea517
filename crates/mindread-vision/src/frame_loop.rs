//! Per-frame capture loop.
//!
//! Drives the camera, the landmark model, the zone classifier and the dwell
//! timer, one frame at a time, on a single task.
//!
//! # Cycle
//! ```text
//!   wait for next tick ──► next frame ──► LandmarkSource::detect (awaited)
//!          ▲                                       │
//!          │                                       ▼
//!          │                             stale? ── yes ──► discard, stop
//!          │                                       │ no
//!          │                                       ▼
//!          │                        ZoneClassifier ─► DwellTimer
//!          │                                       │
//!          │                                       ▼
//!          └──────────── observer.on_zone / on_side_confirmed
//! ```
//!
//! Only the frame fetch and the landmark call suspend. Each frame is fully
//! classified and applied before the next one is requested, so there is
//! never more than one landmark request in flight.
//!
//! # Cancellation
//! `FrameLoopHandle::stop` marks the loop's generation stale, signals the
//! task and waits for it. A landmark result that resolves after the stop is
//! discarded without touching the dwell timer or the observer, and the
//! camera lease is released before `stop` returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mindread_models::{Side, Zone};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, trace, warn, Instrument, Span};

use crate::capture::{CaptureLease, SharedCamera};
use crate::classifier::ZoneClassifier;
use crate::config::DetectionConfig;
use crate::dwell::DwellTimer;
use crate::error::{VisionError, VisionResult};
use crate::metrics;
use crate::source::LandmarkSource;

/// What the loop should do after a side was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDirective {
    /// Keep running; the dwell timer stays confirmed until reset.
    Continue,
    /// Start a fresh dwell window before the next frame.
    ResetDetection,
    /// Stop the loop and release the camera.
    Stop,
}

/// Why a loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was called or the handle was dropped.
    Requested,
    /// The camera stopped delivering frames.
    CaptureEnded,
    /// The observer returned `LoopDirective::Stop`.
    ObserverStopped,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Requested => write!(f, "requested"),
            StopReason::CaptureEnded => write!(f, "capture_ended"),
            StopReason::ObserverStopped => write!(f, "observer_stopped"),
        }
    }
}

/// Receives per-frame results from a running loop.
///
/// All callbacks run synchronously on the loop task between frames.
pub trait FrameObserver: Send + Sync {
    /// Called once per processed frame with the frame's zone and the
    /// continuous hold time of the tracked side.
    fn on_zone(&self, zone: Zone, elapsed_seconds: f64);

    /// Called once when the dwell timer confirms a side.
    fn on_side_confirmed(&self, _side: Side) -> LoopDirective {
        LoopDirective::Continue
    }

    /// Called when the landmark model fails on a frame. The frame is
    /// treated as having no face and the loop continues.
    fn on_landmark_error(&self, _error: &VisionError) {}

    /// Called when the loop ends on its own (capture ended or observer stop).
    /// Not called after an explicit `stop()`.
    fn on_stopped(&self, _reason: StopReason, _stats: &LoopStats) {}
}

/// Adapts a plain `on_zone` closure into a `FrameObserver`.
pub struct ZoneCallback<F>(pub F);

impl<F> FrameObserver for ZoneCallback<F>
where
    F: Fn(Zone, f64) + Send + Sync,
{
    fn on_zone(&self, zone: Zone, elapsed_seconds: f64) {
        (self.0)(zone, elapsed_seconds)
    }
}

/// Statistics for one loop run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Frames classified and applied
    pub frames_processed: u64,
    /// Frames classified as `Zone::None`
    pub no_face_frames: u64,
    /// Frames where the landmark model returned an error
    pub landmark_failures: u64,
    /// Sides confirmed
    pub confirmations: u64,
    /// Landmark results discarded because the loop had been stopped
    pub stale_results: u64,
}

impl LoopStats {
    /// Fraction of processed frames with a usable face.
    pub fn face_ratio(&self) -> f64 {
        if self.frames_processed > 0 {
            (self.frames_processed - self.no_face_frames) as f64 / self.frames_processed as f64
        } else {
            0.0
        }
    }

    /// Log summary statistics.
    pub fn log_summary(&self, reason: StopReason) {
        info!(
            reason = %reason,
            frames = self.frames_processed,
            no_face_frames = self.no_face_frames,
            landmark_failures = self.landmark_failures,
            confirmations = self.confirmations,
            stale_results = self.stale_results,
            face_ratio = format!("{:.1}%", self.face_ratio() * 100.0),
            "Frame loop summary"
        );
    }
}

/// Configured frame loop, ready to start on a camera.
#[derive(Clone)]
pub struct FrameLoop {
    config: DetectionConfig,
    source: Arc<dyn LandmarkSource>,
}

impl FrameLoop {
    pub fn new(config: DetectionConfig, source: Arc<dyn LandmarkSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Validate the configuration, take the camera and start cycling.
    ///
    /// # Errors
    /// - `InvalidConfig` if the configuration does not validate
    /// - `PermissionDenied` / `DeviceUnavailable` if the camera cannot be opened
    /// - `CaptureBusy` if another loop holds the camera
    ///
    /// On error no frame is processed and the observer is never called.
    /// The loop task runs inside the caller's current span.
    pub async fn start(
        &self,
        camera: &SharedCamera,
        observer: Arc<dyn FrameObserver>,
    ) -> VisionResult<FrameLoopHandle> {
        self.config.validate()?;

        let lease = camera.acquire().await.inspect_err(|e| {
            warn!(device = camera.name(), error = %e, "Failed to start frame loop");
        })?;

        let generation = Arc::new(AtomicU64::new(1));
        let reset_epoch = Arc::new(AtomicU64::new(0));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        info!(
            device = lease.device_name(),
            source = self.source.name(),
            threshold = self.config.detection_threshold,
            detection_secs = self.config.detection_time_secs(),
            frame_interval_ms = self.config.frame_interval.as_millis() as u64,
            "Frame loop started"
        );

        let worker = LoopWorker {
            config: self.config.clone(),
            classifier: ZoneClassifier::from_config(&self.config),
            dwell: DwellTimer::new(self.config.detection_time),
            source: Arc::clone(&self.source),
            observer,
            lease,
            cancel_rx,
            generation: Arc::clone(&generation),
            my_generation: 1,
            reset_epoch: Arc::clone(&reset_epoch),
            seen_epoch: 0,
            stats: LoopStats::default(),
        };

        Ok(FrameLoopHandle {
            cancel_tx,
            generation,
            my_generation: 1,
            reset_epoch,
            task: tokio::spawn(worker.run().instrument(Span::current())),
        })
    }

    /// Stop a running loop. Equivalent to `handle.stop()`.
    pub async fn stop(handle: FrameLoopHandle) -> LoopStats {
        handle.stop().await
    }
}

/// Control handle for a running loop.
///
/// Dropping the handle without calling `stop` also stops the loop.
pub struct FrameLoopHandle {
    cancel_tx: watch::Sender<bool>,
    generation: Arc<AtomicU64>,
    my_generation: u64,
    reset_epoch: Arc<AtomicU64>,
    task: JoinHandle<LoopStats>,
}

impl FrameLoopHandle {
    /// Return the dwell timer to `Idle` before the next frame.
    pub fn reset_detection(&self) {
        self.reset_epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop, discard any in-flight landmark result and release the
    /// camera. Returns the run's statistics.
    pub async fn stop(self) -> LoopStats {
        // Anything that resolves from here on belongs to a dead generation.
        let _ = self.generation.compare_exchange(
            self.my_generation,
            self.my_generation + 1,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        let _ = self.cancel_tx.send(true);
        Self::join_task(self.task).await
    }

    /// Wait for the loop to end on its own.
    pub async fn join(self) -> LoopStats {
        // Keep the sender alive so waiting does not read as a drop.
        let FrameLoopHandle { cancel_tx, task, .. } = self;
        let stats = Self::join_task(task).await;
        drop(cancel_tx);
        stats
    }

    async fn join_task(task: JoinHandle<LoopStats>) -> LoopStats {
        match task.await {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "Frame loop task failed");
                LoopStats::default()
            }
        }
    }
}

struct LoopWorker {
    config: DetectionConfig,
    classifier: ZoneClassifier,
    dwell: DwellTimer,
    source: Arc<dyn LandmarkSource>,
    observer: Arc<dyn FrameObserver>,
    lease: CaptureLease,
    cancel_rx: watch::Receiver<bool>,
    generation: Arc<AtomicU64>,
    my_generation: u64,
    reset_epoch: Arc<AtomicU64>,
    seen_epoch: u64,
    stats: LoopStats,
}

impl LoopWorker {
    async fn run(mut self) -> LoopStats {
        let reason = self.cycle().await;

        let LoopWorker {
            lease,
            observer,
            stats,
            ..
        } = self;
        lease.release().await;
        stats.log_summary(reason);

        if reason != StopReason::Requested {
            observer.on_stopped(reason, &stats);
        }
        stats
    }

    async fn cycle(&mut self) -> StopReason {
        let mut ticker = tokio::time::interval(self.config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel_rx.changed() => return StopReason::Requested,
                _ = ticker.tick() => {}
            }
            if *self.cancel_rx.borrow() {
                return StopReason::Requested;
            }

            self.apply_pending_reset();

            let frame = tokio::select! {
                biased;
                _ = self.cancel_rx.changed() => return StopReason::Requested,
                frame = self.lease.next_frame() => frame,
            };
            let Some(frame) = frame else {
                info!(device = self.lease.device_name(), "Capture source ended");
                return StopReason::CaptureEnded;
            };

            let started = Instant::now();
            let detection = tokio::select! {
                biased;
                _ = self.cancel_rx.changed() => {
                    self.discard_stale(frame.timestamp);
                    return StopReason::Requested;
                }
                result = self.source.detect(&frame) => result,
            };
            metrics::record_landmark_latency(self.source.name(), started.elapsed().as_secs_f64());

            if !self.is_current() {
                self.discard_stale(frame.timestamp);
                return StopReason::Requested;
            }

            let landmarks = match detection {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    warn!(
                        source = self.source.name(),
                        timestamp_ms = frame.timestamp.as_millis() as u64,
                        error = %e,
                        "Landmark detection failed, treating frame as no face"
                    );
                    self.stats.landmark_failures += 1;
                    metrics::record_landmark_failure(self.source.name());
                    self.observer.on_landmark_error(&e);
                    None
                }
            };

            let zone = self.classifier.classify(landmarks.as_ref());
            let update = self.dwell.tick(zone, frame.timestamp);

            self.stats.frames_processed += 1;
            if zone == Zone::None {
                self.stats.no_face_frames += 1;
            }
            metrics::record_frame(zone);
            trace!(
                zone = %zone,
                elapsed_secs = update.elapsed_seconds,
                timestamp_ms = frame.timestamp.as_millis() as u64,
                "Frame processed"
            );

            self.observer.on_zone(update.zone, update.elapsed_seconds);

            if let Some(side) = update.confirmed {
                self.stats.confirmations += 1;
                metrics::record_confirmation(side);
                match self.observer.on_side_confirmed(side) {
                    LoopDirective::Continue => {}
                    LoopDirective::ResetDetection => self.dwell.reset_detection(),
                    LoopDirective::Stop => return StopReason::ObserverStopped,
                }
            }
        }
    }

    /// Drop the landmark result for the frame at `timestamp`, resolved or not.
    fn discard_stale(&mut self, timestamp: Duration) {
        debug!(
            timestamp_ms = timestamp.as_millis() as u64,
            "Discarding landmark result from stopped loop"
        );
        self.stats.stale_results += 1;
        metrics::record_stale_result();
    }

    fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.my_generation
    }

    fn apply_pending_reset(&mut self) {
        let epoch = self.reset_epoch.load(Ordering::SeqCst);
        if epoch != self.seen_epoch {
            self.seen_epoch = epoch;
            self.dwell.reset_detection();
        }
    }
}
