//! Frame loop metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host application installs a recorder.

use metrics::{counter, histogram};
use mindread_models::{Side, Zone};

/// Metric names as constants for consistency.
pub mod names {
    pub const FRAMES_PROCESSED_TOTAL: &str = "mindread_frames_processed_total";
    pub const LANDMARK_FAILURES_TOTAL: &str = "mindread_landmark_failures_total";
    pub const LANDMARK_LATENCY_SECONDS: &str = "mindread_landmark_latency_seconds";
    pub const STALE_RESULTS_TOTAL: &str = "mindread_stale_results_total";
    pub const CONFIRMATIONS_TOTAL: &str = "mindread_side_confirmations_total";
}

/// Record one processed frame and the zone it produced.
pub fn record_frame(zone: Zone) {
    let labels = [("zone", zone.as_str())];
    counter!(names::FRAMES_PROCESSED_TOTAL, &labels).increment(1);
}

/// Record how long the landmark model took for one frame.
pub fn record_landmark_latency(source: &'static str, secs: f64) {
    let labels = [("source", source)];
    histogram!(names::LANDMARK_LATENCY_SECONDS, &labels).record(secs);
}

pub fn record_landmark_failure(source: &'static str) {
    let labels = [("source", source)];
    counter!(names::LANDMARK_FAILURES_TOTAL, &labels).increment(1);
}

pub fn record_stale_result() {
    counter!(names::STALE_RESULTS_TOTAL).increment(1);
}

pub fn record_confirmation(side: Side) {
    let labels = [("side", side.as_str())];
    counter!(names::CONFIRMATIONS_TOTAL, &labels).increment(1);
}
