//! Game metrics.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use mindread_models::Side;

/// Install the Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const GAMES_STARTED_TOTAL: &str = "mindread_games_started_total";
    pub const GAMES_COMPLETED_TOTAL: &str = "mindread_games_completed_total";
    pub const ROUNDS_TOTAL: &str = "mindread_rounds_total";
    pub const ROUNDS_PER_GAME: &str = "mindread_rounds_per_game";
}

pub fn record_game_started(theme: &'static str) {
    let labels = [("theme", theme)];
    counter!(names::GAMES_STARTED_TOTAL, &labels).increment(1);
}

/// Record one elimination round and the side that was kept.
pub fn record_round(side: Side) {
    let labels = [("side", side.as_str())];
    counter!(names::ROUNDS_TOTAL, &labels).increment(1);
}

pub fn record_game_completed(rounds_played: u32) {
    counter!(names::GAMES_COMPLETED_TOTAL).increment(1);
    histogram!(names::ROUNDS_PER_GAME).record(rounds_played as f64);
}
