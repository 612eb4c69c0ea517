//! Game configuration.

use std::time::Duration;

use mindread_models::{GameMode, Theme};
use mindread_vision::DetectionConfig;

use crate::error::{GameError, GameResult};

/// Game configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Pacing preset; picks the default dwell time
    pub mode: GameMode,
    /// Word list the game starts from
    pub theme: Theme,
    /// Classification, dwell and frame pacing
    pub detection: DetectionConfig,
    /// Fixed shuffle seed for reproducible layouts
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_mode(GameMode::default())
    }
}

impl GameConfig {
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            theme: Theme::default(),
            detection: DetectionConfig::for_mode(mode),
            seed: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create config from environment variables.
    ///
    /// Unset or unparsable values fall back to defaults. Values that parse
    /// but are out of range are kept as-is for `validate` to reject.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode: GameMode = var("MINDREAD_MODE")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let mut detection = DetectionConfig::for_mode(mode);

        if let Some(threshold) = var("MINDREAD_DETECTION_THRESHOLD").and_then(|s| s.parse().ok()) {
            detection = detection.with_detection_threshold(threshold);
        }
        if let Some(secs) = var("MINDREAD_DETECTION_TIME_SECS").and_then(|s| s.parse::<f64>().ok()) {
            detection = detection.with_detection_time_secs(secs);
        }
        if let Some(ms) = var("MINDREAD_FRAME_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            detection = detection.with_frame_interval(Duration::from_millis(ms));
        }
        if let Some(mirror) = var("MINDREAD_MIRROR").and_then(|s| parse_flag(&s)) {
            detection = detection.with_mirror(mirror);
        }

        Self {
            mode,
            theme: var("MINDREAD_THEME")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            detection,
            seed: var("MINDREAD_SEED").and_then(|s| s.parse().ok()),
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        self.detection
            .validate()
            .map_err(|e| GameError::config_error(e.to_string()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
