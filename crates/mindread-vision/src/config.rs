//! Detection configuration.
//!
//! The rotation threshold and dwell windows are empirically tuned defaults.
//! They are not expected to carry over to other camera resolutions or
//! viewing distances without re-calibration.

use std::time::Duration;

use mindread_models::GameMode;

use crate::error::{VisionError, VisionResult};

/// Default rotation ratio beyond which the head counts as turned.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.3;

/// Default frame cadence (~30 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Configuration for zone classification, dwell confirmation and frame pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Rotation ratio threshold `T` (default: 0.3)
    pub detection_threshold: f64,

    /// How long a side must be held continuously before it is confirmed
    pub detection_time: Duration,

    /// Delay between frame loop cycles
    pub frame_interval: Duration,

    /// Capture source delivers a selfie-mirrored image; flips left and right
    pub mirror: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl DetectionConfig {
    /// Standard play: 5 second dwell.
    pub fn standard() -> Self {
        Self::for_mode(GameMode::Standard)
    }

    /// Guided trick: 7 second dwell for dramatic pacing.
    pub fn guided() -> Self {
        Self::for_mode(GameMode::Guided)
    }

    /// Quick rounds: 3 second dwell.
    pub fn quick() -> Self {
        Self {
            detection_time: Duration::from_secs(3),
            ..Self::standard()
        }
    }

    /// Defaults for a game mode.
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            detection_time: mode.default_detection_time(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            mirror: false,
        }
    }

    pub fn with_detection_threshold(mut self, threshold: f64) -> Self {
        self.detection_threshold = threshold;
        self
    }

    pub fn with_detection_time(mut self, detection_time: Duration) -> Self {
        self.detection_time = detection_time;
        self
    }

    /// Set the dwell window in (possibly fractional) seconds.
    ///
    /// Non-finite or negative values are stored as zero so that `validate`
    /// rejects them instead of panicking here.
    pub fn with_detection_time_secs(mut self, secs: f64) -> Self {
        self.detection_time = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        self
    }

    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn detection_time_secs(&self) -> f64 {
        self.detection_time.as_secs_f64()
    }

    /// Validate configuration. Values are never clamped.
    pub fn validate(&self) -> VisionResult<()> {
        if !self.detection_threshold.is_finite() || self.detection_threshold <= 0.0 {
            return Err(VisionError::invalid_config(format!(
                "detection_threshold must be a positive finite number, got {}",
                self.detection_threshold
            )));
        }
        if self.detection_time.is_zero() {
            return Err(VisionError::invalid_config(
                "detection_time must be greater than zero",
            ));
        }
        if self.frame_interval.is_zero() {
            return Err(VisionError::invalid_config(
                "frame_interval must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert_eq!(config.detection_threshold, 0.3);
        assert_eq!(config.detection_time, Duration::from_secs(5));
        assert!(!config.mirror);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(DetectionConfig::guided().detection_time, Duration::from_secs(7));
        assert_eq!(DetectionConfig::quick().detection_time, Duration::from_secs(3));
        assert!(DetectionConfig::quick().detection_time < DetectionConfig::standard().detection_time);
    }

    #[test]
    fn test_rejects_non_positive_detection_time() {
        for secs in [0.0, -1.0, f64::NAN] {
            let config = DetectionConfig::default().with_detection_time_secs(secs);
            let err = config.validate().unwrap_err();
            assert!(matches!(err, VisionError::InvalidConfig(_)), "secs = {secs}");
        }
    }

    #[test]
    fn test_rejects_bad_threshold() {
        for threshold in [0.0, -0.3, f64::INFINITY, f64::NAN] {
            let config = DetectionConfig::default().with_detection_threshold(threshold);
            assert!(config.validate().is_err(), "threshold = {threshold}");
        }
    }

    #[test]
    fn test_rejects_zero_frame_interval() {
        let config = DetectionConfig::default().with_frame_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fractional_seconds() {
        let config = DetectionConfig::default().with_detection_time_secs(2.5);
        assert_eq!(config.detection_time, Duration::from_millis(2500));
        assert_eq!(config.detection_time_secs(), 2.5);
    }
}
