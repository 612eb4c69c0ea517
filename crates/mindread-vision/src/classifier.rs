//! Yaw-only head orientation classifier.
//!
//! Maps one frame's landmarks to a horizontal `Zone` using the nose tip's
//! offset from the midpoint of the inner eye corners:
//!
//! ```text
//! face_center    = midpoint(left_eye_inner, right_eye_inner)
//! eye_distance   = |right_eye_inner.x - left_eye_inner.x|
//! nose_offset    = nose_tip.x - face_center.x
//! rotation_ratio = nose_offset / (eye_distance * 0.5)
//!
//! rotation_ratio < -T  -> left
//! rotation_ratio >  T  -> right
//! otherwise            -> center   (exactly ±T is center)
//! ```
//!
//! Normalizing by half the eye distance keeps the ratio independent of how
//! far the player sits from the camera, so no camera intrinsics or 3D pose
//! solve are needed.

use mindread_models::{FacialFeature, LandmarkSet, Zone};

use crate::config::{DetectionConfig, DEFAULT_DETECTION_THRESHOLD};

/// Pure landmark-to-zone classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneClassifier {
    threshold: f64,
    mirror: bool,
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_THRESHOLD)
    }
}

impl ZoneClassifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            mirror: false,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            threshold: config.detection_threshold,
            mirror: config.mirror,
        }
    }

    /// Flip left and right for selfie-mirrored capture.
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify one frame. `None` landmarks means no face was found.
    pub fn classify(&self, landmarks: Option<&LandmarkSet>) -> Zone {
        let Some(ratio) = landmarks.and_then(|set| self.rotation_ratio(set)) else {
            return Zone::None;
        };

        if ratio < -self.threshold {
            Zone::Left
        } else if ratio > self.threshold {
            Zone::Right
        } else {
            Zone::Center
        }
    }

    /// Signed yaw ratio, or `None` when the landmarks are unusable
    /// (missing features, collapsed eye corners, non-finite coordinates).
    pub fn rotation_ratio(&self, landmarks: &LandmarkSet) -> Option<f64> {
        let nose_tip = landmarks.feature(FacialFeature::NoseTip)?;
        let left_eye = landmarks.feature(FacialFeature::LeftEyeInner)?;
        let right_eye = landmarks.feature(FacialFeature::RightEyeInner)?;

        let eye_distance = (right_eye.x - left_eye.x).abs();
        if eye_distance == 0.0 || !eye_distance.is_finite() {
            return None;
        }

        let face_center = left_eye.midpoint(&right_eye);
        let nose_offset = nose_tip.x - face_center.x;
        let ratio = nose_offset / (eye_distance * 0.5);
        if !ratio.is_finite() {
            return None;
        }

        Some(if self.mirror { -ratio } else { ratio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindread_models::{LandmarkLayout, Point2};

    /// Eyes at 0.4 / 0.6 (half distance 0.1), nose shifted by `ratio * 0.1`.
    fn face_with_ratio(ratio: f64) -> LandmarkSet {
        LandmarkSet::from_features(
            Point2::new(0.5 + ratio * 0.1, 0.5),
            Point2::new(0.4, 0.4),
            Point2::new(0.6, 0.4),
            Point2::new(0.42, 0.65),
            Point2::new(0.58, 0.65),
            &[],
        )
    }

    fn face_with_nose_x(nose_x: f64) -> LandmarkSet {
        LandmarkSet::from_features(
            Point2::new(nose_x, 0.5),
            Point2::new(0.25, 0.4),
            Point2::new(0.75, 0.4),
            Point2::new(0.3, 0.65),
            Point2::new(0.7, 0.65),
            &[],
        )
    }

    #[test]
    fn test_no_face_is_none() {
        assert_eq!(ZoneClassifier::default().classify(None), Zone::None);
    }

    #[test]
    fn test_centered_face_is_center() {
        let classifier = ZoneClassifier::default();
        let face = face_with_nose_x(0.5);
        assert_eq!(classifier.rotation_ratio(&face), Some(0.0));
        assert_eq!(classifier.classify(Some(&face)), Zone::Center);
    }

    #[test]
    fn test_turned_faces() {
        let classifier = ZoneClassifier::default();
        assert_eq!(classifier.classify(Some(&face_with_ratio(-0.8))), Zone::Left);
        assert_eq!(classifier.classify(Some(&face_with_ratio(0.8))), Zone::Right);
        assert_eq!(classifier.classify(Some(&face_with_ratio(0.1))), Zone::Center);
    }

    #[test]
    fn test_exact_threshold_is_center() {
        // Half eye distance is 0.25, so a nose offset of 0.125 is ratio 0.5
        // exactly in binary floating point.
        let classifier = ZoneClassifier::new(0.5);
        let right_edge = face_with_nose_x(0.625);
        let left_edge = face_with_nose_x(0.375);

        assert_eq!(classifier.rotation_ratio(&right_edge), Some(0.5));
        assert_eq!(classifier.rotation_ratio(&left_edge), Some(-0.5));
        assert_eq!(classifier.classify(Some(&right_edge)), Zone::Center);
        assert_eq!(classifier.classify(Some(&left_edge)), Zone::Center);

        // Just past the boundary on either side.
        assert_eq!(classifier.classify(Some(&face_with_nose_x(0.626))), Zone::Right);
        assert_eq!(classifier.classify(Some(&face_with_nose_x(0.374))), Zone::Left);
    }

    #[test]
    fn test_collapsed_eyes_are_none() {
        let face = LandmarkSet::from_features(
            Point2::new(0.7, 0.5),
            Point2::new(0.5, 0.4),
            Point2::new(0.5, 0.4),
            Point2::new(0.45, 0.6),
            Point2::new(0.55, 0.6),
            &[],
        );
        assert_eq!(ZoneClassifier::default().classify(Some(&face)), Zone::None);
    }

    #[test]
    fn test_truncated_landmarks_are_none() {
        let face = LandmarkSet::new(vec![Point2::new(0.5, 0.5); 3], LandmarkLayout::mediapipe());
        assert_eq!(ZoneClassifier::default().classify(Some(&face)), Zone::None);
    }

    #[test]
    fn test_deterministic() {
        let classifier = ZoneClassifier::default();
        for ratio in [-2.0, -0.31, -0.3, 0.0, 0.29, 0.3, 0.31, 2.0] {
            let face = face_with_ratio(ratio);
            let first = classifier.classify(Some(&face));
            for _ in 0..10 {
                assert_eq!(classifier.classify(Some(&face)), first);
            }
        }
    }

    #[test]
    fn test_mirror_flips_sides() {
        let classifier = ZoneClassifier::default().mirrored(true);
        assert_eq!(classifier.classify(Some(&face_with_ratio(-0.8))), Zone::Right);
        assert_eq!(classifier.classify(Some(&face_with_ratio(0.8))), Zone::Left);
        assert_eq!(classifier.classify(Some(&face_with_ratio(0.0))), Zone::Center);
    }

    #[test]
    fn test_eye_order_does_not_matter() {
        let classifier = ZoneClassifier::default();
        let face = LandmarkSet::from_features(
            Point2::new(0.7, 0.5),
            Point2::new(0.75, 0.4),
            Point2::new(0.25, 0.4),
            Point2::new(0.3, 0.65),
            Point2::new(0.7, 0.65),
            &[],
        );
        assert_eq!(classifier.classify(Some(&face)), Zone::Right);
    }
}
