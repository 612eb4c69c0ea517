//! Face overlay geometry for the preview.
//!
//! Converts normalized landmarks into pixel coordinates for drawing the face
//! outline and key points over the camera preview. Classification never
//! reads from here.

use mindread_models::{FacialFeature, LandmarkSet, Point2};

/// A point in preview pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

/// Drawable outline and markers for one face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceOverlay {
    /// Closed contour ring, in ring order.
    pub contour: Vec<PixelPoint>,
    /// Nose tip, inner eye corners and mouth corners.
    pub markers: Vec<(FacialFeature, PixelPoint)>,
}

impl FaceOverlay {
    /// Project landmarks onto a `width` x `height` preview.
    ///
    /// When `mirror` is set the x axis is flipped to match a selfie preview.
    pub fn from_landmarks(landmarks: &LandmarkSet, width: u32, height: u32, mirror: bool) -> Self {
        let project = |p: Point2| {
            let x = if mirror { 1.0 - p.x } else { p.x };
            PixelPoint {
                x: (x.clamp(0.0, 1.0) * width as f64) as f32,
                y: (p.y.clamp(0.0, 1.0) * height as f64) as f32,
            }
        };

        let contour = landmarks.contour().map(project).collect();
        let markers = FacialFeature::ALL
            .iter()
            .filter_map(|f| landmarks.feature(*f).map(|p| (*f, project(p))))
            .collect();

        Self { contour, markers }
    }

    pub fn is_empty(&self) -> bool {
        self.contour.is_empty() && self.markers.is_empty()
    }

    /// Axis-aligned bounds of the contour as `(min, max)`.
    pub fn bounds(&self) -> Option<(PixelPoint, PixelPoint)> {
        let first = self.contour.first()?;
        let init = (*first, *first);
        Some(self.contour.iter().fold(init, |(min, max), p| {
            (
                PixelPoint {
                    x: min.x.min(p.x),
                    y: min.y.min(p.y),
                },
                PixelPoint {
                    x: max.x.max(p.x),
                    y: max.y.max(p.y),
                },
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::face_with_ratio;

    #[test]
    fn test_projects_to_pixels() {
        let face = face_with_ratio(0.0);
        let overlay = FaceOverlay::from_landmarks(&face, 640, 480, false);

        assert_eq!(overlay.contour.len(), 16);
        assert_eq!(overlay.markers.len(), 5);

        let (feature, nose) = overlay.markers[0];
        assert_eq!(feature, FacialFeature::NoseTip);
        assert_eq!(nose, PixelPoint { x: 320.0, y: 240.0 });
    }

    #[test]
    fn test_mirror_flips_x() {
        let face = face_with_ratio(0.8);
        let plain = FaceOverlay::from_landmarks(&face, 100, 100, false);
        let mirrored = FaceOverlay::from_landmarks(&face, 100, 100, true);

        let (_, nose) = plain.markers[0];
        let (_, nose_mirrored) = mirrored.markers[0];
        assert!((nose.x + nose_mirrored.x - 100.0).abs() < 1e-3);
        assert_eq!(nose.y, nose_mirrored.y);
    }

    #[test]
    fn test_bounds() {
        let overlay = FaceOverlay::from_landmarks(&face_with_ratio(0.0), 100, 100, false);
        let (min, max) = overlay.bounds().unwrap();
        assert!(min.x < max.x && min.y < max.y);
        assert!(FaceOverlay::default().bounds().is_none());
        assert!(FaceOverlay::default().is_empty());
    }
}
