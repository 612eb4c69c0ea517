//! Normalized 2D facial landmarks.
//!
//! A landmark source returns one `LandmarkSet` per frame for the single face
//! it found. Coordinates are normalized to the frame: `x` and `y` lie in
//! `[0, 1]` with the origin in the top-left corner.
//!
//! # Layouts
//!
//! Landmark models disagree on how many points they emit and in which order,
//! so every set carries a `LandmarkLayout` naming the indices of the features
//! this crate cares about:
//!
//! - `mediapipe()`: the 468-point face mesh (nose tip 1, inner eye corners
//!   133/362, mouth corners 61/291, 36-point face oval)
//! - `compact()`: the five features first, followed by the contour ring.
//!   Used for synthetic fixtures.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single normalized landmark.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two landmarks.
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Whether the point lies inside the normalized frame.
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Semantic facial features with stable indices in every layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacialFeature {
    NoseTip,
    LeftEyeInner,
    RightEyeInner,
    MouthLeft,
    MouthRight,
}

impl FacialFeature {
    pub const ALL: [FacialFeature; 5] = [
        FacialFeature::NoseTip,
        FacialFeature::LeftEyeInner,
        FacialFeature::RightEyeInner,
        FacialFeature::MouthLeft,
        FacialFeature::MouthRight,
    ];
}

/// MediaPipe face mesh face-oval ring, clockwise from the forehead.
const MEDIAPIPE_FACE_OVAL: &[usize] = &[
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

/// Compact layout contour: sixteen points directly after the five features.
const COMPACT_CONTOUR: &[usize] = &[5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20];

/// Index map from semantic features to positions in a landmark vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LandmarkLayout {
    pub nose_tip: usize,
    pub left_eye_inner: usize,
    pub right_eye_inner: usize,
    pub mouth_left: usize,
    pub mouth_right: usize,
    /// Face-contour ring, used only for overlays.
    pub contour: &'static [usize],
}

impl LandmarkLayout {
    /// MediaPipe 468-point face mesh (image-space left/right).
    pub const fn mediapipe() -> Self {
        Self {
            nose_tip: 1,
            left_eye_inner: 133,
            right_eye_inner: 362,
            mouth_left: 61,
            mouth_right: 291,
            contour: MEDIAPIPE_FACE_OVAL,
        }
    }

    /// Five features at indices 0-4, then a sixteen-point contour ring.
    pub const fn compact() -> Self {
        Self {
            nose_tip: 0,
            left_eye_inner: 1,
            right_eye_inner: 2,
            mouth_left: 3,
            mouth_right: 4,
            contour: COMPACT_CONTOUR,
        }
    }

    /// Index of a feature in this layout.
    pub fn index_of(&self, feature: FacialFeature) -> usize {
        match feature {
            FacialFeature::NoseTip => self.nose_tip,
            FacialFeature::LeftEyeInner => self.left_eye_inner,
            FacialFeature::RightEyeInner => self.right_eye_inner,
            FacialFeature::MouthLeft => self.mouth_left,
            FacialFeature::MouthRight => self.mouth_right,
        }
    }

    /// Smallest point count that covers every index of this layout.
    pub fn required_len(&self) -> usize {
        let features = FacialFeature::ALL.iter().map(|f| self.index_of(*f));
        features
            .chain(self.contour.iter().copied())
            .max()
            .map_or(0, |max| max + 1)
    }
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::mediapipe()
    }
}

/// Landmarks for one face in one frame. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point2>,
    layout: LandmarkLayout,
}

impl LandmarkSet {
    /// Wrap raw model output with the layout it was produced in.
    pub fn new(points: Vec<Point2>, layout: LandmarkLayout) -> Self {
        Self { points, layout }
    }

    /// Build a compact-layout set from named features and a contour ring.
    ///
    /// Missing contour points are padded with the nose tip so the set always
    /// satisfies `LandmarkLayout::compact()`.
    pub fn from_features(
        nose_tip: Point2,
        left_eye_inner: Point2,
        right_eye_inner: Point2,
        mouth_left: Point2,
        mouth_right: Point2,
        contour: &[Point2],
    ) -> Self {
        let layout = LandmarkLayout::compact();
        let mut points = vec![nose_tip, left_eye_inner, right_eye_inner, mouth_left, mouth_right];
        points.extend(
            (0..layout.contour.len()).map(|i| contour.get(i).copied().unwrap_or(nose_tip)),
        );
        Self { points, layout }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn layout(&self) -> &LandmarkLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a semantic feature. `None` when the model returned too few points.
    pub fn feature(&self, feature: FacialFeature) -> Option<Point2> {
        self.points.get(self.layout.index_of(feature)).copied()
    }

    /// Contour ring points that are present in this set.
    pub fn contour(&self) -> impl Iterator<Item = Point2> + '_ {
        self.layout
            .contour
            .iter()
            .filter_map(|&i| self.points.get(i).copied())
    }

    /// Whether every point lies in the normalized frame.
    pub fn is_normalized(&self) -> bool {
        self.points.iter().all(Point2::is_normalized)
    }
}
