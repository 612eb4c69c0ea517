//! Horizontal gaze zones and the two selectable sides.
//!
//! A `Zone` is produced for every processed frame. Only `Left` and `Right`
//! can be held long enough to become a confirmed `Side`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete horizontal gaze classification for a single frame.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Head turned toward the left of the frame.
    Left,
    /// Head facing the camera.
    Center,
    /// Head turned toward the right of the frame.
    Right,
    /// No usable face in this frame.
    #[default]
    None,
}

impl Zone {
    /// Returns the zone name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Left => "left",
            Zone::Center => "center",
            Zone::Right => "right",
            Zone::None => "none",
        }
    }

    /// The side this zone selects, if any.
    pub fn side(&self) -> Option<Side> {
        match self {
            Zone::Left => Some(Side::Left),
            Zone::Right => Some(Side::Right),
            Zone::Center | Zone::None => None,
        }
    }

    /// Returns true if a face was found in the frame.
    pub fn has_face(&self) -> bool {
        !matches!(self, Zone::None)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A confirmed selection: one half of the quadrant grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl From<Side> for Zone {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Zone::Left,
            Side::Right => Zone::Right,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
