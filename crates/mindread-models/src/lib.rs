//! Shared data models for the gaze-controlled quadrant game.
//!
//! This crate provides Serde-serializable types for:
//! - Gaze zones and confirmed sides
//! - Normalized facial landmarks and their index layouts
//! - Candidate pools, quadrant partitions and rounds
//! - Game modes and built-in word themes
//! - Events published to the UI shell

pub mod candidates;
pub mod event;
pub mod landmarks;
pub mod mode;
pub mod quadrant;
pub mod round;
pub mod theme;
pub mod zone;

// Re-export common types
pub use candidates::{CandidateError, CandidateSet};
pub use event::GameEvent;
pub use landmarks::{FacialFeature, LandmarkLayout, LandmarkSet, Point2};
pub use mode::{GameMode, GameModeParseError};
pub use quadrant::{QuadrantPartition, QuadrantPosition};
pub use round::Round;
pub use theme::{Theme, ThemeParseError};
pub use zone::{Side, Zone};
