//! Game pacing modes.
//!
//! - `Standard`: the player picks a word freely, 5 second dwell
//! - `Guided`: the performer narrates the trick, 7 second dwell for drama

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Standard,
    Guided,
}

impl GameMode {
    pub const ALL: &'static [GameMode] = &[GameMode::Standard, GameMode::Guided];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Standard => "standard",
            GameMode::Guided => "guided",
        }
    }

    /// How long a side must be held before it counts.
    pub fn default_detection_time(&self) -> Duration {
        match self {
            GameMode::Standard => Duration::from_secs(5),
            GameMode::Guided => Duration::from_secs(7),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = GameModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "normal" => Ok(GameMode::Standard),
            "guided" | "trick" => Ok(GameMode::Guided),
            _ => Err(GameModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown game mode: {0}")]
pub struct GameModeParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("standard".parse::<GameMode>().unwrap(), GameMode::Standard);
        assert_eq!("TRICK".parse::<GameMode>().unwrap(), GameMode::Guided);
        assert!("fast".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_detection_times() {
        assert_eq!(GameMode::Standard.default_detection_time(), Duration::from_secs(5));
        assert_eq!(GameMode::Guided.default_detection_time(), Duration::from_secs(7));
    }
}
