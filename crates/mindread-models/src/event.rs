//! Events published to the UI shell.
//!
//! One `ZoneChanged` per processed frame, one `SideConfirmed` per round,
//! `RoundAdvanced` whenever a new layout goes on screen (including the first),
//! and a single `GameComplete` at the end.

use schemars::JsonSchema;
use serde::Serialize;

use crate::candidates::CandidateSet;
use crate::quadrant::QuadrantPartition;
use crate::round::Round;
use crate::zone::{Side, Zone};

/// Event envelope, serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Latest zone and how long the current side has been held
    ZoneChanged {
        zone: Zone,
        #[serde(rename = "elapsedSeconds")]
        elapsed_seconds: f64,
    },

    /// Dwell threshold reached on a side
    SideConfirmed { side: Side },

    /// New candidate layout is on screen
    RoundAdvanced {
        #[serde(rename = "roundIndex")]
        round_index: u32,
        candidates: CandidateSet,
        partition: QuadrantPartition,
    },

    /// One word left
    GameComplete {
        winner: String,
        #[serde(rename = "roundsPlayed")]
        rounds_played: u32,
    },
}

impl GameEvent {
    pub fn zone_changed(zone: Zone, elapsed_seconds: f64) -> Self {
        Self::ZoneChanged {
            zone,
            elapsed_seconds,
        }
    }

    pub fn round_advanced(round: &Round) -> Self {
        Self::RoundAdvanced {
            round_index: round.index,
            candidates: round.candidates.clone(),
            partition: round.partition.clone(),
        }
    }

    pub fn game_complete(winner: impl Into<String>, rounds_played: u32) -> Self {
        Self::GameComplete {
            winner: winner.into(),
            rounds_played,
        }
    }

    /// Event type name as it appears in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::ZoneChanged { .. } => "zone_changed",
            GameEvent::SideConfirmed { .. } => "side_confirmed",
            GameEvent::RoundAdvanced { .. } => "round_advanced",
            GameEvent::GameComplete { .. } => "game_complete",
        }
    }
}
