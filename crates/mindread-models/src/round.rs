//! A single elimination round.

use schemars::JsonSchema;
use serde::Serialize;

use crate::candidates::CandidateSet;
use crate::quadrant::QuadrantPartition;

/// Candidates in play for one round and how they are laid out on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Round {
    /// Zero-based round number.
    pub index: u32,
    pub candidates: CandidateSet,
    pub partition: QuadrantPartition,
}

impl Round {
    pub fn new(index: u32, candidates: CandidateSet, partition: QuadrantPartition) -> Self {
        Self {
            index,
            candidates,
            partition,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}
