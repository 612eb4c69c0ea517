//! On-screen quadrant grid.
//!
//! Words are dealt round-robin over the grid in reading order
//! (top-left, top-right, bottom-left, bottom-right), so the left column
//! always holds `ceil(n / 2)` words and the right column `floor(n / 2)`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::zone::Side;

/// One of the four fixed grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuadrantPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl QuadrantPosition {
    /// Dealing order.
    pub const ALL: [QuadrantPosition; 4] = [
        QuadrantPosition::TopLeft,
        QuadrantPosition::TopRight,
        QuadrantPosition::BottomLeft,
        QuadrantPosition::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuadrantPosition::TopLeft => "top_left",
            QuadrantPosition::TopRight => "top_right",
            QuadrantPosition::BottomLeft => "bottom_left",
            QuadrantPosition::BottomRight => "bottom_right",
        }
    }

    pub fn side(&self) -> Side {
        match self {
            QuadrantPosition::TopLeft | QuadrantPosition::BottomLeft => Side::Left,
            QuadrantPosition::TopRight | QuadrantPosition::BottomRight => Side::Right,
        }
    }

    /// Top then bottom quadrant of a side.
    pub fn on_side(side: Side) -> [QuadrantPosition; 2] {
        match side {
            Side::Left => [QuadrantPosition::TopLeft, QuadrantPosition::BottomLeft],
            Side::Right => [QuadrantPosition::TopRight, QuadrantPosition::BottomRight],
        }
    }
}

impl fmt::Display for QuadrantPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Disjoint assignment of a candidate ordering to the four quadrants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct QuadrantPartition {
    pub top_left: Vec<String>,
    pub top_right: Vec<String>,
    pub bottom_left: Vec<String>,
    pub bottom_right: Vec<String>,
}

impl QuadrantPartition {
    /// Deal an already-ordered word list round-robin over the grid.
    ///
    /// Deterministic: callers shuffle beforehand if they want a random layout.
    pub fn from_order<I>(ordered: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut partition = Self::default();
        for (i, word) in ordered.into_iter().enumerate() {
            let position = QuadrantPosition::ALL[i % QuadrantPosition::ALL.len()];
            partition.slot_mut(position).push(word);
        }
        partition
    }

    pub fn get(&self, position: QuadrantPosition) -> &[String] {
        match position {
            QuadrantPosition::TopLeft => &self.top_left,
            QuadrantPosition::TopRight => &self.top_right,
            QuadrantPosition::BottomLeft => &self.bottom_left,
            QuadrantPosition::BottomRight => &self.bottom_right,
        }
    }

    fn slot_mut(&mut self, position: QuadrantPosition) -> &mut Vec<String> {
        match position {
            QuadrantPosition::TopLeft => &mut self.top_left,
            QuadrantPosition::TopRight => &mut self.top_right,
            QuadrantPosition::BottomLeft => &mut self.bottom_left,
            QuadrantPosition::BottomRight => &mut self.bottom_right,
        }
    }

    /// Words on one side, top quadrant first.
    pub fn side_words(&self, side: Side) -> Vec<String> {
        QuadrantPosition::on_side(side)
            .iter()
            .flat_map(|p| self.get(*p).iter().cloned())
            .collect()
    }

    pub fn side_len(&self, side: Side) -> usize {
        QuadrantPosition::on_side(side)
            .iter()
            .map(|p| self.get(*p).len())
            .sum()
    }

    /// Quadrant holding `word`, if present.
    pub fn position_of(&self, word: &str) -> Option<QuadrantPosition> {
        QuadrantPosition::ALL
            .into_iter()
            .find(|p| self.get(*p).iter().any(|w| w == word))
    }

    pub fn len(&self) -> usize {
        QuadrantPosition::ALL.iter().map(|p| self.get(*p).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
