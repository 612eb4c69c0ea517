//! Binary elimination over a candidate pool.
//!
//! # Rounds
//! ```text
//!   Waiting(round) ── confirm(side) ──► survivors = both quadrants of side
//!        ▲                                      │
//!        │          survivors > 1               │ survivors <= 1
//!        └──── reshuffle, Round(index + 1) ◄────┴──────────────► Done(winner)
//! ```
//!
//! Each confirmation keeps one side of the grid. The left side always holds
//! `ceil(n/2)` words, so the pool strictly shrinks until one word is left.
//! A pool of one is `Done` before any confirmation.

use mindread_models::{CandidateSet, Round, Side};
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::error::{GameError, GameResult};
use crate::metrics;
use crate::partition::{partition, rng_for};

/// Engine state between confirmations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// A round is on screen, waiting for a confirmed side.
    Waiting(Round),
    /// One word left.
    Done { winner: String, rounds_played: u32 },
}

/// Result of consuming one confirmed side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A new round was dealt from the survivors.
    Advanced(Round),
    /// The kept side held a single word.
    Completed { winner: String, rounds_played: u32 },
}

/// Narrows a `CandidateSet` to one word, one confirmed side at a time.
#[derive(Debug)]
pub struct EliminationEngine {
    original: CandidateSet,
    state: EngineState,
    rng: StdRng,
}

impl EliminationEngine {
    /// Deal the first round. Pass a seed for reproducible layouts.
    pub fn new(candidates: CandidateSet, seed: Option<u64>) -> Self {
        let mut rng = rng_for(seed);
        let state = match candidates.single() {
            Some(winner) => EngineState::Done {
                winner: winner.to_string(),
                rounds_played: 0,
            },
            None => {
                let layout = partition(&candidates, &mut rng);
                EngineState::Waiting(Round::new(0, candidates.clone(), layout))
            }
        };

        debug!(candidates = candidates.len(), "Elimination engine ready");
        Self {
            original: candidates,
            state,
            rng,
        }
    }

    /// Validate a raw word list and deal the first round.
    ///
    /// # Errors
    /// `Candidates` if the list is empty or has blank or duplicate words.
    pub fn from_words<I, S>(words: I, seed: Option<u64>) -> GameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(CandidateSet::new(words)?, seed))
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Round currently on screen, if the game is still running.
    pub fn current_round(&self) -> Option<&Round> {
        match &self.state {
            EngineState::Waiting(round) => Some(round),
            EngineState::Done { .. } => None,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.state {
            EngineState::Done { winner, .. } => Some(winner),
            EngineState::Waiting(_) => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, EngineState::Done { .. })
    }

    /// The pool the game started with.
    pub fn original(&self) -> &CandidateSet {
        &self.original
    }

    /// Keep the words on `side` and either deal the next round or finish.
    ///
    /// # Errors
    /// - `AlreadyComplete` once a winner is known
    /// - `InvariantViolation` if the kept side is empty or does not shrink
    ///   the pool
    pub fn confirm(&mut self, side: Side) -> GameResult<RoundOutcome> {
        let round = match &self.state {
            EngineState::Waiting(round) => round,
            EngineState::Done { .. } => return Err(GameError::AlreadyComplete),
        };

        let survivors = round.partition.side_words(side);
        let before = round.candidate_count();
        let rounds_played = round.index + 1;

        if survivors.is_empty() {
            return Err(GameError::invariant_violation(format!(
                "round {} kept no words on the {side} side",
                round.index
            )));
        }
        if survivors.len() >= before {
            return Err(GameError::invariant_violation(format!(
                "round {} did not shrink the pool ({before} -> {})",
                round.index,
                survivors.len()
            )));
        }
        metrics::record_round(side);

        info!(
            round = round.index,
            side = %side,
            before,
            after = survivors.len(),
            "Round resolved"
        );

        if survivors.len() <= 1 {
            let winner = survivors.into_iter().next().unwrap_or_default();
            self.state = EngineState::Done {
                winner: winner.clone(),
                rounds_played,
            };
            return Ok(RoundOutcome::Completed {
                winner,
                rounds_played,
            });
        }

        let candidates = CandidateSet::new(survivors)?;
        let layout = partition(&candidates, &mut self.rng);
        let next = Round::new(rounds_played, candidates, layout);
        self.state = EngineState::Waiting(next.clone());
        Ok(RoundOutcome::Advanced(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindread_models::{QuadrantPosition, Theme};
    use rand::{Rng, SeedableRng};

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_empty_rejected_before_first_round() {
        let err = EliminationEngine::from_words(Vec::<String>::new(), Some(1)).unwrap_err();
        assert!(matches!(err, GameError::Candidates(_)));
    }

    #[test]
    fn test_single_candidate_is_done_immediately() {
        let mut engine = EliminationEngine::from_words(["owl"], Some(1)).unwrap();
        assert!(engine.is_done());
        assert_eq!(engine.winner(), Some("owl"));
        assert!(engine.current_round().is_none());
        assert!(matches!(engine.confirm(Side::Left), Err(GameError::AlreadyComplete)));
    }

    #[test]
    fn test_two_candidates_finish_on_either_side() {
        for side in Side::BOTH {
            let mut engine = EliminationEngine::from_words(["cat", "dog"], Some(3)).unwrap();
            let round = engine.current_round().unwrap().clone();
            assert_eq!(round.partition.side_len(side), 1);

            match engine.confirm(side).unwrap() {
                RoundOutcome::Completed {
                    winner,
                    rounds_played,
                } => {
                    assert_eq!(vec![winner], round.partition.side_words(side));
                    assert_eq!(rounds_played, 1);
                }
                other => panic!("expected completion, got {other:?}"),
            }
            assert!(engine.is_done());
        }
    }

    #[test]
    fn test_strict_decrease_and_membership() {
        let mut sides = StdRng::seed_from_u64(2024);
        for n in 1..=40 {
            let original = words(n);
            let mut engine = EliminationEngine::from_words(original.clone(), Some(n as u64)).unwrap();
            let mut last = n;
            let mut rounds = 0u32;

            while let Some(round) = engine.current_round() {
                assert_eq!(round.candidate_count(), last);
                let side = if sides.random_bool(0.5) { Side::Left } else { Side::Right };
                match engine.confirm(side).unwrap() {
                    RoundOutcome::Advanced(next) => {
                        assert!(next.candidate_count() < last, "n = {n}");
                        last = next.candidate_count();
                    }
                    RoundOutcome::Completed { .. } => last = 1,
                }
                rounds += 1;
            }

            let winner = engine.winner().unwrap();
            assert!(original.iter().any(|w| w == winner), "n = {n}");
            // ceil(log2(n)) bound
            let bound = usize::BITS - (n - 1).leading_zeros();
            assert!(rounds <= bound, "n = {n}, rounds = {rounds}");
        }
    }

    #[test]
    fn test_winner_traceable_through_left_choices() {
        let mut engine = EliminationEngine::new(Theme::Animals.candidates().unwrap(), Some(11));
        let mut kept: Vec<Vec<String>> = Vec::new();
        let mut sizes = vec![16];

        let winner = loop {
            let round = engine.current_round().unwrap().clone();
            kept.push(round.partition.side_words(Side::Left));
            match engine.confirm(Side::Left).unwrap() {
                RoundOutcome::Advanced(next) => sizes.push(next.candidate_count()),
                RoundOutcome::Completed { winner, .. } => break winner,
            }
        };

        assert_eq!(sizes, vec![16, 8, 4, 2]);
        for side_words in &kept {
            assert!(side_words.contains(&winner));
        }
        assert!(engine.original().contains(&winner));
    }

    #[test]
    fn test_next_round_is_the_kept_side() {
        let mut engine = EliminationEngine::from_words(words(9), Some(5)).unwrap();
        let round = engine.current_round().unwrap().clone();
        let kept = round.partition.side_words(Side::Right);

        let RoundOutcome::Advanced(next) = engine.confirm(Side::Right).unwrap() else {
            panic!("nine words cannot finish in one round");
        };
        assert_eq!(next.index, 1);
        assert_eq!(next.candidates.words(), kept.as_slice());
        for word in &kept {
            let position = next.partition.position_of(word).unwrap();
            assert!(QuadrantPosition::ALL.contains(&position));
        }
    }
}
