//! Shuffled quadrant layouts.
//!
//! Shuffling is kept apart from the elimination state machine: callers pass
//! the RNG (or a seed) so layouts are reproducible in tests.

use mindread_models::{CandidateSet, QuadrantPartition};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shuffle a copy of `candidates` and deal it round-robin over the grid.
///
/// Even shuffled positions land on the left, odd on the right, so the left
/// side holds `ceil(n/2)` words and the right side `floor(n/2)`.
pub fn partition<R: Rng + ?Sized>(candidates: &CandidateSet, rng: &mut R) -> QuadrantPartition {
    let mut order = candidates.words().to_vec();
    order.shuffle(rng);
    QuadrantPartition::from_order(order)
}

/// `partition` with a fresh RNG; fixed when `seed` is given, OS-seeded otherwise.
pub fn partition_seeded(candidates: &CandidateSet, seed: Option<u64>) -> QuadrantPartition {
    let mut rng = rng_for(seed);
    partition(candidates, &mut rng)
}

pub(crate) fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
