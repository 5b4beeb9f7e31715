//! Seeded RNG construction shared by every randomized component.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a seed.
pub(crate) fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
