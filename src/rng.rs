use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::capability::RandomSource;

/// Default [`RandomSource`]: ChaCha8, seedable for replayable rounds.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self { Self { rng: ChaCha8Rng::seed_from_u64(seed) } }

    /// Seeded from OS (or browser `crypto`) entropy.
    pub fn from_entropy() -> Self { Self { rng: ChaCha8Rng::from_entropy() } }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f64 { self.rng.gen_range(0.0..1.0) }
}
