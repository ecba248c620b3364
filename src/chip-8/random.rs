use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::RandomNumberProvider;

/// A reproducible byte source, for tests and recorded sessions.
pub fn seeded(seed: u64) -> Box<RandomNumberProvider> {
    let mut rng = StdRng::seed_from_u64(seed);

    Box::new(move || rng.gen::<u8>())
}

pub fn from_entropy() -> Box<RandomNumberProvider> {
    let mut rng = StdRng::from_entropy();

    Box::new(move || rng.gen::<u8>())
}
