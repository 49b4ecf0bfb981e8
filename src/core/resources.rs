//! Core domain: shared simulation resources.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG for drop counts and boss pattern selection.
#[derive(Resource, Debug)]
pub struct CombatRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl CombatRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for CombatRng {
    fn default() -> Self {
        Self::new(rand::rng().random())
    }
}

/// Deterministic order in which enemies are updated within a tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnOrder(pub u32);

/// Hands out [`SpawnOrder`] values.
#[derive(Resource, Debug, Default)]
pub struct SpawnCounter {
    next: u32,
}

impl SpawnCounter {
    pub fn next(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next);
        self.next += 1;
        order
    }
}
