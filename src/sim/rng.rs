//! Seeded PRNG
//!
//! Thin wrapper over `Pcg32` that remembers its seed and how many values
//! it has produced, so it can be serialized compactly and restored exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Fixed salts for the independent streams of a run
pub mod streams {
    pub const LEVEL: u64 = 0;
    pub const PARTICLES: u64 = 0x9E37_79B9_7F4A_7C15;
    pub const BOSS: u64 = 0xBF58_476D_1CE4_E5B9;
    pub const DROPS: u64 = 0x94D0_49BB_1331_11EB;
    pub const CAMERA: u64 = 0xD6E8_FEB8_6659_FD93;
}

/// Serialized form: seed plus draw count
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RngState", into = "RngState")]
pub struct Prng {
    seed: u64,
    draws: u64,
    rng: Pcg32,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Independent stream derived from a run seed
    pub fn stream(seed: u64, salt: u64) -> Self {
        Self::new(seed ^ salt)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform value in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.draws += 1;
        self.rng.random::<f32>()
    }

    /// Uniform value in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform integer in [min, max] (inclusive)
    pub fn int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        (min + (self.next_f32() * span) as u32).min(max)
    }

    /// Bernoulli draw
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }

    /// Uniform pick from a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.int_inclusive(0, items.len() as u32 - 1) as usize;
        items.get(idx)
    }
}

impl From<RngState> for Prng {
    fn from(state: RngState) -> Self {
        let mut prng = Prng::new(state.seed);
        // Each f32 draw consumes exactly one step of the generator
        prng.rng.advance(state.draws);
        prng.draws = state.draws;
        prng
    }
}

impl From<Prng> for RngState {
    fn from(prng: Prng) -> Self {
        RngState {
            seed: prng.seed,
            draws: prng.draws,
        }
    }
}
