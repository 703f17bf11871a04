//! The simulation's only source of randomness.
//!
//! Evasion rolls and enemy target picks go through `Dice` so hosts can run
//! seeded battles and tests can script exact outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Dice {
    /// Uniform roll in `[0, 100)`.
    fn roll_percent(&mut self) -> f32;
    /// Uniform index in `[0, len)`. Callers never pass `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngDice<R>(pub R);

impl RngDice<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn roll_percent(&mut self) -> f32 {
        self.0.gen_range(0.0..100.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Always returns the same roll and index.
///
/// `FixedDice::always_hit()` makes every evadable shot land;
/// `FixedDice::always_miss()` makes every evadable shot miss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDice {
    pub roll: f32,
    pub index: usize,
}

impl FixedDice {
    pub fn always_hit() -> Self {
        Self {
            roll: 100.0,
            index: 0,
        }
    }

    pub fn always_miss() -> Self {
        Self {
            roll: 0.0,
            index: 0,
        }
    }
}

impl Dice for FixedDice {
    fn roll_percent(&mut self) -> f32 {
        self.roll
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }
}
