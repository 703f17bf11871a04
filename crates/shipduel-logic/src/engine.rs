//! Battle engine - owns a `GameState` and the dice that drive it.
//!
//! Hosts that don't want to thread an RNG through every call hold an
//! `Engine` and call `frame(dt)` once per rendered frame.

use rand::rngs::StdRng;

use crate::commands;
use crate::config::BattleConfig;
use crate::dice::RngDice;
use crate::state::GameState;
use crate::tick::{self, TickReport};

/// Clamp a frame delta to `[0, max]`. Non-finite deltas become 0.
pub fn clamp_frame_dt(dt: f32, max: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max)
}

/// Main battle engine
pub struct Engine {
    state: GameState,
    dice: RngDice<StdRng>,
}

impl Engine {
    /// Engine with entropy-seeded dice.
    pub fn new(config: BattleConfig) -> Self {
        Self {
            state: GameState::new(config),
            dice: RngDice::from_entropy(),
        }
    }

    /// Engine with deterministic dice; two engines with the same seed and
    /// the same inputs play out identically.
    pub fn with_seed(config: BattleConfig, seed: u64) -> Self {
        Self {
            state: GameState::new(config),
            dice: RngDice::seeded(seed),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for issuing `commands`.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Build both ships and unpause.
    pub fn start(&mut self) {
        commands::start_game(&mut self.state, &mut self.dice);
    }

    /// Advance one rendered frame, clamping `dt` to the configured maximum.
    pub fn frame(&mut self, dt: f32) -> Option<TickReport> {
        let dt = clamp_frame_dt(dt, self.state.config.max_frame_dt);
        tick::advance(&mut self.state, dt, &mut self.dice)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}
