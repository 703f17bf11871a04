//! The whole simulation state, owned by the host.
//!
//! The view reads `GameState` every frame and writes to it only through the
//! functions in `commands`; `tick::advance` is the only other writer.

use serde::{Deserialize, Serialize};

use crate::combat::Outcome;
use crate::config::BattleConfig;
use crate::model::{CrewId, Projectile, ProjectileId, Ship, WeaponId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub config: BattleConfig,
    pub paused: bool,
    pub game_over: bool,
    /// Meaningful only once `game_over` is set.
    pub victory: bool,
    pub game_started: bool,
    pub player_ship: Ship,
    /// Present while a battle is in progress.
    pub enemy_ship: Option<Ship>,
    pub scrap: u32,
    pub fuel: u32,
    /// Player missile stock, shared by all missile weapons.
    pub missiles: u32,
    pub projectiles: Vec<Projectile>,
    pub selected_crew: Option<CrewId>,
    /// Weapon the view is currently picking a target for.
    pub targeting_weapon: Option<WeaponId>,
    pub autofire: bool,
    /// Last projectile id handed out.
    pub next_projectile_id: ProjectileId,
    /// Seconds of battle simulated since `start_game`.
    pub combat_time: f32,
}

impl GameState {
    /// A fresh, paused, not-yet-started state.
    pub fn new(config: BattleConfig) -> Self {
        Self {
            paused: true,
            game_over: false,
            victory: false,
            game_started: false,
            player_ship: config.player.build(),
            enemy_ship: None,
            scrap: config.starting_scrap,
            fuel: config.starting_fuel,
            missiles: config.starting_missiles,
            projectiles: Vec::new(),
            selected_crew: None,
            targeting_weapon: None,
            autofire: config.autofire,
            next_projectile_id: 0,
            combat_time: 0.0,
            config,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match (self.game_over, self.victory) {
            (false, _) => Outcome::Ongoing,
            (true, true) => Outcome::Victory,
            (true, false) => Outcome::Defeat,
        }
    }

    /// Whether `advance` would do anything right now.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over && self.game_started && self.enemy_ship.is_some()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::default();
        assert!(state.paused);
        assert!(!state.game_started);
        assert!(!state.is_running());
        assert!(state.enemy_ship.is_none());
        assert_eq!(state.missiles, 8);
        assert_eq!(state.fuel, 10);
        assert_eq!(state.scrap, 0);
        assert_eq!(state.player_ship.name, "The Kestrel");
        assert_eq!(state.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn test_outcome_from_flags() {
        let mut state = GameState::default();
        state.game_over = true;
        assert_eq!(state.outcome(), Outcome::Defeat);
        state.victory = true;
        assert_eq!(state.outcome(), Outcome::Victory);
    }

    #[test]
    fn test_state_snapshot_roundtrips_through_json() {
        let state = GameState::default();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
