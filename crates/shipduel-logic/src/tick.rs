//! The per-frame simulation step.
//!
//! `advance` runs nine phases in a fixed order, each over both ships where
//! it applies:
//!
//! 1. weapon charge
//! 2. shield recharge
//! 3. crew movement
//! 4. manning
//! 5. evasion
//! 6. player autofire
//! 7. enemy fire
//! 8. projectile resolution
//! 9. win/lose check

use crate::combat::{self, Outcome, ResolutionReport};
use crate::crew;
use crate::dice::Dice;
use crate::state::GameState;
use crate::weapons;

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub player_shots: usize,
    pub enemy_shots: usize,
    pub resolution: ResolutionReport,
}

/// Advance the battle by `dt` seconds.
///
/// Returns `None` without touching the state when the game is paused, over,
/// not started, or has no enemy. Negative and non-finite deltas count as 0.
pub fn advance(state: &mut GameState, dt: f32, dice: &mut dyn Dice) -> Option<TickReport> {
    if !state.is_running() {
        return None;
    }
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    let GameState {
        player_ship: player,
        enemy_ship,
        projectiles,
        missiles,
        autofire,
        next_projectile_id,
        ..
    } = state;
    let enemy = enemy_ship.as_mut()?;
    let mut report = TickReport::default();

    for ship in [&mut *player, &mut *enemy] {
        weapons::charge_weapons(ship, dt);
    }
    for ship in [&mut *player, &mut *enemy] {
        combat::recharge_shields(ship, dt);
    }
    for ship in [&mut *player, &mut *enemy] {
        crew::tick_movement(ship, dt);
    }
    for ship in [&mut *player, &mut *enemy] {
        crew::recompute_manning(ship);
    }
    for ship in [&mut *player, &mut *enemy] {
        ship.evasion = combat::evasion(ship);
    }

    report.player_shots = weapons::autofire(
        player,
        enemy,
        projectiles,
        missiles,
        *autofire,
        next_projectile_id,
    );
    report.enemy_shots = weapons::enemy_fire(enemy, player, projectiles, dice, next_projectile_id);
    report.resolution = combat::step_projectiles(projectiles, player, enemy, dt, dice);

    let outcome = combat::check_outcome(player, enemy);
    state.combat_time += dt;
    if outcome != Outcome::Ongoing {
        state.game_over = true;
        state.victory = outcome == Outcome::Victory;
        state.paused = true;
        log::info!(
            "battle over after {:.1}s: {}",
            state.combat_time,
            if state.victory { "victory" } else { "defeat" }
        );
    }
    Some(report)
}
