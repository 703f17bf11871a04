//! Command surface: every write the view may make to a `GameState`.
//!
//! Each command applies completely or not at all. A rejected command (unknown
//! id, insufficient power, weapon not ready, no route) leaves the state as it
//! was and logs a warning; none of them return errors. Ship-level commands
//! act on the player ship only.

use crate::crew;
use crate::dice::Dice;
use crate::model::{CrewId, DoorId, RoomId, ShipSide, SystemKind, WeaponId};
use crate::power;
use crate::state::GameState;
use crate::weapons;

// ── Lifecycle ───────────────────────────────────────────────────────────

/// Build both ships fresh from the configured layouts and start fighting.
///
/// The enemy's first weapon is pre-aimed at a random player room. Missile
/// stock is refilled; fuel and scrap carry over.
pub fn start_game(state: &mut GameState, dice: &mut dyn Dice) {
    let player = state.config.player.build();
    let mut enemy = state.config.enemy.build();

    if let Some(weapon) = enemy.weapons.first_mut() {
        if !player.rooms.is_empty() {
            let room = &player.rooms[dice.pick_index(player.rooms.len())];
            weapon.target_room = Some(room.id);
            weapon.target_ship = Some(ShipSide::Player);
        }
    }

    log::info!("battle started: {} vs {}", player.name, enemy.name);
    state.player_ship = player;
    state.enemy_ship = Some(enemy);
    state.projectiles.clear();
    state.missiles = state.config.starting_missiles;
    state.combat_time = 0.0;
    state.game_started = true;
    state.game_over = false;
    state.victory = false;
    state.paused = false;
}

/// Return to the initial, not-yet-started state under the same config.
pub fn reset_game(state: &mut GameState) {
    let config = state.config.clone();
    *state = GameState::new(config);
    log::info!("game reset");
}

/// Force the battle to end.
pub fn end_game(state: &mut GameState, victory: bool) {
    state.game_over = true;
    state.victory = victory;
    state.paused = true;
    log::info!(
        "battle ended: {}",
        if victory { "victory" } else { "defeat" }
    );
}

pub fn pause_game(state: &mut GameState) {
    state.paused = true;
}

pub fn resume_game(state: &mut GameState) {
    state.paused = false;
}

pub fn toggle_pause(state: &mut GameState) {
    state.paused = !state.paused;
}

// ── Power ───────────────────────────────────────────────────────────────

pub fn set_power_level(state: &mut GameState, kind: SystemKind, level: u32) {
    if !power::set_system_power(&mut state.player_ship, kind, level) {
        log::warn!(
            "{} power {} rejected: reactor has {} of {} in use",
            kind.name(),
            level,
            state.player_ship.power_used,
            state.player_ship.reactor
        );
    }
}

pub fn set_weapon_power(state: &mut GameState, weapon_id: WeaponId, level: u32) {
    if !power::set_weapon_power(&mut state.player_ship, weapon_id, level) {
        log::warn!("weapon #{weapon_id} power {level} rejected");
    }
}

pub fn toggle_weapon_power(state: &mut GameState, weapon_id: WeaponId) {
    if !power::toggle_weapon_power(&mut state.player_ship, weapon_id) {
        log::warn!("weapon #{weapon_id} power toggle rejected");
    }
}

// ── Crew ────────────────────────────────────────────────────────────────

/// Select one crew member, or clear the selection with `None`.
pub fn select_crew(state: &mut GameState, crew_id: Option<CrewId>) {
    if let Some(id) = crew_id {
        if state.player_ship.crew_index(id).is_none() {
            log::warn!("cannot select unknown crew #{id}");
            return;
        }
    }
    state.selected_crew = crew_id;
    for crew in state.player_ship.crew.iter_mut() {
        crew.is_selected = Some(crew.id) == crew_id;
    }
}

/// Move selection to the next crew member in list order, wrapping.
pub fn cycle_crew_selection(state: &mut GameState) {
    let crew = &state.player_ship.crew;
    if crew.is_empty() {
        return;
    }
    let next = state
        .selected_crew
        .and_then(|id| crew.iter().position(|c| c.id == id))
        .map_or(0, |i| (i + 1) % crew.len());
    let id = crew[next].id;
    select_crew(state, Some(id));
}

pub fn move_crew(state: &mut GameState, crew_id: CrewId, room_id: RoomId) {
    if !crew::plan_move(&mut state.player_ship, crew_id, room_id) {
        log::warn!("crew #{crew_id} cannot move to room #{room_id}");
    }
}

// ── Weapons ─────────────────────────────────────────────────────────────

/// Aim a weapon at an enemy room, or clear its aim with `None`. Ends any
/// targeting mode.
pub fn set_weapon_target(state: &mut GameState, weapon_id: WeaponId, room_id: Option<RoomId>) {
    let Some(index) = state.player_ship.weapon_index(weapon_id) else {
        log::warn!("cannot target with unknown weapon #{weapon_id}");
        return;
    };
    let enemy = state.enemy_ship.as_ref();
    if let (Some(room), Some(enemy)) = (room_id, enemy) {
        if enemy.room(room).is_none() {
            log::warn!("weapon #{weapon_id} cannot target unknown room #{room}");
            return;
        }
    }

    let weapon = &mut state.player_ship.weapons[index];
    weapon.target_room = room_id;
    weapon.target_ship = match (room_id, enemy) {
        (Some(_), Some(enemy)) => Some(enemy.side),
        _ => None,
    };
    state.targeting_weapon = None;
}

/// Fire one weapon now. Keeps the target afterwards only under autofire.
pub fn fire_weapon(state: &mut GameState, weapon_id: WeaponId) {
    let Some(enemy) = state.enemy_ship.as_ref() else {
        log::warn!("weapon #{weapon_id} has nothing to fire at");
        return;
    };
    let Some(index) = state.player_ship.weapon_index(weapon_id) else {
        log::warn!("cannot fire unknown weapon #{weapon_id}");
        return;
    };
    let fired = weapons::fire_player_weapon(
        &mut state.player_ship,
        index,
        enemy,
        &mut state.projectiles,
        &mut state.missiles,
        state.autofire,
        &mut state.next_projectile_id,
    );
    if !fired {
        log::warn!("weapon #{weapon_id} is not ready to fire");
    }
}

pub fn start_targeting(state: &mut GameState, weapon_id: WeaponId) {
    if state.player_ship.weapon_index(weapon_id).is_none() {
        log::warn!("cannot target with unknown weapon #{weapon_id}");
        return;
    }
    state.targeting_weapon = Some(weapon_id);
}

pub fn cancel_targeting(state: &mut GameState) {
    state.targeting_weapon = None;
}

pub fn toggle_autofire(state: &mut GameState) {
    state.autofire = !state.autofire;
}

// ── Doors ───────────────────────────────────────────────────────────────

/// Open or close a player door. Crew already walking to it carry on.
pub fn toggle_door(state: &mut GameState, door_id: DoorId) {
    let Some(index) = state.player_ship.door_index(door_id) else {
        log::warn!("cannot toggle unknown door #{door_id}");
        return;
    };
    let door = &mut state.player_ship.doors[index];
    door.is_open = !door.is_open;
}
