//! Weapon catalog, charging, and firing.
//!
//! Firing turns a ready weapon into a `Projectile` flying from the
//! shooter's weapons room to the centre of the targeted room. Resolution of
//! that projectile happens later in the tick (see `combat`).

use crate::constants::balance::{
    LASER_CHARGE_TIME, LASER_DAMAGE, LASER_POWER, MISSILE_CHARGE_TIME, MISSILE_DAMAGE,
    MISSILE_POWER, PROJECTILE_SPEED,
};
use crate::dice::Dice;
use crate::geometry;
use crate::model::{Position, Projectile, ProjectileId, ProjectileState, Ship, Weapon, WeaponKind};

// ── Catalog ─────────────────────────────────────────────────────────────

/// Static definition of a weapon model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: WeaponKind,
    pub damage: i32,
    pub charge_time: f32,
    pub power_required: u32,
    pub missiles_cost: u32,
    pub description: &'static str,
}

pub const BURST_LASER: WeaponDefinition = WeaponDefinition {
    key: "burst_laser",
    name: "Burst Laser",
    kind: WeaponKind::Laser,
    damage: LASER_DAMAGE,
    charge_time: LASER_CHARGE_TIME,
    power_required: LASER_POWER,
    missiles_cost: 0,
    description: "A rapid-fire laser that deals 1 damage. Blocked by shields.",
};

pub const BURST_LASER_II: WeaponDefinition = WeaponDefinition {
    key: "burst_laser_2",
    name: "Burst Laser II",
    ..BURST_LASER
};

pub const HALBERD_BEAM: WeaponDefinition = WeaponDefinition {
    key: "halberd_beam",
    name: "Halberd Beam",
    kind: WeaponKind::Laser,
    damage: LASER_DAMAGE + 1,
    charge_time: LASER_CHARGE_TIME * 1.5,
    power_required: LASER_POWER * 2,
    missiles_cost: 0,
    description: "A heavy laser. Hits for 2 but needs two power bars.",
};

pub const ARTEMIS_MISSILE: WeaponDefinition = WeaponDefinition {
    key: "artemis_missile",
    name: "Artemis",
    kind: WeaponKind::Missile,
    damage: MISSILE_DAMAGE,
    charge_time: MISSILE_CHARGE_TIME,
    power_required: MISSILE_POWER,
    missiles_cost: 1,
    description: "A slow but powerful missile that ignores shields. Uses 1 missile.",
};

pub const BASIC_LASER: WeaponDefinition = WeaponDefinition {
    key: "basic_laser",
    name: "Basic Laser",
    kind: WeaponKind::Laser,
    damage: LASER_DAMAGE,
    charge_time: LASER_CHARGE_TIME * 1.2,
    power_required: LASER_POWER,
    missiles_cost: 0,
    description: "A standard laser weapon.",
};

pub const ION_BLAST: WeaponDefinition = WeaponDefinition {
    key: "ion_blast",
    name: "Ion Blast",
    kind: WeaponKind::Laser,
    damage: LASER_DAMAGE,
    charge_time: LASER_CHARGE_TIME * 1.5,
    power_required: LASER_POWER,
    missiles_cost: 0,
    description: "A slow-cycling laser.",
};

pub fn catalog() -> &'static [WeaponDefinition] {
    &[
        BURST_LASER,
        BURST_LASER_II,
        HALBERD_BEAM,
        ARTEMIS_MISSILE,
        BASIC_LASER,
        ION_BLAST,
    ]
}

pub fn definition(key: &str) -> Option<&'static WeaponDefinition> {
    catalog().iter().find(|d| d.key == key)
}

// ── Charging ────────────────────────────────────────────────────────────

/// Advance charge on every powered weapon, capped at its charge time.
pub fn charge_weapons(ship: &mut Ship, dt: f32) {
    for weapon in ship.weapons.iter_mut().filter(|w| w.powered) {
        weapon.current_charge = (weapon.current_charge + dt).min(weapon.charge_time);
    }
}

/// Whether a weapon may fire right now with `missiles` in stock.
pub fn can_fire(weapon: &Weapon, missiles: u32) -> bool {
    weapon.powered
        && weapon.is_charged()
        && weapon.has_target()
        && (weapon.missiles_cost == 0 || missiles >= weapon.missiles_cost)
}

// ── Firing ──────────────────────────────────────────────────────────────

/// Where a ship's shots leave from: the centre of its weapons room.
pub fn muzzle_position(ship: &Ship) -> Position {
    ship.room(ship.systems.weapons.room_id)
        .map(|r| geometry::room_center(r, ship.position))
        .unwrap_or(ship.position)
}

fn next_projectile_id(counter: &mut ProjectileId) -> ProjectileId {
    *counter += 1;
    *counter
}

/// Fire player weapon `index` at the enemy.
///
/// Returns `false` (and changes nothing) unless the weapon is ready, aimed at
/// `enemy`, the target room exists, and enough missiles remain. On success
/// the charge resets, ammunition is spent, and the target is cleared unless
/// `keep_target` is set.
pub fn fire_player_weapon(
    player: &mut Ship,
    index: usize,
    enemy: &Ship,
    projectiles: &mut Vec<Projectile>,
    missiles: &mut u32,
    keep_target: bool,
    id_counter: &mut ProjectileId,
) -> bool {
    let muzzle = muzzle_position(player);
    let Some(weapon) = player.weapons.get_mut(index) else {
        return false;
    };
    if !can_fire(weapon, *missiles) || weapon.target_ship != Some(enemy.side) {
        return false;
    }
    let Some(room) = weapon.target_room.and_then(|id| enemy.room(id)) else {
        return false;
    };

    let projectile = Projectile {
        id: next_projectile_id(id_counter),
        weapon_kind: weapon.kind,
        damage: weapon.damage,
        source: player.side,
        target: enemy.side,
        target_room: room.id,
        position: muzzle,
        start: muzzle,
        end: geometry::room_center(room, enemy.position),
        state: ProjectileState::Flying,
        progress: 0.0,
        speed: PROJECTILE_SPEED,
    };
    log::debug!(
        "{} fired {} at room #{} (projectile #{})",
        player.name,
        weapon.name,
        room.id,
        projectile.id
    );
    projectiles.push(projectile);

    weapon.current_charge = 0.0;
    *missiles -= weapon.missiles_cost;
    if !keep_target {
        weapon.clear_target();
    }
    true
}

/// Fire every ready, targeted player weapon. Returns the number of shots.
pub fn autofire(
    player: &mut Ship,
    enemy: &Ship,
    projectiles: &mut Vec<Projectile>,
    missiles: &mut u32,
    keep_targets: bool,
    id_counter: &mut ProjectileId,
) -> usize {
    (0..player.weapons.len())
        .filter(|&i| {
            fire_player_weapon(
                player,
                i,
                enemy,
                projectiles,
                missiles,
                keep_targets,
                id_counter,
            )
        })
        .count()
}

/// Enemy AI: every powered, charged weapon fires at the player, picking a
/// random room first if it has no target. Enemy ammunition is not tracked
/// and targets persist between shots.
pub fn enemy_fire(
    enemy: &mut Ship,
    player: &Ship,
    projectiles: &mut Vec<Projectile>,
    dice: &mut dyn Dice,
    id_counter: &mut ProjectileId,
) -> usize {
    let muzzle = muzzle_position(enemy);
    let mut shots = 0;
    for weapon in enemy.weapons.iter_mut() {
        if !weapon.powered || !weapon.is_charged() {
            continue;
        }
        if weapon.target_room.is_none() {
            if player.rooms.is_empty() {
                continue;
            }
            let pick = dice.pick_index(player.rooms.len());
            weapon.target_room = Some(player.rooms[pick].id);
            weapon.target_ship = Some(player.side);
        }
        let Some(room) = weapon.target_room.and_then(|id| player.room(id)) else {
            continue;
        };

        let projectile = Projectile {
            id: next_projectile_id(id_counter),
            weapon_kind: weapon.kind,
            damage: weapon.damage,
            source: enemy.side,
            target: player.side,
            target_room: room.id,
            position: muzzle,
            start: muzzle,
            end: geometry::room_center(room, player.position),
            state: ProjectileState::Flying,
            progress: 0.0,
            speed: PROJECTILE_SPEED,
        };
        log::debug!(
            "{} fired {} at room #{} (projectile #{})",
            enemy.name,
            weapon.name,
            room.id,
            projectile.id
        );
        projectiles.push(projectile);
        weapon.current_charge = 0.0;
        shots += 1;
    }
    shots
}
