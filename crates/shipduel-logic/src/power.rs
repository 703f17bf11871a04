//! Reactor power allocation across systems and weapon slots.
//!
//! Every function here either applies a change completely or leaves the
//! ship untouched and returns `false`. After any call:
//! - `power_used == systems.total_power() <= reactor`
//! - each system sits at or below `min(power_max, health)`
//! - weapon slots draw no more than the weapons system holds
//! - `max_shield_layers` tracks shield power

use crate::combat;
use crate::model::{Ship, SystemKind, WeaponId};

/// Set a system's power, clamped to `[0, min(power_max, health)]`.
///
/// Rejected when the increase would overdraw the reactor. Changing weapons
/// power fills weapon slots in order or drains them in reverse order.
pub fn set_system_power(ship: &mut Ship, kind: SystemKind, level: u32) -> bool {
    let system = ship.systems.get(kind);
    let target = level.min(system.power_ceiling());
    let current = system.power_current;

    if target > current && ship.systems.total_power() + (target - current) > ship.reactor {
        return false;
    }

    if kind == SystemKind::Weapons {
        let weapon_power = ship.weapon_power_used();
        if target > weapon_power {
            fill_weapons(ship, target - weapon_power);
        } else if target < weapon_power {
            drain_weapons(ship, weapon_power - target);
        }
    }

    ship.systems.get_mut(kind).power_current = target;
    ship.refresh_power_used();
    if kind == SystemKind::Shields {
        ship.sync_shield_capacity();
    }
    ship.evasion = combat::evasion(ship);
    true
}

/// Set one weapon slot's power, clamped to `[0, power_required]`.
///
/// Growing a slot grows the weapons system with it when needed; that is
/// rejected past the system's ceiling or the reactor. Shrinking a slot
/// shrinks the weapons system to the new slot total.
pub fn set_weapon_power(ship: &mut Ship, weapon_id: WeaponId, level: u32) -> bool {
    let Some(index) = ship.weapon_index(weapon_id) else {
        return false;
    };
    let weapon = &ship.weapons[index];
    let new_power = level.min(weapon.power_required);
    if new_power == weapon.current_power {
        return true;
    }

    let slot_total = ship.weapon_power_used() - weapon.current_power + new_power;
    let system = &ship.systems.weapons;
    let mut system_power = system.power_current;

    if new_power > weapon.current_power {
        if slot_total > system.power_current {
            if slot_total > system.power_ceiling() {
                return false;
            }
            let increase = slot_total - system.power_current;
            if ship.systems.total_power() + increase > ship.reactor {
                return false;
            }
            system_power = slot_total;
        }
    } else {
        system_power = slot_total;
    }

    ship.weapons[index].set_current_power(new_power);
    ship.systems.weapons.power_current = system_power;
    ship.refresh_power_used();
    true
}

/// Switch a weapon slot between fully powered and off.
pub fn toggle_weapon_power(ship: &mut Ship, weapon_id: WeaponId) -> bool {
    let Some(weapon) = ship.weapons.iter().find(|w| w.id == weapon_id) else {
        return false;
    };
    let level = if weapon.powered {
        0
    } else {
        weapon.power_required
    };
    set_weapon_power(ship, weapon_id, level)
}

/// Knock `amount` health off a system and pull its power down to match.
pub fn apply_system_damage(ship: &mut Ship, kind: SystemKind, amount: u32) {
    let system = ship.systems.get_mut(kind);
    system.health = system.health.saturating_sub(amount);
    system.power_current = system.power_current.min(system.health);

    match kind {
        SystemKind::Weapons => {
            let excess = ship
                .weapon_power_used()
                .saturating_sub(ship.systems.weapons.power_current);
            drain_weapons(ship, excess);
        }
        SystemKind::Shields => ship.sync_shield_capacity(),
        SystemKind::Engines | SystemKind::Piloting => {}
    }
    ship.refresh_power_used();
}

/// Hand out `amount` power to weapon slots, first slot first.
fn fill_weapons(ship: &mut Ship, mut amount: u32) {
    for weapon in ship.weapons.iter_mut() {
        if amount == 0 {
            break;
        }
        let headroom = weapon.power_required - weapon.current_power;
        let add = headroom.min(amount);
        if add > 0 {
            weapon.set_current_power(weapon.current_power + add);
            amount -= add;
        }
    }
}

/// Take `amount` power back from weapon slots, last slot first.
fn drain_weapons(ship: &mut Ship, mut amount: u32) {
    for weapon in ship.weapons.iter_mut().rev() {
        if amount == 0 {
            break;
        }
        let take = weapon.current_power.min(amount);
        if take > 0 {
            weapon.set_current_power(weapon.current_power - take);
            amount -= take;
        }
    }
}
