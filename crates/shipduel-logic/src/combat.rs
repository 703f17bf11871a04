//! Combat resolution: evasion, shield recharge, projectile flight and hits.
//!
//! A projectile advances along a straight line from its muzzle to the
//! target room centre. Lasers are caught by a shield layer once they cross
//! `SHIELD_INTERCEPT_PROGRESS` of the flight; on arrival they still have to
//! beat the target's evasion. Missiles ignore both. A hit damages the system
//! housed in the target room (if any) and always damages the hull.

use crate::constants::balance::{
    BASE_EVASION, EVASION_PER_ENGINE_POWER, MANNED_ENGINES_BONUS, MANNED_PILOTING_BONUS,
    MAX_EVASION, SHIELD_INTERCEPT_PROGRESS, SHIELD_RECHARGE_TIME, SYSTEM_DAMAGE_PER_HIT,
};
use crate::dice::Dice;
use crate::model::{Projectile, ProjectileState, RoomId, Ship, ShipSide};
use crate::power;

// ── Evasion ─────────────────────────────────────────────────────────────

/// Percent chance a laser misses this ship.
pub fn evasion(ship: &Ship) -> f32 {
    let engines = &ship.systems.engines;
    let piloting = &ship.systems.piloting;
    if !engines.is_operational() || !piloting.is_operational() {
        return 0.0;
    }

    let mut evasion = BASE_EVASION + engines.power_current as f32 * EVASION_PER_ENGINE_POWER;
    if engines.manned {
        evasion += MANNED_ENGINES_BONUS;
    }
    if piloting.manned {
        evasion += MANNED_PILOTING_BONUS;
    }
    evasion.min(MAX_EVASION)
}

// ── Shields ─────────────────────────────────────────────────────────────

/// Restore one shield layer per `SHIELD_RECHARGE_TIME` seconds while below
/// the cap. Progress only accumulates while the shields hold power.
pub fn recharge_shields(ship: &mut Ship, dt: f32) {
    ship.sync_shield_capacity();
    if ship.systems.shields.power_current == 0 || ship.shield_layers >= ship.max_shield_layers {
        return;
    }

    ship.shield_recharge_progress += dt;
    if ship.shield_recharge_progress >= SHIELD_RECHARGE_TIME {
        ship.shield_layers = (ship.shield_layers + 1).min(ship.max_shield_layers);
        ship.shield_recharge_progress = 0.0;
    }
}

// ── Projectiles ─────────────────────────────────────────────────────────

/// What happened to projectiles during one resolution step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub intercepted: usize,
    pub evaded: usize,
    pub hits: usize,
}

impl ResolutionReport {
    pub fn merge(&mut self, other: ResolutionReport) {
        self.intercepted += other.intercepted;
        self.evaded += other.evaded;
        self.hits += other.hits;
    }
}

/// Advance every flying projectile by `dt` and resolve the ones that reach
/// a shield or their target. Resolved projectiles are removed.
pub fn step_projectiles(
    projectiles: &mut Vec<Projectile>,
    player: &mut Ship,
    enemy: &mut Ship,
    dt: f32,
    dice: &mut dyn Dice,
) -> ResolutionReport {
    let mut report = ResolutionReport::default();

    projectiles.retain_mut(|p| {
        if p.state != ProjectileState::Flying {
            return false;
        }
        let target = match p.target {
            ShipSide::Player => &mut *player,
            ShipSide::Enemy => &mut *enemy,
        };

        let distance = p.start.distance_to(p.end);
        let progress = if distance > 0.0 {
            p.progress + p.speed * dt / distance
        } else {
            1.0
        };
        let bypasses = p.weapon_kind.ignores_defenses();

        if !bypasses && target.shield_layers > 0 && progress >= SHIELD_INTERCEPT_PROGRESS {
            target.shield_layers -= 1;
            p.state = ProjectileState::Destroyed;
            report.intercepted += 1;
            log::debug!("projectile #{} stopped by {} shields", p.id, target.name);
            return false;
        }

        if progress >= 1.0 {
            if !bypasses && dice.roll_percent() <= target.evasion {
                p.state = ProjectileState::Miss;
                report.evaded += 1;
                log::debug!("projectile #{} evaded by {}", p.id, target.name);
                return false;
            }
            p.state = ProjectileState::Hit;
            report.hits += 1;
            apply_hit(target, p.target_room, p.damage);
            log::debug!(
                "projectile #{} hit {} room #{} for {} (hull {})",
                p.id,
                target.name,
                p.target_room,
                p.damage,
                target.hull
            );
            return false;
        }

        p.progress = progress;
        p.position = p.start.lerp(p.end, progress);
        true
    });

    report
}

/// Damage the system housed in `room_id` (if any) and the hull.
pub fn apply_hit(ship: &mut Ship, room_id: RoomId, damage: i32) {
    if let Some(kind) = ship.room(room_id).and_then(|r| r.system) {
        power::apply_system_damage(ship, kind, SYSTEM_DAMAGE_PER_HIT);
    }
    ship.hull = (ship.hull - damage).max(0);
}

// ── Outcome ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Victory,
    Defeat,
}

/// Player destruction is checked first, so a mutual kill is a defeat.
pub fn check_outcome(player: &Ship, enemy: &Ship) -> Outcome {
    if player.hull <= 0 {
        Outcome::Defeat
    } else if enemy.hull <= 0 {
        Outcome::Victory
    } else {
        Outcome::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedDice;
    use crate::geometry;
    use crate::model::{Position, ProjectileId, SystemKind, WeaponKind};
    use crate::ships::{self, FIGHTER_SHIELDS, KESTREL_MEDBAY};

    fn projectile(id: ProjectileId, kind: WeaponKind, target: &Ship, room: RoomId) -> Projectile {
        let end = geometry::room_center(target.room(room).unwrap(), target.position);
        let start = Position::new(end.x - 450.0, end.y);
        Projectile {
            id,
            weapon_kind: kind,
            damage: if kind == WeaponKind::Missile { 2 } else { 1 },
            source: target.side.opponent(),
            target: target.side,
            target_room: room,
            position: start,
            start,
            end,
            state: ProjectileState::Flying,
            progress: 0.0,
            speed: 450.0,
        }
    }

    fn run_until_resolved(
        projectiles: &mut Vec<Projectile>,
        player: &mut Ship,
        enemy: &mut Ship,
        dice: &mut dyn Dice,
    ) -> ResolutionReport {
        let mut total = ResolutionReport::default();
        for _ in 0..100 {
            if projectiles.is_empty() {
                break;
            }
            total.merge(step_projectiles(projectiles, player, enemy, 0.05, dice));
        }
        total
    }

    #[test]
    fn test_evasion_formula() {
        let ship = ships::kestrel().build();
        // Engines at 1 power and unmanned, piloting manned
        assert_eq!(evasion(&ship), 5.0 + 5.0 + 5.0);

        let mut manned = ship.clone();
        manned.systems.engines.manned = true;
        assert_eq!(evasion(&manned), 20.0);
    }

    #[test]
    fn test_evasion_zero_without_helm_or_engines() {
        let mut ship = ships::kestrel().build();
        ship.systems.piloting.power_current = 0;
        assert_eq!(evasion(&ship), 0.0);

        let mut ship = ships::kestrel().build();
        ship.systems.engines.health = 0;
        assert_eq!(evasion(&ship), 0.0);
    }

    #[test]
    fn test_evasion_capped() {
        let mut ship = ships::kestrel().build();
        ship.systems.engines.power_current = 40;
        assert_eq!(evasion(&ship), MAX_EVASION);
    }

    #[test]
    fn test_shield_recharge_timing() {
        let mut ship = ships::kestrel().build();
        assert_eq!(ship.shield_layers, 1);
        recharge_shields(&mut ship, 1.5);
        assert_eq!(ship.shield_layers, 1);
        recharge_shields(&mut ship, 0.5);
        assert_eq!(ship.shield_layers, 2);
        assert_eq!(ship.shield_recharge_progress, 0.0);
        // At cap: no further progress
        recharge_shields(&mut ship, 5.0);
        assert_eq!(ship.shield_layers, 2);
        assert_eq!(ship.shield_recharge_progress, 0.0);
    }

    #[test]
    fn test_shield_recharge_needs_power() {
        let mut ship = ships::kestrel().build();
        ship.systems.shields.power_current = 0;
        ship.refresh_power_used();
        recharge_shields(&mut ship, 10.0);
        assert_eq!(ship.shield_layers, 0);
        assert_eq!(ship.max_shield_layers, 0);
    }

    #[test]
    fn test_laser_blocked_by_shield() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        enemy.shield_layers = 1;
        let hull = enemy.hull;
        let shields_health = enemy.systems.shields.health;
        let mut projectiles = vec![projectile(1, WeaponKind::Laser, &enemy, FIGHTER_SHIELDS)];

        let report = run_until_resolved(
            &mut projectiles,
            &mut player,
            &mut enemy,
            &mut FixedDice::always_hit(),
        );
        assert_eq!(report.intercepted, 1);
        assert_eq!(enemy.shield_layers, 0);
        assert_eq!(enemy.hull, hull);
        assert_eq!(enemy.systems.shields.health, shields_health);
    }

    #[test]
    fn test_missile_ignores_shields_and_evasion() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        enemy.shield_layers = 1;
        enemy.evasion = 100.0;
        let mut projectiles = vec![projectile(1, WeaponKind::Missile, &enemy, FIGHTER_SHIELDS)];

        let report = run_until_resolved(
            &mut projectiles,
            &mut player,
            &mut enemy,
            &mut FixedDice::always_miss(),
        );
        assert_eq!(report.hits, 1);
        // Shield system drops to 3 health but keeps its single power bar
        assert_eq!(enemy.shield_layers, 1);
        assert_eq!(enemy.hull, 18);
        assert_eq!(enemy.systems.shields.health, 3);
    }

    #[test]
    fn test_laser_evaded() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        enemy.evasion = 30.0;
        let mut projectiles = vec![projectile(1, WeaponKind::Laser, &enemy, FIGHTER_SHIELDS)];
        let report = run_until_resolved(
            &mut projectiles,
            &mut player,
            &mut enemy,
            &mut FixedDice {
                roll: 30.0,
                index: 0,
            },
        );
        assert_eq!(report.evaded, 1);
        assert_eq!(enemy.hull, 20);
    }

    #[test]
    fn test_hit_on_empty_room_only_damages_hull() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        player.shield_layers = 0;
        let systems_before = player.systems.clone();
        let mut projectiles = vec![projectile(1, WeaponKind::Laser, &player, KESTREL_MEDBAY)];
        run_until_resolved(
            &mut projectiles,
            &mut player,
            &mut enemy,
            &mut FixedDice::always_hit(),
        );
        assert_eq!(player.hull, 29);
        assert_eq!(player.systems, systems_before);
    }

    #[test]
    fn test_flying_projectile_moves_along_line() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        let mut projectiles = vec![projectile(1, WeaponKind::Laser, &enemy, FIGHTER_SHIELDS)];
        step_projectiles(
            &mut projectiles,
            &mut player,
            &mut enemy,
            0.5,
            &mut FixedDice::always_hit(),
        );
        assert_eq!(projectiles.len(), 1);
        let p = &projectiles[0];
        assert!((p.progress - 0.5).abs() < 1e-4);
        assert!((p.position.x - (p.start.x + 225.0)).abs() < 1e-3);
    }

    #[test]
    fn test_zero_length_flight_arrives_immediately() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        let mut p = projectile(1, WeaponKind::Missile, &enemy, FIGHTER_SHIELDS);
        p.start = p.end;
        let mut projectiles = vec![p];
        let report = step_projectiles(
            &mut projectiles,
            &mut player,
            &mut enemy,
            0.0,
            &mut FixedDice::always_hit(),
        );
        assert_eq!(report.hits, 1);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_hull_floors_at_zero() {
        let mut enemy = ships::rebel_fighter().build();
        apply_hit(&mut enemy, FIGHTER_SHIELDS, 100);
        assert_eq!(enemy.hull, 0);
        assert_eq!(enemy.systems.get(SystemKind::Shields).health, 3);
    }

    #[test]
    fn test_outcome_defeat_checked_first() {
        let mut player = ships::kestrel().build();
        let mut enemy = ships::rebel_fighter().build();
        assert_eq!(check_outcome(&player, &enemy), Outcome::Ongoing);
        enemy.hull = 0;
        assert_eq!(check_outcome(&player, &enemy), Outcome::Victory);
        player.hull = 0;
        assert_eq!(check_outcome(&player, &enemy), Outcome::Defeat);
    }
}
