//! Shipduel Headless Simulation Harness
//!
//! Validates layouts, pathfinding, power allocation and whole scripted
//! battles in-process. No renderer, no input, no wall clock.
//!
//! Usage:
//!   cargo run -p shipduel-simtest
//!   cargo run -p shipduel-simtest -- --verbose
//!   cargo run -p shipduel-simtest -- --seed 7

use serde::Serialize;
use shipduel_logic::combat::Outcome;
use shipduel_logic::commands;
use shipduel_logic::geometry::{validate_all, Severity};
use shipduel_logic::model::{Ship, SystemKind};
use shipduel_logic::pathfinding::find_path;
use shipduel_logic::power;
use shipduel_logic::ships::{self, KESTREL_ENGINES, KESTREL_MEDBAY, KESTREL_PILOTING};
use shipduel_logic::template::ShipTemplate;
use shipduel_logic::{BattleConfig, Engine, GameState};

// ── Alternate layouts (same JSON a host would load) ─────────────────────
const GUNBOAT_JSON: &str = include_str!("../../../data/layouts/gunboat.json");

const FRAME_DT: f32 = 1.0 / 30.0;
/// Ten simulated minutes.
const MAX_BATTLE_FRAMES: usize = 18_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct BattleSummary {
    enemy: String,
    seed: u64,
    outcome: String,
    combat_time: f32,
    player_hull: i32,
    enemy_hull: i32,
    missiles_left: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1);
    println!("=== Shipduel Simulation Harness (seed {}) ===\n", seed);

    let mut results = Vec::new();

    // 1. Layout validation
    results.extend(validate_layouts(verbose));

    // 2. Pathfinding sweep over built-in ships
    results.extend(validate_pathfinding(verbose));

    // 3. Power allocation sweep
    results.extend(validate_power(verbose));

    // 4. Seeded battles to a terminal outcome
    results.extend(validate_battles(seed, verbose));

    // 5. Door lockdown
    results.extend(validate_door_lockdown(seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Every bookkeeping rule a ship must satisfy between frames.
fn ship_invariant_violation(ship: &Ship) -> Option<String> {
    for system in ship.systems.iter() {
        if system.power_current > system.power_ceiling() {
            return Some(format!(
                "{}: {} power {} over ceiling {}",
                ship.name,
                system.kind.name(),
                system.power_current,
                system.power_ceiling()
            ));
        }
    }
    if ship.power_used != ship.systems.total_power() || ship.power_used > ship.reactor {
        return Some(format!(
            "{}: power_used {} (systems {}, reactor {})",
            ship.name,
            ship.power_used,
            ship.systems.total_power(),
            ship.reactor
        ));
    }
    if ship.weapon_power_used() > ship.systems.weapons.power_current {
        return Some(format!("{}: weapon slots overdraw the weapons system", ship.name));
    }
    if ship.shield_layers > ship.max_shield_layers {
        return Some(format!("{}: shield layers above cap", ship.name));
    }
    for w in &ship.weapons {
        if w.powered != (w.current_power == w.power_required) {
            return Some(format!("{}: weapon #{} powered flag mismatch", ship.name, w.id));
        }
        if w.current_charge > w.charge_time {
            return Some(format!("{}: weapon #{} overcharged", ship.name, w.id));
        }
    }
    for c in &ship.crew {
        let homes = ship.rooms.iter().filter(|r| r.has_crew(c.id)).count();
        if homes != 1 || !ship.room(c.current_room).is_some_and(|r| r.has_crew(c.id)) {
            return Some(format!("{}: crew #{} occupancy broken", ship.name, c.id));
        }
    }
    None
}

fn state_invariant_violation(state: &GameState) -> Option<String> {
    ship_invariant_violation(&state.player_ship)
        .or_else(|| state.enemy_ship.as_ref().and_then(ship_invariant_violation))
}

// ── 1. Layouts ──────────────────────────────────────────────────────────

fn validate_layouts(verbose: bool) -> Vec<TestResult> {
    println!("--- Layouts ---");
    let mut results = Vec::new();

    let gunboat = match ShipTemplate::from_json(GUNBOAT_JSON) {
        Ok(t) => Some(t),
        Err(e) => {
            results.push(TestResult {
                name: "gunboat_parse".into(),
                passed: false,
                detail: format!("{}", e),
            });
            None
        }
    };

    let mut templates = vec![ships::kestrel(), ships::rebel_fighter()];
    templates.extend(gunboat);

    for template in &templates {
        let ship = template.build();
        let findings = validate_all(&ship);
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        if verbose {
            for f in &findings {
                println!("    {}: {}", template.name, f);
            }
        }
        results.push(TestResult {
            name: format!("layout_valid[{}]", template.name),
            passed: errors == 0,
            detail: format!(
                "{} rooms, {} doors, {} crew, {} error(s), {} warning(s)",
                ship.rooms.len(),
                ship.doors.len(),
                ship.crew.len(),
                errors,
                findings.len() - errors
            ),
        });
        results.push(TestResult {
            name: format!("layout_invariants[{}]", template.name),
            passed: ship_invariant_violation(&ship).is_none(),
            detail: ship_invariant_violation(&ship).unwrap_or_else(|| "clean".into()),
        });
    }

    let config = BattleConfig::default();
    results.push(TestResult {
        name: "default_config_valid".into(),
        passed: config.validate().is_ok(),
        detail: format!(
            "{} vs {}, {} missiles, frame clamp {}s",
            config.player.name, config.enemy.name, config.starting_missiles, config.max_frame_dt
        ),
    });

    let snapshot = serde_json::to_string(&GameState::default())
        .ok()
        .and_then(|json| serde_json::from_str::<GameState>(&json).ok());
    results.push(TestResult {
        name: "state_snapshot_roundtrip".into(),
        passed: snapshot.as_ref() == Some(&GameState::default()),
        detail: "GameState survives JSON".into(),
    });

    results
}

// ── 2. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(_verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    for template in [ships::kestrel(), ships::rebel_fighter()] {
        let ship = template.build();
        let mut checked = 0;
        let mut bad = Vec::new();
        for a in &ship.rooms {
            for b in &ship.rooms {
                let path = find_path(a.id, b.id, &ship.rooms, &ship.doors);
                checked += 1;
                let ok = if a.id == b.id {
                    path.is_empty()
                } else {
                    path.first() == Some(&a.id)
                        && path.last() == Some(&b.id)
                        && path
                            .windows(2)
                            .all(|w| ship.door_between(w[0], w[1]).is_some_and(|d| d.is_open))
                };
                if !ok {
                    bad.push(format!("{}→{}", a.id, b.id));
                }
            }
        }
        results.push(TestResult {
            name: format!("path_all_pairs[{}]", ship.name),
            passed: bad.is_empty(),
            detail: if bad.is_empty() {
                format!("{} pairs routed", checked)
            } else {
                format!("bad routes: {}", bad.join(", "))
            },
        });

        let mut sealed = ship.clone();
        for door in sealed.doors.iter_mut() {
            door.is_open = false;
        }
        let leaks = sealed
            .rooms
            .iter()
            .flat_map(|a| sealed.rooms.iter().map(move |b| (a.id, b.id)))
            .filter(|&(a, b)| !find_path(a, b, &sealed.rooms, &sealed.doors).is_empty())
            .count();
        results.push(TestResult {
            name: format!("path_sealed[{}]", ship.name),
            passed: leaks == 0,
            detail: format!("{} routes through closed doors", leaks),
        });
    }

    results
}

// ── 3. Power ────────────────────────────────────────────────────────────

fn validate_power(verbose: bool) -> Vec<TestResult> {
    println!("--- Power ---");
    let mut results = Vec::new();

    let mut violations = Vec::new();
    let mut accepted = 0;
    let mut rejected = 0;
    for kind in SystemKind::ALL {
        for level in 0..=6 {
            let mut ship = ships::kestrel().build();
            if power::set_system_power(&mut ship, kind, level) {
                accepted += 1;
            } else {
                rejected += 1;
            }
            if let Some(v) = ship_invariant_violation(&ship) {
                violations.push(format!("{} → {}: {}", kind.name(), level, v));
            }
        }
    }
    results.push(TestResult {
        name: "power_level_sweep".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            format!("{} accepted, {} rejected, invariants held", accepted, rejected)
        } else {
            violations.join("; ")
        },
    });

    let mut ship = ships::kestrel().build();
    let halberd_on = power::toggle_weapon_power(&mut ship, 2);
    let engines_blocked = !power::set_system_power(&mut ship, SystemKind::Engines, 2);
    results.push(TestResult {
        name: "power_reactor_budget".into(),
        passed: halberd_on && engines_blocked && ship.power_used == ship.reactor,
        detail: format!(
            "halberd on: {}, engines +1 blocked: {}, {}/{} used",
            halberd_on, engines_blocked, ship.power_used, ship.reactor
        ),
    });

    let mut ship = ships::kestrel().build();
    power::toggle_weapon_power(&mut ship, 2);
    power::apply_system_damage(&mut ship, SystemKind::Weapons, 2);
    let powered: Vec<bool> = ship.weapons.iter().map(|w| w.powered).collect();
    if verbose {
        println!("    weapons after 2 damage: {:?}", powered);
    }
    results.push(TestResult {
        name: "power_damage_drains_slots".into(),
        passed: ship.systems.weapons.power_current == 2
            && ship.weapon_power_used() <= 2
            && ship_invariant_violation(&ship).is_none(),
        detail: format!(
            "weapons system {}/{} health, slots draw {}",
            ship.systems.weapons.health,
            ship.systems.weapons.max_health,
            ship.weapon_power_used()
        ),
    });

    results
}

// ── 4. Battles ──────────────────────────────────────────────────────────

/// Power everything, aim every weapon at the enemy shield room and let
/// autofire work until the battle ends.
fn scripted_battle(config: BattleConfig, seed: u64) -> Result<BattleSummary, String> {
    let mut engine = Engine::with_seed(config, seed);
    engine.start();

    let state = engine.state_mut();
    let Some(target) = state
        .enemy_ship
        .as_ref()
        .map(|e| e.systems.shields.room_id)
    else {
        return Err("no enemy after start".into());
    };
    let weapon_ids: Vec<u32> = state.player_ship.weapons.iter().map(|w| w.id).collect();
    for &id in &weapon_ids {
        commands::set_weapon_power(state, id, u32::MAX);
        commands::set_weapon_target(state, id, Some(target));
    }
    commands::toggle_autofire(state);

    for frame in 0..MAX_BATTLE_FRAMES {
        engine.frame(FRAME_DT);
        if let Some(v) = state_invariant_violation(engine.state()) {
            return Err(format!("frame {}: {}", frame, v));
        }
        if engine.state().game_over {
            break;
        }
    }

    let state = engine.state();
    let enemy = state.enemy_ship.as_ref();
    Ok(BattleSummary {
        enemy: enemy.map(|e| e.name.clone()).unwrap_or_default(),
        seed,
        outcome: format!("{:?}", state.outcome()),
        combat_time: state.combat_time,
        player_hull: state.player_ship.hull,
        enemy_hull: enemy.map_or(0, |e| e.hull),
        missiles_left: state.missiles,
    })
}

fn validate_battles(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Battles ---");
    let mut results = Vec::new();

    let mut configs = vec![BattleConfig::default()];
    if let Ok(gunboat) = ShipTemplate::from_json(GUNBOAT_JSON) {
        configs.push(BattleConfig {
            enemy: gunboat,
            ..BattleConfig::default()
        });
    }

    for config in configs {
        let enemy_name = config.enemy.name.clone();
        match scripted_battle(config, seed) {
            Ok(summary) => {
                if verbose {
                    if let Ok(json) = serde_json::to_string(&summary) {
                        println!("    {}", json);
                    }
                }
                results.push(TestResult {
                    name: format!("battle_terminates[{}]", enemy_name),
                    passed: summary.outcome != format!("{:?}", Outcome::Ongoing),
                    detail: format!(
                        "{} after {:.1}s (hull {} vs {}, {} missiles left)",
                        summary.outcome,
                        summary.combat_time,
                        summary.player_hull,
                        summary.enemy_hull,
                        summary.missiles_left
                    ),
                });
            }
            Err(e) => results.push(TestResult {
                name: format!("battle_invariants[{}]", enemy_name),
                passed: false,
                detail: e,
            }),
        }
    }

    let replay = |s| scripted_battle(BattleConfig::default(), s).map(|b| (b.combat_time, b.enemy_hull));
    let first = replay(seed);
    results.push(TestResult {
        name: "battle_deterministic".into(),
        passed: first.is_ok() && first == replay(seed),
        detail: format!("seed {} replays identically", seed),
    });

    results
}

// ── 5. Door lockdown ────────────────────────────────────────────────────

fn validate_door_lockdown(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Door Lockdown ---");
    let mut results = Vec::new();

    let mut engine = Engine::with_seed(BattleConfig::default(), seed);
    engine.start();
    let door_ids: Vec<u32> = engine.state().player_ship.doors.iter().map(|d| d.id).collect();
    for id in &door_ids {
        commands::toggle_door(engine.state_mut(), *id);
    }

    let before = engine.state().clone();
    commands::move_crew(engine.state_mut(), 1, KESTREL_ENGINES);
    results.push(TestResult {
        name: "lockdown_blocks_orders".into(),
        passed: *engine.state() == before,
        detail: "move through sealed doors rejected".into(),
    });

    let Some(door) = engine
        .state()
        .player_ship
        .door_between(KESTREL_PILOTING, KESTREL_MEDBAY)
        .map(|d| d.id)
    else {
        results.push(TestResult {
            name: "lockdown_release".into(),
            passed: false,
            detail: "no piloting/medbay door".into(),
        });
        return results;
    };
    commands::toggle_door(engine.state_mut(), door);
    commands::move_crew(engine.state_mut(), 1, KESTREL_MEDBAY);
    for _ in 0..300 {
        engine.frame(FRAME_DT);
    }
    let arrived = engine
        .state()
        .player_ship
        .crew_member(1)
        .is_some_and(|c| c.current_room == KESTREL_MEDBAY && !c.is_moving());
    results.push(TestResult {
        name: "lockdown_release".into(),
        passed: arrived && state_invariant_violation(engine.state()).is_none(),
        detail: "crew walks through the one reopened door".into(),
    });

    results
}
