use proptest::prelude::*;
use shipduel_logic::commands;
use shipduel_logic::dice::{Dice, RngDice};
use shipduel_logic::model::{Ship, SystemKind};
use shipduel_logic::power;
use shipduel_logic::tick::advance;
use shipduel_logic::GameState;

#[derive(Debug, Clone)]
enum Action {
    SetPower(SystemKind, u32),
    WeaponPower(u32, u32),
    ToggleWeapon(u32),
    MoveCrew(u32, u32),
    ToggleDoor(u32),
    Target(u32, Option<u32>),
    Fire(u32),
    Damage(SystemKind, u32),
    Frame(f32),
}

fn system_kind() -> impl Strategy<Value = SystemKind> {
    prop::sample::select(SystemKind::ALL.to_vec())
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (system_kind(), 0u32..8).prop_map(|(k, l)| Action::SetPower(k, l)),
        (0u32..5, 0u32..4).prop_map(|(w, l)| Action::WeaponPower(w, l)),
        (0u32..5).prop_map(Action::ToggleWeapon),
        (0u32..5, 0u32..16).prop_map(|(c, r)| Action::MoveCrew(c, r)),
        (0u32..10).prop_map(Action::ToggleDoor),
        (0u32..5, prop::option::of(10u32..16)).prop_map(|(w, r)| Action::Target(w, r)),
        (0u32..5).prop_map(Action::Fire),
        (system_kind(), 0u32..3).prop_map(|(k, a)| Action::Damage(k, a)),
        (0.0f32..0.3).prop_map(Action::Frame),
    ]
}

fn apply(state: &mut GameState, dice: &mut dyn Dice, action: &Action) {
    match *action {
        Action::SetPower(kind, level) => commands::set_power_level(state, kind, level),
        Action::WeaponPower(id, level) => commands::set_weapon_power(state, id, level),
        Action::ToggleWeapon(id) => commands::toggle_weapon_power(state, id),
        Action::MoveCrew(id, room) => commands::move_crew(state, id, room),
        Action::ToggleDoor(id) => commands::toggle_door(state, id),
        Action::Target(id, room) => commands::set_weapon_target(state, id, room),
        Action::Fire(id) => commands::fire_weapon(state, id),
        Action::Damage(kind, amount) => {
            power::apply_system_damage(&mut state.player_ship, kind, amount)
        }
        Action::Frame(dt) => {
            advance(state, dt, dice);
        }
    }
}

fn check_ship(ship: &Ship) -> Result<(), TestCaseError> {
    for system in ship.systems.iter() {
        prop_assert!(
            system.power_current <= system.power_ceiling(),
            "{:?} power {} over ceiling {}",
            system.kind,
            system.power_current,
            system.power_ceiling()
        );
    }
    prop_assert_eq!(ship.power_used, ship.systems.total_power());
    prop_assert!(ship.power_used <= ship.reactor);
    prop_assert!(ship.weapon_power_used() <= ship.systems.weapons.power_current);
    prop_assert!(ship.shield_layers <= ship.max_shield_layers);
    prop_assert_eq!(ship.max_shield_layers, ship.systems.shields.power_current);

    for weapon in &ship.weapons {
        prop_assert_eq!(weapon.powered, weapon.current_power == weapon.power_required);
        prop_assert!(weapon.current_charge >= 0.0);
        prop_assert!(weapon.current_charge <= weapon.charge_time);
        if !weapon.powered {
            prop_assert_eq!(weapon.current_charge, 0.0);
        }
    }

    for crew in &ship.crew {
        let homes = ship.rooms.iter().filter(|r| r.has_crew(crew.id)).count();
        prop_assert_eq!(homes, 1, "crew #{} listed in {} rooms", crew.id, homes);
        prop_assert!(ship.room(crew.current_room).is_some_and(|r| r.has_crew(crew.id)));
    }
    Ok(())
}

proptest! {
    /// Property: no sequence of commands and frames breaks power, charge
    /// or occupancy bookkeeping on either ship
    #[test]
    fn invariants_hold_under_random_play(
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 1..120)
    ) {
        let mut state = GameState::default();
        let mut dice = RngDice::seeded(seed);
        commands::start_game(&mut state, &mut dice);

        for action in &actions {
            apply(&mut state, &mut dice, action);
            check_ship(&state.player_ship)?;
            if let Some(enemy) = &state.enemy_ship {
                check_ship(enemy)?;
            }
            prop_assert!(state.missiles <= 8);
        }
    }

    /// Property: pausing twice is the same as pausing once, and a paused
    /// battle does not move
    #[test]
    fn pause_is_idempotent(
        seed in any::<u64>(),
        frames in prop::collection::vec(0.0f32..0.2, 0..40)
    ) {
        let mut state = GameState::default();
        let mut dice = RngDice::seeded(seed);
        commands::start_game(&mut state, &mut dice);
        for dt in &frames {
            advance(&mut state, *dt, &mut dice);
        }

        commands::pause_game(&mut state);
        let once = state.clone();
        commands::pause_game(&mut state);
        prop_assert_eq!(&state, &once);

        for dt in &frames {
            prop_assert!(advance(&mut state, *dt, &mut dice).is_none());
        }
        prop_assert_eq!(&state, &once);
    }

    /// Property: requested power is clamped, never exceeded
    #[test]
    fn set_power_never_exceeds_ceiling(kind in system_kind(), level in 0u32..50) {
        let mut state = GameState::default();
        let before = state.player_ship.systems.get(kind).power_current;
        commands::set_power_level(&mut state, kind, level);
        let system = state.player_ship.systems.get(kind);
        prop_assert!(system.power_current <= system.power_ceiling());
        prop_assert!(system.power_current == before || system.power_current == level.min(system.power_ceiling()));
    }
}
