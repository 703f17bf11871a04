//! Built-in ship layouts.
//!
//! `kestrel()` is the player ship: six rooms on a 6×4 tile grid, eight
//! doors, three crew. `rebel_fighter()` is the enemy: four rooms, five
//! doors, three pirates. Both are plain templates; `build()` them for a
//! live `Ship`.

use crate::constants::balance::{CREW_HEALTH, ENEMY_HULL, ENEMY_REACTOR, PLAYER_HULL, PLAYER_REACTOR};
use crate::constants::layout::{ENEMY_SHIP_X, PLAYER_SHIP_X, SHIP_Y};
use crate::model::{CrewSkills, DoorOrientation, Position, RoomId, RoomKind, ShipSide, SystemKind};
use crate::template::{
    CrewTemplate, DoorTemplate, RoomTemplate, ShipTemplate, SystemTemplate, WeaponTemplate,
};
use crate::weapons::{ARTEMIS_MISSILE, BASIC_LASER, BURST_LASER_II, HALBERD_BEAM, ION_BLAST};

fn room(id: RoomId, kind: RoomKind, x: i32, y: i32, w: u32, h: u32) -> RoomTemplate {
    RoomTemplate {
        id,
        kind,
        grid_x: x,
        grid_y: y,
        width: w,
        height: h,
        manning_tile: 0,
    }
}

fn door(id: u32, a: RoomId, b: RoomId, x: f32, y: f32, orientation: DoorOrientation) -> DoorTemplate {
    DoorTemplate {
        id,
        room_a: a,
        room_b: b,
        position: Position::new(x, y),
        orientation,
        is_open: true,
    }
}

fn system(kind: SystemKind, power: u32, power_max: u32, manning_bonus: u32) -> SystemTemplate {
    SystemTemplate {
        kind,
        power,
        power_max,
        manning_bonus,
    }
}

fn crew(id: u32, name: &str, room: RoomId, tile: u32, health: f32, skills: CrewSkills) -> CrewTemplate {
    CrewTemplate {
        id,
        name: name.to_string(),
        room,
        tile,
        health,
        skills,
    }
}

// ── Player ──────────────────────────────────────────────────────────────

pub const KESTREL_PILOTING: RoomId = 1;
pub const KESTREL_SHIELDS: RoomId = 2;
pub const KESTREL_WEAPONS: RoomId = 3;
pub const KESTREL_MEDBAY: RoomId = 4;
pub const KESTREL_OXYGEN: RoomId = 5;
pub const KESTREL_ENGINES: RoomId = 6;

/// The player's ship.
///
/// ```text
///        0    1    2    3    4    5
///   0        [shields  ][weapons  ]
///   1  [pi]  [         ][         ][en]
///   2  [lo]  [medbay   ][oxygen   ][gi]
///   3        [         ][         ]
/// ```
pub fn kestrel() -> ShipTemplate {
    use DoorOrientation::{Horizontal, Vertical};

    ShipTemplate {
        side: ShipSide::Player,
        name: "The Kestrel".to_string(),
        hull: PLAYER_HULL,
        reactor: PLAYER_REACTOR,
        position: Position::new(PLAYER_SHIP_X, SHIP_Y),
        shield_layers: 1,
        rooms: vec![
            room(KESTREL_PILOTING, RoomKind::Piloting, 0, 1, 1, 2),
            room(KESTREL_SHIELDS, RoomKind::Shields, 1, 0, 2, 2),
            room(KESTREL_WEAPONS, RoomKind::Weapons, 3, 0, 2, 2),
            room(KESTREL_MEDBAY, RoomKind::Medbay, 1, 2, 2, 2),
            room(KESTREL_OXYGEN, RoomKind::Oxygen, 3, 2, 2, 2),
            room(KESTREL_ENGINES, RoomKind::Engines, 5, 1, 1, 2),
        ],
        doors: vec![
            door(1, KESTREL_PILOTING, KESTREL_SHIELDS, 1.0, 1.5, Vertical),
            door(2, KESTREL_PILOTING, KESTREL_MEDBAY, 1.0, 2.5, Vertical),
            door(3, KESTREL_SHIELDS, KESTREL_MEDBAY, 1.5, 2.0, Horizontal),
            door(4, KESTREL_SHIELDS, KESTREL_WEAPONS, 3.0, 0.5, Vertical),
            door(5, KESTREL_MEDBAY, KESTREL_OXYGEN, 3.0, 2.5, Vertical),
            door(6, KESTREL_WEAPONS, KESTREL_OXYGEN, 3.5, 2.0, Horizontal),
            door(7, KESTREL_WEAPONS, KESTREL_ENGINES, 5.0, 1.5, Vertical),
            door(8, KESTREL_OXYGEN, KESTREL_ENGINES, 5.0, 2.5, Vertical),
        ],
        systems: vec![
            system(SystemKind::Shields, 2, 4, 10),
            system(SystemKind::Weapons, 2, 4, 10),
            system(SystemKind::Engines, 1, 4, 10),
            system(SystemKind::Piloting, 1, 2, 5),
        ],
        weapons: vec![
            WeaponTemplate::from_definition(1, &BURST_LASER_II, true),
            WeaponTemplate::from_definition(2, &HALBERD_BEAM, false),
            WeaponTemplate::from_definition(3, &ARTEMIS_MISSILE, true),
        ],
        crew: vec![
            crew(
                1,
                "Matt",
                KESTREL_PILOTING,
                0,
                CREW_HEALTH,
                CrewSkills {
                    piloting: 1,
                    ..CrewSkills::default()
                },
            ),
            crew(
                2,
                "Junpeng",
                KESTREL_SHIELDS,
                0,
                CREW_HEALTH,
                CrewSkills {
                    shields: 1,
                    ..CrewSkills::default()
                },
            ),
            crew(
                3,
                "Graffin",
                KESTREL_WEAPONS,
                2,
                CREW_HEALTH,
                CrewSkills {
                    weapons: 1,
                    combat: 1,
                    ..CrewSkills::default()
                },
            ),
        ],
    }
}

// ── Enemy ───────────────────────────────────────────────────────────────

pub const FIGHTER_PILOTING: RoomId = 11;
pub const FIGHTER_WEAPONS: RoomId = 12;
pub const FIGHTER_SHIELDS: RoomId = 13;
pub const FIGHTER_ENGINES: RoomId = 14;

/// The enemy fighter.
///
/// ```text
///        0    1    2    3
///   0       [piloting ]
///   1  [weapons  ][shields  ]
///   2  [         ][         ]
///   3       [engines  ]
/// ```
pub fn rebel_fighter() -> ShipTemplate {
    use DoorOrientation::{Horizontal, Vertical};

    let pirate_health = CREW_HEALTH * 0.8;
    ShipTemplate {
        side: ShipSide::Enemy,
        name: "Rebel Fighter".to_string(),
        hull: ENEMY_HULL,
        reactor: ENEMY_REACTOR,
        position: Position::new(ENEMY_SHIP_X, SHIP_Y),
        shield_layers: 0,
        rooms: vec![
            room(FIGHTER_PILOTING, RoomKind::Piloting, 1, 0, 2, 1),
            room(FIGHTER_WEAPONS, RoomKind::Weapons, 0, 1, 2, 2),
            room(FIGHTER_SHIELDS, RoomKind::Shields, 2, 1, 2, 2),
            room(FIGHTER_ENGINES, RoomKind::Engines, 1, 3, 2, 1),
        ],
        doors: vec![
            door(11, FIGHTER_PILOTING, FIGHTER_WEAPONS, 1.5, 1.0, Horizontal),
            door(12, FIGHTER_PILOTING, FIGHTER_SHIELDS, 2.5, 1.0, Horizontal),
            door(13, FIGHTER_WEAPONS, FIGHTER_SHIELDS, 2.0, 1.5, Vertical),
            door(14, FIGHTER_WEAPONS, FIGHTER_ENGINES, 1.5, 3.0, Horizontal),
            door(15, FIGHTER_SHIELDS, FIGHTER_ENGINES, 2.5, 3.0, Horizontal),
        ],
        systems: vec![
            system(SystemKind::Shields, 1, 4, 10),
            system(SystemKind::Weapons, 2, 4, 10),
            system(SystemKind::Engines, 1, 4, 10),
            system(SystemKind::Piloting, 1, 2, 5),
        ],
        weapons: vec![
            WeaponTemplate::from_definition(11, &BASIC_LASER, true),
            WeaponTemplate::from_definition(12, &ION_BLAST, true),
        ],
        crew: vec![
            crew(11, "Pirate", FIGHTER_PILOTING, 0, pirate_health, CrewSkills::default()),
            crew(12, "Pirate", FIGHTER_WEAPONS, 1, pirate_health, CrewSkills::default()),
            crew(13, "Pirate", FIGHTER_SHIELDS, 2, pirate_health, CrewSkills::default()),
        ],
    }
}
