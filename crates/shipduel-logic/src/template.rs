//! Data-driven ship construction.
//!
//! A `ShipTemplate` is the static description of a ship layout: rooms,
//! doors, systems, weapon loadout and starting crew. `build()` turns it into
//! a live `Ship` with derived fields (occupancy, crew pixel positions,
//! power used, shield capacity, evasion) filled in. Templates round-trip
//! through JSON so alternate layouts can be shipped as data.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::combat;
use crate::error::TemplateError;
use crate::geometry::{self, Severity};
use crate::model::{
    Crew, CrewId, CrewSkills, CrewTask, Door, DoorId, DoorOrientation, Position, Room, RoomId,
    RoomKind, Ship, ShipSide, ShipSystem, SystemKind, Systems, Weapon, WeaponId, WeaponKind,
};
use crate::weapons::WeaponDefinition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub id: RoomId,
    pub kind: RoomKind,
    pub grid_x: i32,
    pub grid_y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub manning_tile: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorTemplate {
    pub id: DoorId,
    pub room_a: RoomId,
    pub room_b: RoomId,
    /// Tile-space anchor on the shared wall.
    pub position: Position,
    pub orientation: DoorOrientation,
    #[serde(default = "default_open")]
    pub is_open: bool,
}

fn default_open() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemTemplate {
    pub kind: SystemKind,
    pub power: u32,
    pub power_max: u32,
    pub manning_bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTemplate {
    pub id: WeaponId,
    pub name: String,
    pub kind: WeaponKind,
    pub damage: i32,
    pub charge_time: f32,
    pub power_required: u32,
    #[serde(default)]
    pub missiles_cost: u32,
    /// Whether the slot starts with its full power requirement.
    #[serde(default)]
    pub powered: bool,
}

impl WeaponTemplate {
    pub fn from_definition(id: WeaponId, def: &WeaponDefinition, powered: bool) -> Self {
        Self {
            id,
            name: def.name.to_string(),
            kind: def.kind,
            damage: def.damage,
            charge_time: def.charge_time,
            power_required: def.power_required,
            missiles_cost: def.missiles_cost,
            powered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewTemplate {
    pub id: CrewId,
    pub name: String,
    pub room: RoomId,
    /// Row-major tile the crew member starts on.
    #[serde(default)]
    pub tile: u32,
    pub health: f32,
    #[serde(default)]
    pub skills: CrewSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipTemplate {
    pub side: ShipSide,
    pub name: String,
    pub hull: i32,
    pub reactor: u32,
    pub position: Position,
    #[serde(default)]
    pub shield_layers: u32,
    pub rooms: Vec<RoomTemplate>,
    pub doors: Vec<DoorTemplate>,
    pub systems: Vec<SystemTemplate>,
    #[serde(default)]
    pub weapons: Vec<WeaponTemplate>,
    #[serde(default)]
    pub crew: Vec<CrewTemplate>,
}

impl ShipTemplate {
    /// Parse a template from JSON and reject it if the layout is malformed.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: ShipTemplate = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Build the ship and run every layout check against it.
    /// Warnings are logged; any error rejects the template.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let ship = self.build();
        let (errors, warnings): (Vec<_>, Vec<_>) = geometry::validate_all(&ship)
            .into_iter()
            .partition(|e| e.severity == Severity::Error);
        for w in &warnings {
            log::warn!("{}: {}", self.name, w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::Invalid {
                name: self.name.clone(),
                errors,
            })
        }
    }

    /// Instantiate a live ship from this template.
    pub fn build(&self) -> Ship {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .map(|r| Room {
                id: r.id,
                kind: r.kind,
                grid_x: r.grid_x,
                grid_y: r.grid_y,
                width: r.width,
                height: r.height,
                system: r.kind.system(),
                oxygen: 100.0,
                fire: 0.0,
                breach: false,
                crew_in_room: Vec::new(),
                manning_tile: r.manning_tile,
            })
            .collect();

        let doors = self
            .doors
            .iter()
            .map(|d| Door {
                id: d.id,
                room_a: d.room_a,
                room_b: d.room_b,
                is_open: d.is_open,
                position: d.position,
                orientation: d.orientation,
            })
            .collect();

        let systems = Systems {
            shields: self.build_system(SystemKind::Shields, &rooms),
            weapons: self.build_system(SystemKind::Weapons, &rooms),
            engines: self.build_system(SystemKind::Engines, &rooms),
            piloting: self.build_system(SystemKind::Piloting, &rooms),
        };

        let weapons = self
            .weapons
            .iter()
            .map(|w| {
                let mut weapon = Weapon {
                    id: w.id,
                    name: w.name.clone(),
                    kind: w.kind,
                    damage: w.damage,
                    charge_time: w.charge_time,
                    current_charge: 0.0,
                    powered: false,
                    power_required: w.power_required,
                    current_power: 0,
                    target_room: None,
                    target_ship: None,
                    missiles_cost: w.missiles_cost,
                };
                weapon.set_current_power(if w.powered { w.power_required } else { 0 });
                weapon
            })
            .collect();

        let mut crew = Vec::with_capacity(self.crew.len());
        for c in &self.crew {
            let position = rooms
                .iter()
                .find(|r| r.id == c.room)
                .map(|r| geometry::room_tile_position(r, self.position, c.tile))
                .unwrap_or(self.position);
            if let Some(room) = rooms.iter_mut().find(|r| r.id == c.room) {
                room.crew_in_room.push(c.id);
            }
            crew.push(Crew {
                id: c.id,
                name: c.name.clone(),
                health: c.health,
                max_health: c.health,
                current_room: c.room,
                target_room: None,
                path: VecDeque::new(),
                task: CrewTask::Idle,
                skills: c.skills,
                position,
                is_selected: false,
                is_player: self.side == ShipSide::Player,
                door_waypoint: None,
            });
        }

        let mut ship = Ship {
            side: self.side,
            name: self.name.clone(),
            hull: self.hull,
            max_hull: self.hull,
            rooms,
            doors,
            crew,
            systems,
            reactor: self.reactor,
            power_used: 0,
            weapons,
            shield_layers: self.shield_layers,
            max_shield_layers: 0,
            shield_recharge_progress: 0.0,
            evasion: 0.0,
            position: self.position,
        };
        ship.refresh_power_used();
        ship.sync_shield_capacity();
        mark_initial_manning(&mut ship);
        ship.evasion = combat::evasion(&ship);
        ship
    }

    fn build_system(&self, kind: SystemKind, rooms: &[Room]) -> ShipSystem {
        let room_id = rooms
            .iter()
            .find(|r| r.system == Some(kind))
            .map_or(RoomId::MAX, |r| r.id);
        match self.systems.iter().find(|s| s.kind == kind) {
            Some(s) => ShipSystem {
                kind,
                power_current: s.power,
                power_max: s.power_max,
                health: s.power_max,
                max_health: s.power_max,
                manned: false,
                manning_bonus: s.manning_bonus,
                room_id,
            },
            // A layout without this system carries an inert, unpowerable one.
            None => ShipSystem {
                kind,
                power_current: 0,
                power_max: 0,
                health: 0,
                max_health: 0,
                manned: false,
                manning_bonus: 0,
                room_id,
            },
        }
    }
}

/// Crew placed on a manning tile start out manning that system.
fn mark_initial_manning(ship: &mut Ship) {
    let origin = ship.position;
    for kind in SystemKind::ALL {
        let room_id = ship.systems.get(kind).room_id;
        let Some(room) = ship.rooms.iter().find(|r| r.id == room_id) else {
            continue;
        };
        let manning = ship.crew.iter_mut().find(|c| {
            c.current_room == room_id && geometry::is_on_manning_tile(c.position, room, origin)
        });
        if let Some(crew) = manning {
            crew.task = CrewTask::Manning;
            ship.systems.get_mut(kind).manned = true;
        }
    }
}
