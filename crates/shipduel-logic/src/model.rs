//! Entity model: ships, rooms, doors, systems, weapons, crew, projectiles.
//!
//! Pure data with small accessors. Every behavior that changes more than
//! one field at a time lives in the `power`, `combat`, `crew` and `weapons`
//! modules; this module only guarantees the types are closed sets and that
//! lookups by id never panic.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::balance::SHIELD_MAX_LAYERS;

pub type RoomId = u32;
pub type DoorId = u32;
pub type CrewId = u32;
pub type WeaponId = u32;
pub type ProjectileId = u64;

/// A point in pixel space (or tile space for door anchors).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation with `t` clamped to [0, 1].
    pub fn lerp(self, end: Position, t: f32) -> Position {
        let t = t.clamp(0.0, 1.0);
        Position {
            x: self.x + (end.x - self.x) * t,
            y: self.y + (end.y - self.y) * t,
        }
    }
}

/// Which side of the duel a ship (or projectile endpoint) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipSide {
    Player,
    Enemy,
}

impl ShipSide {
    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemKind {
    Shields,
    Weapons,
    Engines,
    Piloting,
}

impl SystemKind {
    pub const ALL: [SystemKind; 4] = [
        SystemKind::Shields,
        SystemKind::Weapons,
        SystemKind::Engines,
        SystemKind::Piloting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Shields => "Shields",
            Self::Weapons => "Weapons",
            Self::Engines => "Engines",
            Self::Piloting => "Piloting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Shields,
    Weapons,
    Engines,
    Piloting,
    Medbay,
    Oxygen,
    Empty,
}

impl RoomKind {
    /// The system a room of this kind naturally houses, if any.
    pub fn system(self) -> Option<SystemKind> {
        match self {
            Self::Shields => Some(SystemKind::Shields),
            Self::Weapons => Some(SystemKind::Weapons),
            Self::Engines => Some(SystemKind::Engines),
            Self::Piloting => Some(SystemKind::Piloting),
            Self::Medbay | Self::Oxygen | Self::Empty => None,
        }
    }
}

/// Crew activity. Only `Idle`, `Moving` and `Manning` are driven by the
/// simulation; `Repairing` and `Fighting` are reserved states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewTask {
    Idle,
    Moving,
    Repairing,
    Fighting,
    Manning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Laser,
    Missile,
}

impl WeaponKind {
    /// Missiles pass through shields and cannot be evaded.
    pub fn ignores_defenses(self) -> bool {
        matches!(self, Self::Missile)
    }
}

/// Projectiles are removed on resolution, so only `Flying` is observed in
/// the active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileState {
    Flying,
    Hit,
    Miss,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Width in tiles (≥ 1).
    pub width: u32,
    /// Height in tiles (≥ 1).
    pub height: u32,
    pub system: Option<SystemKind>,
    pub oxygen: f32,
    pub fire: f32,
    pub breach: bool,
    pub crew_in_room: Vec<CrewId>,
    /// Row-major tile index that grants the room's manning bonus.
    pub manning_tile: u32,
}

impl Room {
    /// Saturates for absurd dimensions so validation can report them.
    pub fn tile_count(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }

    pub fn has_crew(&self, crew_id: CrewId) -> bool {
        self.crew_in_room.contains(&crew_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    pub room_a: RoomId,
    pub room_b: RoomId,
    pub is_open: bool,
    /// Tile-space anchor, aligned to a tile edge.
    pub position: Position,
    pub orientation: DoorOrientation,
}

impl Door {
    pub fn connects(&self, a: RoomId, b: RoomId) -> bool {
        (self.room_a == a && self.room_b == b) || (self.room_a == b && self.room_b == a)
    }

    /// The room on the far side of this door from `room`, if it touches `room`.
    pub fn other_side(&self, room: RoomId) -> Option<RoomId> {
        if self.room_a == room {
            Some(self.room_b)
        } else if self.room_b == room {
            Some(self.room_a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSystem {
    pub kind: SystemKind,
    pub power_current: u32,
    pub power_max: u32,
    pub health: u32,
    pub max_health: u32,
    pub manned: bool,
    pub manning_bonus: u32,
    pub room_id: RoomId,
}

impl ShipSystem {
    /// Highest power level the system can currently accept.
    pub fn power_ceiling(&self) -> u32 {
        self.power_max.min(self.health)
    }

    pub fn is_operational(&self) -> bool {
        self.power_current > 0 && self.health > 0
    }
}

/// The four systems of a ship, one field per `SystemKind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Systems {
    pub shields: ShipSystem,
    pub weapons: ShipSystem,
    pub engines: ShipSystem,
    pub piloting: ShipSystem,
}

impl Systems {
    pub fn get(&self, kind: SystemKind) -> &ShipSystem {
        match kind {
            SystemKind::Shields => &self.shields,
            SystemKind::Weapons => &self.weapons,
            SystemKind::Engines => &self.engines,
            SystemKind::Piloting => &self.piloting,
        }
    }

    pub fn get_mut(&mut self, kind: SystemKind) -> &mut ShipSystem {
        match kind {
            SystemKind::Shields => &mut self.shields,
            SystemKind::Weapons => &mut self.weapons,
            SystemKind::Engines => &mut self.engines,
            SystemKind::Piloting => &mut self.piloting,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipSystem> {
        [&self.shields, &self.weapons, &self.engines, &self.piloting].into_iter()
    }

    pub fn total_power(&self) -> u32 {
        self.iter().map(|s| s.power_current).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: String,
    pub kind: WeaponKind,
    pub damage: i32,
    /// Seconds of powered charging needed before the weapon can fire.
    pub charge_time: f32,
    pub current_charge: f32,
    pub powered: bool,
    pub power_required: u32,
    pub current_power: u32,
    pub target_room: Option<RoomId>,
    pub target_ship: Option<ShipSide>,
    /// Ammunition consumed per shot (0 for lasers).
    pub missiles_cost: u32,
}

impl Weapon {
    /// Sets the slot's power and keeps `powered` and charge consistent with it.
    pub fn set_current_power(&mut self, power: u32) {
        self.current_power = power.min(self.power_required);
        self.powered = self.current_power == self.power_required;
        if !self.powered {
            self.current_charge = 0.0;
        }
    }

    pub fn is_charged(&self) -> bool {
        self.current_charge >= self.charge_time
    }

    pub fn charge_percent(&self) -> f32 {
        if self.charge_time <= 0.0 {
            return 100.0;
        }
        (self.current_charge / self.charge_time * 100.0).min(100.0)
    }

    pub fn has_target(&self) -> bool {
        self.target_room.is_some() && self.target_ship.is_some()
    }

    pub fn clear_target(&mut self) {
        self.target_room = None;
        self.target_ship = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrewSkills {
    pub piloting: u8,
    pub engines: u8,
    pub shields: u8,
    pub weapons: u8,
    pub repair: u8,
    pub combat: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    pub id: CrewId,
    pub name: String,
    pub health: f32,
    pub max_health: f32,
    pub current_room: RoomId,
    /// Final destination while moving.
    pub target_room: Option<RoomId>,
    /// Rooms still to visit, excluding the current room.
    pub path: VecDeque<RoomId>,
    pub task: CrewTask,
    pub skills: CrewSkills,
    /// Pixel position.
    pub position: Position,
    pub is_selected: bool,
    pub is_player: bool,
    /// Pixel position of the door being crossed, if mid-transit.
    pub door_waypoint: Option<Position>,
}

impl Crew {
    pub fn is_moving(&self) -> bool {
        self.task == CrewTask::Moving
    }

    /// Drop any movement plan and stand still.
    pub fn stop(&mut self) {
        self.task = CrewTask::Idle;
        self.target_room = None;
        self.path.clear();
        self.door_waypoint = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub weapon_kind: WeaponKind,
    pub damage: i32,
    pub source: ShipSide,
    pub target: ShipSide,
    pub target_room: RoomId,
    pub position: Position,
    pub start: Position,
    pub end: Position,
    pub state: ProjectileState,
    /// Fraction of the flight completed, 0..1.
    pub progress: f32,
    /// Pixels per second.
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub side: ShipSide,
    pub name: String,
    pub hull: i32,
    pub max_hull: i32,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub crew: Vec<Crew>,
    pub systems: Systems,
    pub reactor: u32,
    /// Always equal to `systems.total_power()`.
    pub power_used: u32,
    pub weapons: Vec<Weapon>,
    pub shield_layers: u32,
    pub max_shield_layers: u32,
    pub shield_recharge_progress: f32,
    /// Percent chance a non-missile projectile misses this ship.
    pub evasion: f32,
    /// Top-left pixel anchor of the ship's room grid.
    pub position: Position,
}

impl Ship {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    pub fn door_index(&self, id: DoorId) -> Option<usize> {
        self.doors.iter().position(|d| d.id == id)
    }

    /// The door joining two rooms, open or closed.
    pub fn door_between(&self, a: RoomId, b: RoomId) -> Option<&Door> {
        self.doors.iter().find(|d| d.connects(a, b))
    }

    pub fn crew_index(&self, id: CrewId) -> Option<usize> {
        self.crew.iter().position(|c| c.id == id)
    }

    pub fn crew_member(&self, id: CrewId) -> Option<&Crew> {
        self.crew.iter().find(|c| c.id == id)
    }

    pub fn weapon_index(&self, id: WeaponId) -> Option<usize> {
        self.weapons.iter().position(|w| w.id == id)
    }

    pub fn weapon_power_used(&self) -> u32 {
        self.weapons.iter().map(|w| w.current_power).sum()
    }

    pub fn refresh_power_used(&mut self) {
        self.power_used = self.systems.total_power();
    }

    /// Recompute the shield layer cap from shield power and clamp current layers.
    pub fn sync_shield_capacity(&mut self) {
        self.max_shield_layers = self.systems.shields.power_current.min(SHIELD_MAX_LAYERS);
        self.shield_layers = self.shield_layers.min(self.max_shield_layers);
    }
}
