//! Tile/pixel geometry and ship layout validation.
//!
//! Rooms live on a tile grid anchored at the ship's top-left pixel
//! position. Doors are anchored on tile edges in tile space. The functions
//! here convert between the two and check that a layout is well-formed.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::constants::balance::SHIELD_MAX_LAYERS;
use crate::constants::layout::{ARRIVAL_TOLERANCE, TILE_SIZE};
use crate::model::{Door, Position, Room, RoomId, Ship, SystemKind};

// ── Tile/pixel conversion ───────────────────────────────────────────────

/// Pixel centre of a tile inside a room. Tiles are numbered row-major from
/// the room's top-left; out-of-range indices clamp to the last tile.
pub fn room_tile_position(room: &Room, origin: Position, tile_index: u32) -> Position {
    let width = room.width.max(1);
    let last = room.tile_count().max(1) - 1;
    let index = tile_index.min(last);
    let col = (index % width) as f32;
    let row = (index / width) as f32;
    Position {
        x: origin.x + (room.grid_x as f32 + col) * TILE_SIZE + TILE_SIZE / 2.0,
        y: origin.y + (room.grid_y as f32 + row) * TILE_SIZE + TILE_SIZE / 2.0,
    }
}

pub fn room_center(room: &Room, origin: Position) -> Position {
    Position {
        x: origin.x + room.grid_x as f32 * TILE_SIZE + room.width as f32 * TILE_SIZE / 2.0,
        y: origin.y + room.grid_y as f32 * TILE_SIZE + room.height as f32 * TILE_SIZE / 2.0,
    }
}

pub fn door_pixel_position(door: &Door, origin: Position) -> Position {
    Position {
        x: origin.x + door.position.x * TILE_SIZE,
        y: origin.y + door.position.y * TILE_SIZE,
    }
}

pub fn manning_tile_position(room: &Room, origin: Position) -> Position {
    room_tile_position(room, origin, room.manning_tile)
}

/// Row-major index of the tile under `pos`, or `None` if outside the room.
pub fn tile_index_at(room: &Room, origin: Position, pos: Position) -> Option<u32> {
    let tx = ((pos.x - origin.x) / TILE_SIZE - room.grid_x as f32).floor();
    let ty = ((pos.y - origin.y) / TILE_SIZE - room.grid_y as f32).floor();
    if tx < 0.0 || ty < 0.0 || tx >= room.width as f32 || ty >= room.height as f32 {
        return None;
    }
    Some((ty as u32).saturating_mul(room.width).saturating_add(tx as u32))
}

/// Whether `pos` sits on the room's manning tile (within arrival tolerance).
pub fn is_on_manning_tile(pos: Position, room: &Room, origin: Position) -> bool {
    let tile = manning_tile_position(room, origin);
    (pos.x - tile.x).abs() < ARRIVAL_TOLERANCE && (pos.y - tile.y).abs() < ARRIVAL_TOLERANCE
}

// ── Validation ──────────────────────────────────────────────────────────

/// A layout validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{} {}] {}", self.category, level, self.message)
    }
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

// ── A. Rooms ────────────────────────────────────────────────────────────

/// Check every room is at least one tile in each direction.
pub fn check_room_dimensions(rooms: &[Room]) -> Vec<ValidationError> {
    rooms
        .iter()
        .filter(|r| r.width == 0 || r.height == 0)
        .map(|r| {
            error(
                "room_geometry",
                format!("Room #{} has empty dimensions: {}×{}", r.id, r.width, r.height),
            )
        })
        .collect()
}

/// Check the manning tile index falls inside the room.
pub fn check_manning_tiles(rooms: &[Room]) -> Vec<ValidationError> {
    rooms
        .iter()
        .filter(|r| r.tile_count() > 0 && r.manning_tile >= r.tile_count())
        .map(|r| {
            error(
                "room_geometry",
                format!(
                    "Room #{} manning tile {} outside {} tiles",
                    r.id,
                    r.manning_tile,
                    r.tile_count()
                ),
            )
        })
        .collect()
}

pub fn check_duplicate_room_ids(rooms: &[Room]) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    rooms
        .iter()
        .filter(|r| !seen.insert(r.id))
        .map(|r| error("room_geometry", format!("Duplicate room id #{}", r.id)))
        .collect()
}

/// Grid overlap test: no two rooms may share a tile.
pub fn check_room_overlaps(rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let a = &rooms[i];
            let b = &rooms[j];
            let (ax, ay) = (i64::from(a.grid_x), i64::from(a.grid_y));
            let (bx, by) = (i64::from(b.grid_x), i64::from(b.grid_y));
            let overlap_x = ax < bx + i64::from(b.width) && bx < ax + i64::from(a.width);
            let overlap_y = ay < by + i64::from(b.height) && by < ay + i64::from(a.height);
            if overlap_x && overlap_y {
                errors.push(error(
                    "room_geometry",
                    format!("Rooms #{} and #{} overlap", a.id, b.id),
                ));
            }
        }
    }
    errors
}

// ── B. Doors ────────────────────────────────────────────────────────────

/// Check every door references two distinct, known rooms.
pub fn check_door_rooms(doors: &[Door], rooms: &[Room]) -> Vec<ValidationError> {
    let ids: HashSet<RoomId> = rooms.iter().map(|r| r.id).collect();
    let mut errors = Vec::new();
    for d in doors {
        if d.room_a == d.room_b {
            errors.push(error(
                "doors",
                format!("Door #{} connects room #{} to itself", d.id, d.room_a),
            ));
        }
        for room in [d.room_a, d.room_b] {
            if !ids.contains(&room) {
                errors.push(error(
                    "doors",
                    format!("Door #{} references unknown room #{}", d.id, room),
                ));
            }
        }
    }
    errors
}

/// Check no two doors join the same pair of rooms.
pub fn check_duplicate_doors(doors: &[Door]) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();
    for d in doors {
        let key = (d.room_a.min(d.room_b), d.room_a.max(d.room_b));
        if !seen.insert(key) {
            errors.push(ValidationError {
                category: "doors",
                severity: Severity::Warning,
                message: format!("Door #{} duplicates a door between #{} and #{}", d.id, key.0, key.1),
            });
        }
    }
    errors
}

/// BFS over all doors (open or closed): every room must be reachable.
pub fn check_connectivity(rooms: &[Room], doors: &[Door]) -> Vec<ValidationError> {
    let Some(first) = rooms.first() else {
        return vec![error("connectivity", "Ship has no rooms".to_string())];
    };

    let mut adj: HashMap<RoomId, Vec<RoomId>> = HashMap::new();
    for d in doors {
        adj.entry(d.room_a).or_default().push(d.room_b);
        adj.entry(d.room_b).or_default().push(d.room_a);
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(first.id);
    queue.push_back(first.id);
    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = adj.get(&current) {
            for &next in neighbors {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    let unreached: Vec<RoomId> = rooms
        .iter()
        .map(|r| r.id)
        .filter(|id| !visited.contains(id))
        .collect();
    if unreached.is_empty() {
        return Vec::new();
    }
    vec![error(
        "connectivity",
        format!(
            "{} of {} rooms unreachable (e.g. room #{})",
            unreached.len(),
            rooms.len(),
            unreached[0]
        ),
    )]
}

// ── C. Systems, power and crew ──────────────────────────────────────────

/// Each system must be bound to exactly one room that declares it.
pub fn check_system_rooms(ship: &Ship) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for kind in SystemKind::ALL {
        let system = ship.systems.get(kind);
        match ship.room(system.room_id) {
            Some(room) if room.system == Some(kind) => {}
            Some(room) => errors.push(error(
                "systems",
                format!("{} bound to room #{} which houses {:?}", kind.name(), room.id, room.system),
            )),
            None => errors.push(error(
                "systems",
                format!("{} bound to unknown room #{}", kind.name(), system.room_id),
            )),
        }
        let hosts = ship.rooms.iter().filter(|r| r.system == Some(kind)).count();
        if hosts > 1 {
            errors.push(error(
                "systems",
                format!("{} declared by {} rooms", kind.name(), hosts),
            ));
        }
    }
    errors
}

/// Starting power must respect every reactor and system limit.
pub fn check_power_budget(ship: &Ship) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for system in ship.systems.iter() {
        if system.power_current > system.power_ceiling() {
            errors.push(error(
                "power",
                format!(
                    "{} power {} exceeds ceiling {}",
                    system.kind.name(),
                    system.power_current,
                    system.power_ceiling()
                ),
            ));
        }
    }
    let shields = &ship.systems.shields;
    if shields.power_max > SHIELD_MAX_LAYERS {
        errors.push(error(
            "power",
            format!(
                "Shields max power {} exceeds the {} layer cap",
                shields.power_max, SHIELD_MAX_LAYERS
            ),
        ));
    }
    let total = ship.systems.total_power();
    if total > ship.reactor {
        errors.push(error(
            "power",
            format!("System power {} exceeds reactor {}", total, ship.reactor),
        ));
    }
    let weapon_power = ship.weapon_power_used();
    if weapon_power > ship.systems.weapons.power_current {
        errors.push(error(
            "power",
            format!(
                "Weapon slots draw {} but weapons system has {}",
                weapon_power, ship.systems.weapons.power_current
            ),
        ));
    }
    for w in &ship.weapons {
        if w.powered != (w.current_power == w.power_required) {
            errors.push(error(
                "power",
                format!("Weapon #{} powered flag disagrees with its power", w.id),
            ));
        }
    }
    errors
}

/// Crew must stand in known rooms and room occupant lists must agree.
pub fn check_crew_occupancy(ship: &Ship) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for c in &ship.crew {
        match ship.room(c.current_room) {
            Some(room) if room.has_crew(c.id) => {}
            Some(room) => errors.push(error(
                "crew",
                format!("Crew #{} missing from room #{} occupants", c.id, room.id),
            )),
            None => errors.push(error(
                "crew",
                format!("Crew #{} in unknown room #{}", c.id, c.current_room),
            )),
        }
    }
    for room in &ship.rooms {
        for id in &room.crew_in_room {
            let here = ship
                .crew_member(*id)
                .is_some_and(|c| c.current_room == room.id);
            if !here {
                errors.push(error(
                    "crew",
                    format!("Room #{} lists crew #{} who is elsewhere", room.id, id),
                ));
            }
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_all(ship: &Ship) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(&ship.rooms));
    all.extend(check_manning_tiles(&ship.rooms));
    all.extend(check_duplicate_room_ids(&ship.rooms));
    all.extend(check_room_overlaps(&ship.rooms));
    all.extend(check_door_rooms(&ship.doors, &ship.rooms));
    all.extend(check_duplicate_doors(&ship.doors));
    all.extend(check_connectivity(&ship.rooms, &ship.doors));
    all.extend(check_system_rooms(ship));
    all.extend(check_power_budget(ship));
    all.extend(check_crew_occupancy(ship));
    all
}
