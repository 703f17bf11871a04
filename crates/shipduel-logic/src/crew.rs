//! Crew movement and system manning.
//!
//! Crew travel room to room along a planned path. Each hop is walked in two
//! legs: first to the pixel position of the door joining the two rooms (at
//! which point the crew member changes rooms), then onward. Inside their
//! final room they walk to the manning tile when the room houses a system
//! and nobody else stands there, or to the first free tile otherwise.
//! Walking is axis-aligned: each tick moves along whichever axis has the
//! larger remaining distance.

use crate::constants::balance::CREW_MOVE_SPEED;
use crate::constants::layout::ARRIVAL_TOLERANCE;
use crate::geometry;
use crate::model::{CrewId, CrewTask, Position, Room, RoomId, Ship, SystemKind};
use crate::pathfinding::find_path;

// ── Planning ────────────────────────────────────────────────────────────

/// Plan a move for crew `crew_id` to room `target`.
///
/// Returns `false` (state untouched) for an unknown crew member or room, or
/// when no open route exists. A stationary crew member already in `target`
/// is left alone. A crew member already walking keeps heading for the next
/// room on the old path, door commitment included, when that is strictly
/// shorter or the only way round; otherwise they turn back through their
/// current room.
pub fn plan_move(ship: &mut Ship, crew_id: CrewId, target: RoomId) -> bool {
    let Some(index) = ship.crew_index(crew_id) else {
        return false;
    };
    if ship.room(target).is_none() {
        return false;
    }
    let crew = &ship.crew[index];
    let current = crew.current_room;
    if current == target && !crew.is_moving() {
        return true;
    }

    let (path, waypoint): (Vec<RoomId>, Option<Position>) = match crew.path.front().copied() {
        Some(next) if crew.is_moving() => {
            if target == current {
                (Vec::new(), None)
            } else if target == next {
                (Vec::new(), crew.door_waypoint)
            } else {
                let from_current = find_path(current, target, &ship.rooms, &ship.doors);
                let from_next = find_path(next, target, &ship.rooms, &ship.doors);
                let via_next = !from_next.is_empty()
                    && (from_current.is_empty() || from_next.len() < from_current.len());
                if via_next {
                    let path = std::iter::once(next)
                        .chain(from_next.into_iter().skip(1))
                        .collect();
                    (path, crew.door_waypoint)
                } else if from_current.is_empty() {
                    return false;
                } else {
                    (from_current.into_iter().skip(1).collect(), None)
                }
            }
        }
        _ => {
            let route = find_path(current, target, &ship.rooms, &ship.doors);
            if route.is_empty() && current != target {
                return false;
            }
            (route.into_iter().skip(1).collect(), None)
        }
    };

    let crew = &mut ship.crew[index];
    crew.target_room = Some(target);
    crew.path = path.into();
    crew.task = CrewTask::Moving;
    crew.door_waypoint = waypoint;
    true
}

// ── Movement ────────────────────────────────────────────────────────────

/// Advance every moving crew member by `dt` seconds.
pub fn tick_movement(ship: &mut Ship, dt: f32) {
    for index in 0..ship.crew.len() {
        step_crew(ship, index, dt);
    }
}

fn step_crew(ship: &mut Ship, index: usize, dt: f32) {
    let origin = ship.position;
    let crew = &ship.crew[index];
    if !crew.is_moving() {
        return;
    }
    let crew_id = crew.id;
    let current = crew.current_room;
    let position = crew.position;
    let waypoint = crew.door_waypoint;
    let Some(target) = crew.target_room else {
        ship.crew[index].stop();
        return;
    };
    let next = crew.path.front().copied().unwrap_or(target);

    let Some(next_room) = ship.room(next) else {
        log::debug!("crew #{crew_id} heading for unknown room #{next}, stopping");
        ship.crew[index].stop();
        return;
    };

    if next != current && waypoint.is_none() {
        let door = ship
            .door_between(current, next)
            .filter(|d| d.is_open)
            .map(|d| geometry::door_pixel_position(d, origin));
        match door {
            Some(door) => ship.crew[index].door_waypoint = Some(door),
            None => {
                log::debug!("crew #{crew_id} blocked between room #{current} and #{next}");
                ship.crew[index].stop();
            }
        }
        return;
    }

    let goal = match waypoint {
        Some(door) => door,
        None => {
            let tile = free_tile(ship, next_room, crew_id);
            geometry::room_tile_position(next_room, origin, tile)
        }
    };

    if position.distance_to(goal) < ARRIVAL_TOLERANCE {
        if waypoint.is_some() {
            transfer_room(ship, crew_id, current, next);
        }
        let crew = &mut ship.crew[index];
        crew.position = goal;
        crew.current_room = next;
        crew.door_waypoint = None;
        if waypoint.is_some() {
            crew.path.pop_front();
        } else {
            if crew.path.front() == Some(&next) {
                crew.path.pop_front();
            }
            if crew.path.is_empty() && next == target {
                crew.task = CrewTask::Idle;
                crew.target_room = None;
            }
        }
        return;
    }

    ship.crew[index].position = walk_toward(position, goal, CREW_MOVE_SPEED * dt);
}

/// One axis-aligned step of at most `step` pixels toward `goal`.
pub fn walk_toward(from: Position, goal: Position, step: f32) -> Position {
    let dx = goal.x - from.x;
    let dy = goal.y - from.y;
    if dx.abs() > dy.abs() {
        Position::new(from.x + dx.signum() * step.min(dx.abs()), from.y)
    } else {
        Position::new(from.x, from.y + dy.signum() * step.min(dy.abs()))
    }
}

/// The tile a crew member entering `room` should stand on.
fn free_tile(ship: &Ship, room: &Room, crew_id: CrewId) -> u32 {
    let occupied: Vec<u32> = ship
        .crew
        .iter()
        .filter(|c| c.id != crew_id && c.current_room == room.id)
        .filter_map(|c| geometry::tile_index_at(room, ship.position, c.position))
        .collect();

    if room.system.is_some() && !occupied.contains(&room.manning_tile) {
        return room.manning_tile;
    }
    (0..room.tile_count())
        .find(|t| !occupied.contains(t))
        .unwrap_or(0)
}

/// Move `crew_id` from one room's occupant list to another's.
pub fn transfer_room(ship: &mut Ship, crew_id: CrewId, from: RoomId, to: RoomId) {
    if let Some(room) = ship.room_mut(from) {
        room.crew_in_room.retain(|&id| id != crew_id);
    }
    if let Some(room) = ship.room_mut(to) {
        if !room.has_crew(crew_id) {
            room.crew_in_room.push(crew_id);
        }
    }
}

// ── Manning ─────────────────────────────────────────────────────────────

/// Recompute which systems are manned.
///
/// A system is manned by the first stationary crew member standing on its
/// room's manning tile. If nobody is, the first idle crew member elsewhere in
/// that room is sent to the tile.
pub fn recompute_manning(ship: &mut Ship) {
    let origin = ship.position;
    for crew in ship.crew.iter_mut().filter(|c| c.task == CrewTask::Manning) {
        crew.task = CrewTask::Idle;
    }

    for kind in SystemKind::ALL {
        let room_id = ship.systems.get(kind).room_id;
        let Some(room) = ship.rooms.iter().find(|r| r.id == room_id) else {
            ship.systems.get_mut(kind).manned = false;
            continue;
        };

        let on_station = ship.crew.iter().position(|c| {
            room.has_crew(c.id)
                && !c.is_moving()
                && geometry::is_on_manning_tile(c.position, room, origin)
        });
        if let Some(i) = on_station {
            ship.crew[i].task = CrewTask::Manning;
            ship.systems.get_mut(kind).manned = true;
            continue;
        }

        ship.systems.get_mut(kind).manned = false;
        let idle = ship.crew.iter().position(|c| {
            room.has_crew(c.id)
                && c.task == CrewTask::Idle
                && !geometry::is_on_manning_tile(c.position, room, origin)
        });
        if let Some(i) = idle {
            let crew = &mut ship.crew[i];
            crew.task = CrewTask::Moving;
            crew.target_room = Some(room.id);
            crew.path.clear();
            crew.door_waypoint = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{
        self, KESTREL_ENGINES, KESTREL_MEDBAY, KESTREL_PILOTING, KESTREL_SHIELDS, KESTREL_WEAPONS,
    };

    const MATT: CrewId = 1;
    const GRAFFIN: CrewId = 3;
    const DT: f32 = 0.05;

    fn run_until_idle(ship: &mut Ship, crew_id: CrewId) -> usize {
        for tick in 0..2_000 {
            tick_movement(ship, DT);
            if !ship.crew_member(crew_id).unwrap().is_moving() {
                return tick;
            }
        }
        panic!("crew #{crew_id} never stopped");
    }

    fn assert_occupancy(ship: &Ship) {
        for c in &ship.crew {
            assert!(ship.room(c.current_room).unwrap().has_crew(c.id));
        }
        for r in &ship.rooms {
            for id in &r.crew_in_room {
                assert_eq!(ship.crew_member(*id).unwrap().current_room, r.id);
            }
        }
    }

    #[test]
    fn test_walk_toward_is_axis_aligned() {
        let from = Position::new(0.0, 0.0);
        assert_eq!(walk_toward(from, Position::new(10.0, 3.0), 4.0), Position::new(4.0, 0.0));
        assert_eq!(walk_toward(from, Position::new(3.0, -10.0), 4.0), Position::new(0.0, -4.0));
        // Never overshoots
        assert_eq!(walk_toward(from, Position::new(2.0, 0.0), 4.0), Position::new(2.0, 0.0));
    }

    #[test]
    fn test_move_to_own_room_is_noop() {
        let mut ship = ships::kestrel().build();
        let before = ship.clone();
        assert!(plan_move(&mut ship, MATT, KESTREL_PILOTING));
        assert_eq!(ship, before);
    }

    #[test]
    fn test_plan_builds_path_excluding_current_room() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_ENGINES));
        let matt = ship.crew_member(MATT).unwrap();
        assert_eq!(matt.task, CrewTask::Moving);
        assert_eq!(matt.target_room, Some(KESTREL_ENGINES));
        assert_eq!(matt.path.len(), 3);
        assert_eq!(matt.path.back(), Some(&KESTREL_ENGINES));
        assert_ne!(matt.path.front(), Some(&KESTREL_PILOTING));
    }

    #[test]
    fn test_plan_rejects_unknown_and_unreachable() {
        let mut ship = ships::kestrel().build();
        let before = ship.clone();
        assert!(!plan_move(&mut ship, 99, KESTREL_ENGINES));
        assert!(!plan_move(&mut ship, MATT, 99));
        for d in ship.doors.iter_mut() {
            d.is_open = false;
        }
        let closed = ship.clone();
        assert!(!plan_move(&mut ship, MATT, KESTREL_ENGINES));
        assert_eq!(ship, closed);
        assert_ne!(ship, before);
    }

    #[test]
    fn test_walk_to_neighbour_room() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_MEDBAY));
        run_until_idle(&mut ship, MATT);

        let matt = ship.crew_member(MATT).unwrap();
        assert_eq!(matt.current_room, KESTREL_MEDBAY);
        assert_eq!(matt.task, CrewTask::Idle);
        assert!(matt.target_room.is_none());
        assert!(matt.path.is_empty());
        let medbay = ship.room(KESTREL_MEDBAY).unwrap();
        assert_eq!(matt.position, geometry::room_tile_position(medbay, ship.position, 0));
        assert!(!ship.room(KESTREL_PILOTING).unwrap().has_crew(MATT));
        assert_occupancy(&ship);
    }

    #[test]
    fn test_walk_across_ship() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_ENGINES));
        run_until_idle(&mut ship, MATT);
        let matt = ship.crew_member(MATT).unwrap();
        assert_eq!(matt.current_room, KESTREL_ENGINES);
        let engines = ship.room(KESTREL_ENGINES).unwrap();
        // Engines houses a system, so Matt takes the free manning tile
        assert!(geometry::is_on_manning_tile(matt.position, engines, ship.position));
        assert_occupancy(&ship);
    }

    #[test]
    fn test_closed_door_aborts_fresh_plan() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_MEDBAY));
        assert_eq!(ship.crew_member(MATT).unwrap().path, [KESTREL_MEDBAY]);
        let door = ship.door_between(KESTREL_PILOTING, KESTREL_MEDBAY).unwrap().id;
        let i = ship.door_index(door).unwrap();
        ship.doors[i].is_open = false;

        tick_movement(&mut ship, DT);
        let matt = ship.crew_member(MATT).unwrap();
        assert_eq!(matt.task, CrewTask::Idle);
        assert!(matt.path.is_empty());
        assert!(matt.target_room.is_none());
        assert_eq!(matt.current_room, KESTREL_PILOTING);
    }

    #[test]
    fn test_committed_crew_passes_closing_door() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_MEDBAY));
        tick_movement(&mut ship, DT);
        assert!(ship.crew_member(MATT).unwrap().door_waypoint.is_some());
        for d in ship.doors.iter_mut() {
            d.is_open = false;
        }
        run_until_idle(&mut ship, MATT);
        assert_eq!(ship.crew_member(MATT).unwrap().current_room, KESTREL_MEDBAY);
    }

    #[test]
    fn test_reroute_back_to_current_room() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_ENGINES));
        tick_movement(&mut ship, DT);
        tick_movement(&mut ship, DT);
        assert_eq!(ship.crew_member(MATT).unwrap().current_room, KESTREL_PILOTING);

        assert!(plan_move(&mut ship, MATT, KESTREL_PILOTING));
        let matt = ship.crew_member(MATT).unwrap();
        assert!(matt.path.is_empty());
        assert!(matt.door_waypoint.is_none());
        run_until_idle(&mut ship, MATT);
        assert_eq!(ship.crew_member(MATT).unwrap().current_room, KESTREL_PILOTING);
        assert_occupancy(&ship);
    }

    #[test]
    fn test_reroute_toward_next_room_target() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_ENGINES));
        let next = *ship.crew_member(MATT).unwrap().path.front().unwrap();
        assert!(plan_move(&mut ship, MATT, next));
        let matt = ship.crew_member(MATT).unwrap();
        assert!(matt.path.is_empty());
        assert_eq!(matt.target_room, Some(next));
        run_until_idle(&mut ship, MATT);
        assert_eq!(ship.crew_member(MATT).unwrap().current_room, next);
    }

    #[test]
    fn test_reroute_continues_through_next_room() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_SHIELDS));
        tick_movement(&mut ship, DT);
        let committed = ship.crew_member(MATT).unwrap().door_waypoint;
        assert!(committed.is_some());

        // Weapons is one hop from shields but two from piloting
        assert!(plan_move(&mut ship, MATT, KESTREL_WEAPONS));
        let matt = ship.crew_member(MATT).unwrap();
        assert_eq!(matt.current_room, KESTREL_PILOTING);
        assert_eq!(matt.path, [KESTREL_SHIELDS, KESTREL_WEAPONS]);
        assert_eq!(matt.door_waypoint, committed);

        run_until_idle(&mut ship, MATT);
        assert_eq!(ship.crew_member(MATT).unwrap().current_room, KESTREL_WEAPONS);
        assert_occupancy(&ship);
    }

    #[test]
    fn test_reroute_reachable_only_through_next_room() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_SHIELDS));
        tick_movement(&mut ship, DT);
        assert!(ship.crew_member(MATT).unwrap().door_waypoint.is_some());

        // Seal piloting behind Matt; medbay is now reachable only via shields
        for other in [KESTREL_SHIELDS, KESTREL_MEDBAY] {
            let door = ship.door_between(KESTREL_PILOTING, other).unwrap().id;
            let i = ship.door_index(door).unwrap();
            ship.doors[i].is_open = false;
        }

        assert!(plan_move(&mut ship, MATT, KESTREL_MEDBAY));
        assert_eq!(ship.crew_member(MATT).unwrap().path, [KESTREL_SHIELDS, KESTREL_MEDBAY]);
        run_until_idle(&mut ship, MATT);
        let matt = ship.crew_member(MATT).unwrap();
        assert_eq!(matt.current_room, KESTREL_MEDBAY);
        assert_eq!(matt.task, CrewTask::Idle);
        assert_occupancy(&ship);
    }

    #[test]
    fn test_reroute_with_no_route_keeps_old_plan() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_SHIELDS));
        tick_movement(&mut ship, DT);
        for d in ship.doors.iter_mut() {
            d.is_open = false;
        }
        let before = ship.clone();
        assert!(!plan_move(&mut ship, MATT, KESTREL_ENGINES));
        assert_eq!(ship, before);
        run_until_idle(&mut ship, MATT);
        assert_eq!(ship.crew_member(MATT).unwrap().current_room, KESTREL_SHIELDS);
    }

    #[test]
    fn test_idle_crew_walks_to_station() {
        let mut ship = ships::kestrel().build();
        recompute_manning(&mut ship);
        assert!(!ship.systems.weapons.manned);
        let graffin = ship.crew_member(GRAFFIN).unwrap();
        assert_eq!(graffin.task, CrewTask::Moving);
        assert_eq!(graffin.target_room, Some(KESTREL_WEAPONS));

        run_until_idle(&mut ship, GRAFFIN);
        recompute_manning(&mut ship);
        assert!(ship.systems.weapons.manned);
        assert_eq!(ship.crew_member(GRAFFIN).unwrap().task, CrewTask::Manning);
        assert_eq!(ship.crew_member(GRAFFIN).unwrap().current_room, KESTREL_WEAPONS);
    }

    #[test]
    fn test_manning_is_stable_across_recomputes() {
        let mut ship = ships::kestrel().build();
        recompute_manning(&mut ship);
        recompute_manning(&mut ship);
        assert!(ship.systems.piloting.manned);
        assert!(ship.systems.shields.manned);
        assert_eq!(ship.crew_member(MATT).unwrap().task, CrewTask::Manning);
    }

    #[test]
    fn test_leaving_station_unmans_system() {
        let mut ship = ships::kestrel().build();
        assert!(plan_move(&mut ship, MATT, KESTREL_MEDBAY));
        recompute_manning(&mut ship);
        // Still on the tile but walking away
        assert!(!ship.systems.piloting.manned);
        assert_eq!(ship.crew_member(MATT).unwrap().task, CrewTask::Moving);
    }

    #[test]
    fn test_first_idle_crew_is_sent_to_station() {
        let mut ship = ships::kestrel().build();
        // Put Matt in the weapons room alongside Graffin, off the manning tile
        let weapons = ship.room(KESTREL_WEAPONS).unwrap().clone();
        transfer_room(&mut ship, MATT, KESTREL_PILOTING, KESTREL_WEAPONS);
        let matt = ship.crew.iter_mut().find(|c| c.id == MATT).unwrap();
        matt.current_room = KESTREL_WEAPONS;
        matt.task = CrewTask::Idle;
        matt.position = geometry::room_tile_position(&weapons, ship.position, 3);

        recompute_manning(&mut ship);
        assert_eq!(ship.crew_member(MATT).unwrap().task, CrewTask::Moving);
        assert_eq!(ship.crew_member(GRAFFIN).unwrap().task, CrewTask::Idle);
        assert_occupancy(&ship);
    }
}
