//! Room-graph pathfinding for crew movement.
//!
//! Rooms are nodes; two rooms are adjacent when an **open** door joins
//! them. Every room transition costs 1. A* orders the frontier by hop count
//! plus the Manhattan distance between room grid origins. That heuristic is
//! exact enough for the shipped layouts but is not guaranteed admissible for
//! arbitrary layouts, so a very irregular ship may get a longer-than-minimal
//! route.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::model::{Door, Room, RoomId};

/// Rooms reachable from `room` through one open door.
pub fn neighbors(room: RoomId, doors: &[Door]) -> impl Iterator<Item = RoomId> + '_ {
    doors
        .iter()
        .filter(|d| d.is_open)
        .filter_map(move |d| d.other_side(room))
}

/// Find a path from `start` to `end` via A*.
///
/// Returns the room ids from `start` to `end` inclusive. Returns an empty
/// vec if `start == end`, if either room is unknown, or if no route of open
/// doors exists.
pub fn find_path(start: RoomId, end: RoomId, rooms: &[Room], doors: &[Door]) -> Vec<RoomId> {
    if start == end {
        return Vec::new();
    }

    let grid: HashMap<RoomId, (i32, i32)> = rooms
        .iter()
        .map(|r| (r.id, (r.grid_x, r.grid_y)))
        .collect();
    if !grid.contains_key(&start) {
        return Vec::new();
    }
    let Some(&(goal_x, goal_y)) = grid.get(&end) else {
        return Vec::new();
    };
    let heuristic = |room: RoomId| -> u32 {
        grid.get(&room)
            .map_or(0, |&(x, y)| x.abs_diff(goal_x).saturating_add(y.abs_diff(goal_y)))
    };

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<RoomId, RoomId> = HashMap::new();
    let mut g_score: HashMap<RoomId, u32> = HashMap::new();
    g_score.insert(start, 0);
    open.push(Reverse((heuristic(start), start)));

    while let Some(Reverse((_, current))) = open.pop() {
        if current == end {
            return reconstruct(&came_from, current);
        }
        let g = g_score.get(&current).copied().unwrap_or(u32::MAX);

        for next in neighbors(current, doors) {
            if !grid.contains_key(&next) {
                continue;
            }
            let tentative = g.saturating_add(1);
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                open.push(Reverse((tentative.saturating_add(heuristic(next)), next)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<RoomId, RoomId>, end: RoomId) -> Vec<RoomId> {
    let mut path = vec![end];
    let mut node = end;
    while let Some(&prev) = came_from.get(&node) {
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}
