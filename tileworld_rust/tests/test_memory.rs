//! Tests for the agent's area memory.

use proptest::prelude::*;
use tileworld_rust::simulation::environment::SensorSnapshot;
use tileworld_rust::simulation::grid::{CellContent, Coord, ObjectId, ObjectKind, Rect, WorldObject};
use tileworld_rust::simulation::memory::AreaMemory;

const EPSILON: f64 = 1e-10;

fn object(id: u64, kind: ObjectKind, x: i32, y: i32) -> WorldObject {
    WorldObject {
        id: ObjectId(id),
        kind,
        pos: Coord::new(x, y),
        created_at: 0,
        expires_at: None,
    }
}

fn see(memory: &mut AreaMemory, origin: Coord, objects: Vec<WorldObject>, now: u64) {
    let snapshot = SensorSnapshot {
        origin,
        range: memory.sensor_range(),
        objects,
        agents: Vec::new(),
    };
    memory.merge_sensor_window(&snapshot, now);
}

// ============== Belief Grid Tests ==============

#[test]
fn test_fresh_memory_blocks_nothing() {
    let memory = AreaMemory::new(50, 50, 3, 100);
    assert!(!memory.is_cell_blocked(5, 5));
    assert!(!memory.is_cell_blocked(-1, 5));
    assert!(memory.is_empty());
    assert_eq!(memory.fuel_station(), None);
}

#[test]
fn test_obstacle_blocks_cell() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    see(&mut memory, Coord::new(5, 5), vec![object(1, ObjectKind::Obstacle, 6, 5)], 0);
    assert!(memory.is_cell_blocked(6, 5));
    assert_eq!(memory.cell(Coord::new(6, 5)), CellContent::Obstacle);
}

#[test]
fn test_discovery_tick_survives_resighting() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    let tile = object(7, ObjectKind::Tile, 4, 4);
    see(&mut memory, Coord::new(5, 5), vec![tile], 3);
    see(&mut memory, Coord::new(5, 5), vec![tile], 9);
    assert_eq!(memory.percept(Coord::new(4, 4)).map(|p| p.discovered_at), Some(3));

    // A different object in the same cell is a new discovery.
    let replacement = object(8, ObjectKind::Hole, 4, 4);
    see(&mut memory, Coord::new(5, 5), vec![replacement], 12);
    assert_eq!(memory.percept(Coord::new(4, 4)).map(|p| p.discovered_at), Some(12));
}

#[test]
fn test_fuel_station_is_never_forgotten() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    see(&mut memory, Coord::new(5, 5), vec![object(0, ObjectKind::FuelStation, 7, 7)], 0);
    see(&mut memory, Coord::new(5, 5), Vec::new(), 1);
    assert_eq!(memory.fuel_station(), Some(Coord::new(7, 7)));
}

#[test]
fn test_estimated_remaining_life() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    let tile = object(1, ObjectKind::Tile, 5, 6);
    see(&mut memory, Coord::new(5, 5), vec![tile], 10);

    let life = memory.estimated_remaining_life(&tile, 0.9, 30);
    assert!((life - 70.0).abs() < EPSILON);

    let unknown = object(2, ObjectKind::Tile, 15, 15);
    assert!(memory.estimated_remaining_life(&unknown, 0.9, 30).abs() < EPSILON);

    // Same cell, different object: the one asked about is not remembered.
    let stranger = object(3, ObjectKind::Tile, 5, 6);
    assert!(memory.estimated_remaining_life(&stranger, 0.9, 30).abs() < EPSILON);
}

// ============== Search Tests ==============

#[test]
fn test_nearby_prefers_fresh_objects() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    let old = object(1, ObjectKind::Tile, 5, 6);
    let new = object(2, ObjectKind::Tile, 7, 5);
    see(&mut memory, Coord::new(5, 5), vec![old], 0);
    see(&mut memory, Coord::new(5, 5), vec![old, new], 10);

    // The older tile is nearer but too stale.
    let found = memory.nearby_object(Coord::new(5, 5), 5, ObjectKind::Tile, 12);
    assert_eq!(found.map(|o| o.id), Some(ObjectId(2)));

    // Nothing fresh enough: fall back to the latest discovery.
    let found = memory.nearby_object(Coord::new(5, 5), 1, ObjectKind::Tile, 12);
    assert_eq!(found.map(|o| o.id), Some(ObjectId(2)));

    assert!(memory.nearby_object(Coord::new(5, 5), 5, ObjectKind::Hole, 12).is_none());
}

#[test]
fn test_nearby_finds_objects_seen_on_first_tick() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    see(&mut memory, Coord::new(5, 5), vec![object(1, ObjectKind::Hole, 6, 6)], 0);
    let found = memory.nearby_object(Coord::new(5, 5), 0, ObjectKind::Hole, 0);
    assert_eq!(found.map(|o| o.id), Some(ObjectId(1)));
}

#[test]
fn test_objects_in_zone_sorted_by_distance() {
    let mut memory = AreaMemory::new(20, 20, 5, 100);
    see(
        &mut memory,
        Coord::new(4, 4),
        vec![
            object(5, ObjectKind::Tile, 2, 2),
            object(3, ObjectKind::Tile, 8, 8),
            object(9, ObjectKind::Tile, 1, 1),
            object(4, ObjectKind::Hole, 3, 3),
            object(0, ObjectKind::FuelStation, 0, 0),
        ],
        0,
    );

    let zone = Rect::new(0, 10, 0, 10);
    let tiles: Vec<_> = memory
        .objects_in_zone(&zone, ObjectKind::Tile, Coord::new(0, 0))
        .iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(tiles, vec![ObjectId(9), ObjectId(5), ObjectId(3)]);

    let left_half = Rect::new(0, 5, 0, 10);
    assert_eq!(memory.objects_in_zone(&left_half, ObjectKind::Tile, Coord::new(0, 0)).len(), 2);
    assert!(memory
        .objects_in_zone(&zone, ObjectKind::FuelStation, Coord::new(0, 0))
        .is_empty());
}

#[test]
fn test_zone_fully_visited() {
    let mut memory = AreaMemory::new(6, 6, 3, 100);
    let zone = Rect::new(0, 6, 0, 6);
    assert!(!memory.is_zone_fully_visited(&zone));
    see(&mut memory, Coord::new(2, 2), Vec::new(), 0);
    assert!(memory.is_zone_fully_visited(&zone));
    assert_eq!(memory.visited_count(), 36);
}


#[test]
fn test_visited_cells_stay_visited() {
    let mut memory = AreaMemory::new(20, 20, 3, 100);
    see(&mut memory, Coord::new(3, 3), Vec::new(), 0);
    see(&mut memory, Coord::new(15, 15), Vec::new(), 1);
    see(&mut memory, Coord::new(3, 15), Vec::new(), 2);

    for y in 0..=6 {
        for x in 0..=6 {
            assert!(memory.is_visited(Coord::new(x, y)), "({x}, {y}) was unvisited");
        }
    }
    assert!(!memory.is_visited(Coord::new(9, 9)));
    assert_eq!(memory.visited_count(), 3 * 49);
}

proptest! {
    #[test]
    fn prop_visited_is_monotonic(
        origins in proptest::collection::vec((0i32..25, 0i32..25), 1..12),
    ) {
        let mut memory = AreaMemory::new(25, 25, 3, 100);
        let mut seen: Vec<Coord> = Vec::new();
        for (tick, &(x, y)) in origins.iter().enumerate() {
            let origin = Coord::new(x, y);
            see(&mut memory, origin, Vec::new(), tick as u64);
            for dy in -3..=3 {
                for dx in -3..=3 {
                    let c = origin.offset(dx, dy);
                    if (0..25).contains(&c.x) && (0..25).contains(&c.y) {
                        seen.push(c);
                    }
                }
            }
            for &c in &seen {
                prop_assert!(memory.is_visited(c));
            }
        }
        seen.sort();
        seen.dedup();
        prop_assert_eq!(memory.visited_count(), seen.len());
    }
}
