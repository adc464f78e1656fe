use tileworld_rust::simulation::config::WorldConfig;
use tileworld_rust::simulation::environment::{GridWorld, World};
use tileworld_rust::simulation::error::WorldError;
use tileworld_rust::simulation::grid::{Coord, Direction, ObjectId, ObjectKind};
use tileworld_rust::simulation::params::{WORLD_HEIGHT, WORLD_WIDTH};

fn quiet_config() -> WorldConfig {
    WorldConfig {
        width: 12,
        height: 12,
        tile_spawn_rate: 0.0,
        hole_spawn_rate: 0.0,
        obstacle_spawn_rate: 0.0,
        ..WorldConfig::default()
    }
}

#[test]
fn test_world_initialization() {
    let world = GridWorld::new(&WorldConfig::default());
    assert_eq!(world.dimensions(), (WORLD_WIDTH, WORLD_HEIGHT));
    assert_eq!(world.now(), 0);
    assert!(world.in_bounds(world.fuel_station()));
    assert_eq!(world.count(ObjectKind::FuelStation), 1);
    assert_eq!(world.objects().count(), 1);
}

#[test]
fn test_sense_returns_window_only() {
    let mut world = GridWorld::with_fuel_station(&quiet_config(), Coord::new(11, 11));
    world.place(ObjectKind::Tile, Coord::new(5, 5)).unwrap();
    world.place(ObjectKind::Hole, Coord::new(8, 5)).unwrap();
    world.place(ObjectKind::Obstacle, Coord::new(9, 5)).unwrap();
    world.add_agent(Coord::new(5, 6)).unwrap();
    world.add_agent(Coord::new(3, 3)).unwrap();

    let snapshot = world.sense(Coord::new(5, 6), 3);
    let mut kinds: Vec<ObjectKind> = snapshot.objects.iter().map(|o| o.kind).collect();
    kinds.sort();
    assert_eq!(kinds, vec![ObjectKind::Tile, ObjectKind::Hole]);
    // The sensing agent does not see itself.
    assert_eq!(snapshot.agents, vec![Coord::new(3, 3)]);
}

#[test]
fn test_sense_at_corner_is_clipped() {
    let world = GridWorld::with_fuel_station(&quiet_config(), Coord::new(0, 0));
    let snapshot = world.sense(Coord::new(1, 1), 3);
    assert_eq!(snapshot.objects.len(), 1);
    assert_eq!(snapshot.objects[0].kind, ObjectKind::FuelStation);
}

#[test]
fn test_spawning_respects_bounds_and_lifetime() {
    let mut world = GridWorld::new(&WorldConfig::default());
    for _ in 0..500 {
        world.update();
    }
    assert_eq!(world.now(), 500);
    assert_eq!(world.count(ObjectKind::FuelStation), 1);
    assert!(world.count(ObjectKind::Tile) > 0);
    for object in world.objects() {
        assert!(world.in_bounds(object.pos));
        assert!(!object.is_expired(world.now()), "{:?} outlived its lifetime", object.id);
    }
}

#[test]
fn test_legality_checks() {
    let mut world = GridWorld::with_fuel_station(&quiet_config(), Coord::new(6, 6));
    let tile = world.place(ObjectKind::Tile, Coord::new(2, 2)).unwrap();
    let hole = world.place(ObjectKind::Hole, Coord::new(3, 3)).unwrap();

    assert!(world.can_pickup(tile, Coord::new(2, 2)));
    assert!(!world.can_pickup(ObjectId(999), Coord::new(2, 2)));
    assert!(!world.can_pickup(hole, Coord::new(3, 3)));
    assert!(world.can_putdown(hole, Coord::new(3, 3)));
    assert!(world.can_refuel(Coord::new(6, 6)));
    assert!(!world.can_refuel(Coord::new(6, 5)));
}

#[test]
fn test_agents_block_each_other() {
    let mut world = GridWorld::with_fuel_station(&quiet_config(), Coord::new(11, 0));
    world.add_agent(Coord::new(4, 4)).unwrap();
    world.add_agent(Coord::new(5, 4)).unwrap();
    assert_eq!(
        world.move_agent(Coord::new(4, 4), Direction::East),
        Err(WorldError::CellBlocked(Coord::new(5, 4)))
    );
    assert_eq!(world.add_agent(Coord::new(4, 4)), Err(WorldError::CellBlocked(Coord::new(4, 4))));
}

#[test]
fn test_agents_may_stand_on_objects() {
    let mut world = GridWorld::with_fuel_station(&quiet_config(), Coord::new(5, 4));
    world.place(ObjectKind::Tile, Coord::new(3, 4)).unwrap();
    world.add_agent(Coord::new(2, 4)).unwrap();
    let pos = world.move_agent(Coord::new(2, 4), Direction::East).unwrap();
    assert_eq!(pos, Coord::new(3, 4));
    let pos = world.move_agent(pos, Direction::East).unwrap();
    let pos = world.move_agent(pos, Direction::East).unwrap();
    assert_eq!(pos, world.fuel_station());
}

#[test]
fn test_random_free_cell() {
    let mut world = GridWorld::new(&WorldConfig::default());
    for _ in 0..50 {
        world.update();
    }
    for _ in 0..10 {
        let cell = world.random_free_cell().unwrap();
        assert!(world.object_at(cell).is_none());
        assert!(!world.has_agent(cell));
        world.add_agent(cell).unwrap();
    }
}
