//! Behaviour of a single forager in small, hand-built worlds.

use tileworld_rust::simulation::agent::{ForagerAgent, Thought};
use tileworld_rust::simulation::config::{AgentConfig, WorldConfig};
use tileworld_rust::simulation::coordination::AgentId;
use tileworld_rust::simulation::environment::GridWorld;
use tileworld_rust::simulation::grid::{Coord, Direction, ObjectKind};
use tileworld_rust::simulation::{Mode, Simulation};

const EPSILON: f64 = 1e-10;

fn quiet_world(width: i32, height: i32, station: Coord) -> GridWorld {
    let config = WorldConfig {
        width,
        height,
        tile_spawn_rate: 0.0,
        hole_spawn_rate: 0.0,
        obstacle_spawn_rate: 0.0,
        ..WorldConfig::default()
    };
    GridWorld::with_fuel_station(&config, station)
}

fn solo() -> AgentConfig {
    AgentConfig {
        agent_count: 1,
        ..AgentConfig::default()
    }
}

#[test]
fn test_agent_initialization() {
    let agent = ForagerAgent::new(AgentId(0), Coord::new(3, 4), 20, 20, solo());
    assert_eq!(agent.status.pos, Coord::new(3, 4));
    assert!((agent.status.fuel - 500.0).abs() < EPSILON);
    assert!(agent.status.carried.is_empty());
    assert_eq!(agent.status.score, 0);
    assert_eq!(agent.mode(), Mode::Explore);
    assert!(agent.zone().is_none());
}

#[test]
fn test_collect_then_fill() {
    let mut world = quiet_world(10, 10, Coord::new(0, 0));
    world.place(ObjectKind::Tile, Coord::new(2, 1)).unwrap();
    world.place(ObjectKind::Hole, Coord::new(4, 1)).unwrap();
    let mut sim = Simulation::from_world(world, &[Coord::new(1, 1)], &solo()).unwrap();

    // Step onto the tile.
    sim.step();
    assert_eq!(sim.agents[0].mode(), Mode::Collect);
    assert_eq!(sim.agents[0].status.pos, Coord::new(2, 1));

    // Pick it up.
    sim.step();
    assert_eq!(sim.agents[0].status.carried.len(), 1);
    assert_eq!(sim.world.count(ObjectKind::Tile), 0);

    // Two moves to the hole, then fill it.
    sim.step();
    assert_eq!(sim.agents[0].mode(), Mode::Fill);
    sim.step();
    sim.step();

    let agent = &sim.agents[0];
    assert_eq!(agent.status.score, 1);
    assert!(agent.status.carried.is_empty());
    assert_eq!(sim.world.count(ObjectKind::Hole), 0);
    assert!((agent.status.fuel - 497.0).abs() < EPSILON);
}

#[test]
fn test_low_fuel_detours_to_station() {
    let world = quiet_world(10, 10, Coord::new(3, 1));
    let mut sim = Simulation::from_world(world, &[Coord::new(1, 1)], &solo()).unwrap();
    sim.agents[0].status.fuel = 10.0;

    sim.step();
    assert_eq!(sim.agents[0].mode(), Mode::Refuel);
    sim.step();
    assert_eq!(sim.agents[0].status.pos, Coord::new(3, 1));
    sim.step();

    let agent = &sim.agents[0];
    assert!((agent.status.fuel - 500.0).abs() < EPSILON);
    assert_eq!(agent.mode(), Mode::Explore);
}

#[test]
fn test_short_lived_tiles_are_ignored() {
    let mut world = quiet_world(10, 10, Coord::new(0, 0));
    world.place(ObjectKind::Tile, Coord::new(4, 4)).unwrap();
    world.place(ObjectKind::Tile, Coord::new(2, 1)).unwrap();
    let config = AgentConfig {
        object_lifetime: 5,
        lifetime_threshold: 1.0,
        ..solo()
    };
    let mut sim = Simulation::from_world(world, &[Coord::new(1, 1)], &config).unwrap();

    sim.step();
    let agent = &sim.agents[0];
    // (4, 4) is 6 moves away but only expected to last 5 more ticks.
    assert_eq!(agent.candidate_tiles().len(), 1);
    assert_eq!(agent.candidate_tiles()[0].pos, Coord::new(2, 1));
    assert_eq!(agent.mode(), Mode::Collect);
}

#[test]
fn test_tile_expiring_on_arrival_is_ignored() {
    let mut world = quiet_world(10, 10, Coord::new(0, 0));
    world.place(ObjectKind::Tile, Coord::new(4, 3)).unwrap();
    world.place(ObjectKind::Tile, Coord::new(3, 1)).unwrap();
    let config = AgentConfig {
        object_lifetime: 5,
        lifetime_threshold: 1.0,
        ..solo()
    };
    let mut sim = Simulation::from_world(world, &[Coord::new(1, 1)], &config).unwrap();

    sim.step();
    let agent = &sim.agents[0];
    // (4, 3) is exactly 5 moves away with 5 ticks of expected life left.
    assert_eq!(agent.candidate_tiles().len(), 1);
    assert_eq!(agent.candidate_tiles()[0].pos, Coord::new(3, 1));
}

#[test]
fn test_blocked_move_holds_position() {
    let mut world = quiet_world(10, 10, Coord::new(9, 9));
    world.add_agent(Coord::new(2, 2)).unwrap();
    world.place(ObjectKind::Obstacle, Coord::new(3, 2)).unwrap();
    let mut agent = ForagerAgent::new(AgentId(0), Coord::new(2, 2), 10, 10, solo());

    agent.act(&mut world, Thought::Move(Direction::East));
    assert_eq!(agent.status.pos, Coord::new(2, 2));
    assert!((agent.status.fuel - 500.0).abs() < EPSILON);

    agent.act(&mut world, Thought::Move(Direction::South));
    assert_eq!(agent.status.pos, Coord::new(2, 3));
    assert!((agent.status.fuel - 499.0).abs() < EPSILON);
}

#[test]
fn test_illegal_actions_change_nothing() {
    let mut world = quiet_world(10, 10, Coord::new(9, 9));
    world.add_agent(Coord::new(2, 2)).unwrap();
    let mut agent = ForagerAgent::new(AgentId(0), Coord::new(2, 2), 10, 10, solo());
    agent.status.fuel = 40.0;

    agent.act(&mut world, Thought::Pickup);
    agent.act(&mut world, Thought::Putdown);
    agent.act(&mut world, Thought::Refuel);

    assert!(agent.status.carried.is_empty());
    assert_eq!(agent.status.score, 0);
    assert!((agent.status.fuel - 40.0).abs() < EPSILON);
}

#[test]
fn test_empty_tank_cannot_move() {
    let mut world = quiet_world(10, 10, Coord::new(9, 9));
    world.add_agent(Coord::new(2, 2)).unwrap();
    let mut agent = ForagerAgent::new(AgentId(0), Coord::new(2, 2), 10, 10, solo());
    agent.status.fuel = 0.0;

    agent.act(&mut world, Thought::Move(Direction::North));
    assert_eq!(agent.status.pos, Coord::new(2, 2));
    assert!(world.has_agent(Coord::new(2, 2)));
}

#[test]
fn test_holds_until_everyone_announced() {
    let world = quiet_world(20, 10, Coord::new(19, 9));
    let config = AgentConfig {
        agent_count: 3,
        ..AgentConfig::default()
    };
    let starts = [Coord::new(1, 1), Coord::new(10, 5)];
    let mut sim = Simulation::from_world(world, &starts, &config).unwrap();

    for _ in 0..3 {
        sim.step();
    }
    for (agent, start) in sim.agents.iter().zip(starts) {
        assert!(agent.zone().is_none());
        assert_eq!(agent.status.pos, start);
    }
}
