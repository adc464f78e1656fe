use tracing::{debug, info, warn};

use crate::simulation::config::AgentConfig;
use crate::simulation::coordination::{AgentId, Gossip, MessageBus};
use crate::simulation::environment::World;
use crate::simulation::error::WorldError;
use crate::simulation::grid::{CellContent, Coord, Direction, ObjectId, ObjectKind, Rect, WorldObject};
use crate::simulation::memory::AreaMemory;
use crate::simulation::mode::{select_mode, Mode, ModeInputs};
use crate::simulation::planning::{assign_zones, ExplorationRoute, PathFinder, Zone, ZoneAssignment};

/// The action an agent commits to for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thought {
    Move(Direction),
    Pickup,
    Putdown,
    Refuel,
}

impl Thought {
    /// Holding position.
    pub const STAY: Self = Self::Move(Direction::Stay);
}

/// The physical state of an agent: where it is and what it has.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStatus {
    pub id: AgentId,
    pub pos: Coord,
    pub fuel: f64,
    /// Tiles currently carried, most recent last
    pub carried: Vec<ObjectId>,
    /// Holes filled so far
    pub score: u32,
}

/// A tile-world forager.
///
/// Each tick the agent senses its window, exchanges gossip, picks a mode and
/// commits to one action. It owns a single strip of the world, assigned once
/// every expected agent has announced itself, and sweeps that strip when it
/// has nothing better to do.
#[derive(Debug, Clone)]
pub struct ForagerAgent {
    pub status: AgentStatus,
    config: AgentConfig,
    memory: AreaMemory,
    gossip: Gossip,
    zones: Option<ZoneAssignment>,
    route: Option<ExplorationRoute>,
    mode: Mode,
    /// Destination for this tick; at most one goal is ever queued
    goal: Option<Coord>,
    /// Viable tiles in the zone, nearest first
    tiles: Vec<WorldObject>,
    /// Viable holes in the zone, nearest first
    holes: Vec<WorldObject>,
}

impl ForagerAgent {
    /// Creates an agent with full fuel for a `width` x `height` world.
    #[must_use]
    pub fn new(id: AgentId, pos: Coord, width: i32, height: i32, config: AgentConfig) -> Self {
        Self {
            status: AgentStatus {
                id,
                pos,
                fuel: config.max_fuel,
                carried: Vec::with_capacity(config.carry_capacity),
                score: 0,
            },
            memory: AreaMemory::new(width, height, config.sensor_range, config.object_lifetime),
            gossip: Gossip::new(id),
            zones: None,
            route: None,
            mode: Mode::Explore,
            goal: None,
            tiles: Vec::new(),
            holes: Vec::new(),
            config,
        }
    }

    /// Observes the sensor window and merges it into memory.
    pub fn sense(&mut self, world: &impl World) {
        let snapshot = world.sense(self.status.pos, self.config.sensor_range);
        self.memory.merge_sensor_window(&snapshot, world.now());
    }

    /// Publishes this agent's position and, if known, the fuel station.
    pub fn broadcast(&mut self, bus: &MessageBus) {
        self.gossip.broadcast(bus, self.status.pos, &self.memory);
    }

    /// Reads everything published to this agent since its last read.
    pub fn receive(&mut self, bus: &MessageBus) {
        self.gossip.receive(bus);
    }

    /// Broadcast then receive, for use outside the two-phase scheduler.
    pub fn communicate(&mut self, bus: &MessageBus) {
        self.gossip.communicate(bus, self.status.pos, &self.memory);
    }

    /// Decides this tick's action.
    ///
    /// Until the zone partition has happened the agent holds position. After
    /// that it refreshes its target lists, re-selects its mode, and either
    /// acts on what it is standing on or takes the first step toward the
    /// mode's destination.
    pub fn think(&mut self, world: &impl World, planner: &impl PathFinder) -> Thought {
        self.goal = None;
        if self.zones.is_none() && !self.try_partition(world) {
            debug!(
                agent = %self.status.id,
                heard = self.gossip.announced_count(),
                expected = self.config.agent_count,
                "waiting for announcements"
            );
            return Thought::STAY;
        }

        self.refresh_targets(world);
        let next = select_mode(&self.mode_inputs(), &self.config);
        if next != self.mode {
            debug!(agent = %self.status.id, from = %self.mode, to = %next, "mode change");
        }
        self.mode = next;

        if let Some(thought) = self.immediate_action(world) {
            return thought;
        }

        let Some(goal) = self.destination() else {
            return Thought::STAY;
        };
        self.goal = Some(goal);

        match planner.find_path(&self.memory, self.status.pos, goal) {
            Some(mut path) => path
                .pop_next()
                .map_or(Thought::STAY, |step| Thought::Move(step.direction)),
            None => {
                debug!(agent = %self.status.id, %goal, "no known path");
                Thought::STAY
            }
        }
    }

    /// Carries out `thought` against the world.
    ///
    /// A rejected action leaves the agent where it was; the rejection is
    /// logged and the next tick re-plans from scratch.
    pub fn act(&mut self, world: &mut impl World, thought: Thought) {
        let pos = self.status.pos;
        let result = match thought {
            Thought::Move(Direction::Stay) => Ok(()),
            Thought::Move(direction) => self.step(world, direction),
            Thought::Pickup => self.pickup(world),
            Thought::Putdown => self.putdown(world),
            Thought::Refuel => {
                if world.can_refuel(pos) {
                    self.status.fuel = self.config.max_fuel;
                    self.goal = None;
                    Ok(())
                } else {
                    Err(WorldError::NotAtFuelStation(pos))
                }
            }
        };

        if let Err(err) = result {
            warn!(agent = %self.status.id, ?thought, %err, "action rejected; holding position");
        }

        debug!(
            agent = %self.status.id,
            tick = world.now(),
            score = self.status.score,
            zone = ?self.zone().map(|z| z.index),
            mode = %self.mode,
            pos = %self.status.pos,
            goal = ?self.goal,
            tiles = self.status.carried.len(),
            fuel = self.status.fuel,
            station = ?self.gossip.fuel_station(),
            "status"
        );
    }

    fn step(&mut self, world: &mut impl World, direction: Direction) -> Result<(), WorldError> {
        if self.status.fuel <= 0.0 {
            return Err(WorldError::OutOfFuel(self.status.pos));
        }
        self.status.pos = world.move_agent(self.status.pos, direction)?;
        self.status.fuel -= 1.0;
        Ok(())
    }

    fn pickup(&mut self, world: &mut impl World) -> Result<(), WorldError> {
        let pos = self.status.pos;
        if self.status.carried.len() >= self.config.carry_capacity {
            return Err(WorldError::CapacityReached(pos, self.config.carry_capacity));
        }
        let tile = world.pickup_tile(pos)?;
        self.status.carried.push(tile);
        self.memory.forget(pos);
        self.goal = None;
        Ok(())
    }

    fn putdown(&mut self, world: &mut impl World) -> Result<(), WorldError> {
        let pos = self.status.pos;
        if self.status.carried.is_empty() {
            return Err(WorldError::NotCarrying(pos));
        }
        world.putdown_tile(pos)?;
        self.status.carried.pop();
        self.status.score += 1;
        self.memory.forget(pos);
        self.goal = None;
        Ok(())
    }

    fn try_partition(&mut self, world: &impl World) -> bool {
        if self.gossip.announced_count() < self.config.agent_count {
            return false;
        }
        let (width, height) = world.dimensions();
        let assignment = assign_zones(width, height, self.gossip.positions());
        let Some(zone) = assignment.zone_of(self.status.id).copied() else {
            warn!(agent = %self.status.id, "no strip left for this agent");
            return false;
        };
        info!(
            agent = %self.status.id,
            zone = zone.index,
            axis = ?assignment.axis,
            corners = ?zone.corners(),
            "zone assigned"
        );
        self.route = Some(ExplorationRoute::new(
            zone.rect,
            assignment.axis,
            self.config.sensor_range,
        ));
        self.zones = Some(assignment);
        true
    }

    /// Rebuilds the tile and hole lists, keeping only objects expected to
    /// outlive the trip to them.
    fn refresh_targets(&mut self, world: &impl World) {
        let Some(rect) = self.zone_rect() else {
            return;
        };
        let now = world.now();
        let pos = self.status.pos;
        let threshold = self.config.lifetime_threshold;
        let viable = |memory: &AreaMemory, kind| {
            memory
                .objects_in_zone(&rect, kind, pos)
                .into_iter()
                .filter(|o| {
                    memory.estimated_remaining_life(o, threshold, now)
                        > f64::from(pos.manhattan(o.pos))
                })
                .collect::<Vec<_>>()
        };
        self.tiles = viable(&self.memory, ObjectKind::Tile);
        self.holes = viable(&self.memory, ObjectKind::Hole);
    }

    fn mode_inputs(&self) -> ModeInputs {
        let pos = self.status.pos;
        ModeInputs {
            previous: self.mode,
            fuel: self.status.fuel,
            station_distance: self.gossip.fuel_station().map(|s| pos.manhattan(s)),
            zone_fully_visited: self
                .zone_rect()
                .is_some_and(|rect| self.memory.is_zone_fully_visited(&rect)),
            carried: self.status.carried.len(),
            nearest_tile: self.tiles.first().map(|o| pos.manhattan(o.pos)),
            nearest_hole: self.holes.first().map(|o| pos.manhattan(o.pos)),
        }
    }

    /// Acts on whatever the agent is standing on, overriding the mode.
    fn immediate_action(&mut self, world: &impl World) -> Option<Thought> {
        let pos = self.status.pos;
        match self.memory.cell(pos) {
            CellContent::Tile(id)
                if self.status.carried.len() < self.config.carry_capacity
                    && world.can_pickup(id, pos) =>
            {
                Some(Thought::Pickup)
            }
            CellContent::Hole(id) if !self.status.carried.is_empty() && world.can_putdown(id, pos) => {
                Some(Thought::Putdown)
            }
            CellContent::FuelStation
                if self.status.fuel < self.config.max_fuel * self.config.refuel_fraction
                    && world.can_refuel(pos) =>
            {
                self.mode = Mode::Explore;
                Some(Thought::Refuel)
            }
            _ => None,
        }
    }

    fn destination(&mut self) -> Option<Coord> {
        match self.mode {
            Mode::Wait => None,
            Mode::Refuel => self.gossip.fuel_station(),
            Mode::Collect => self.tiles.first().map(|o| o.pos),
            Mode::Fill => self.holes.first().map(|o| o.pos),
            Mode::Explore => {
                let pos = self.status.pos;
                self.route
                    .as_mut()
                    .and_then(|route| route.next_destination(pos, &self.memory))
            }
        }
    }

    fn zone_rect(&self) -> Option<Rect> {
        self.zone().map(|z| z.rect)
    }

    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.status.id
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn goal(&self) -> Option<Coord> {
        self.goal
    }

    /// This agent's strip, once partitioning has happened.
    #[must_use]
    pub fn zone(&self) -> Option<&Zone> {
        self.zones.as_ref().and_then(|z| z.zone_of(self.status.id))
    }

    #[must_use]
    pub const fn zone_assignment(&self) -> Option<&ZoneAssignment> {
        self.zones.as_ref()
    }

    #[must_use]
    pub const fn memory(&self) -> &AreaMemory {
        &self.memory
    }

    #[must_use]
    pub const fn gossip(&self) -> &Gossip {
        &self.gossip
    }

    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Tiles currently considered worth collecting, nearest first.
    #[must_use]
    pub fn candidate_tiles(&self) -> &[WorldObject] {
        &self.tiles
    }

    /// Holes currently considered worth filling, nearest first.
    #[must_use]
    pub fn candidate_holes(&self) -> &[WorldObject] {
        &self.holes
    }

    #[must_use]
    pub const fn fuel_station(&self) -> Option<Coord> {
        self.gossip.fuel_station()
    }
}
