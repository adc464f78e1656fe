use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::simulation::config::WorldConfig;
use crate::simulation::error::WorldError;
use crate::simulation::grid::{Coord, Direction, ObjectId, ObjectKind, Tick, WorldObject};

/// Everything an agent observed during one sensing pass.
#[derive(Clone, Debug, Default)]
pub struct SensorSnapshot {
    /// The sensing agent's position; the window is centred here
    pub origin: Coord,
    /// Chebyshev radius of the window
    pub range: i32,
    pub objects: Vec<WorldObject>,
    /// Positions of other agents inside the window
    pub agents: Vec<Coord>,
}

/// The environment as seen by a forager agent.
///
/// The simulation engine owns the clock, physical movement and legality
/// checks; agents only query and request through this trait.
pub trait World {
    /// Width and height of the grid.
    fn dimensions(&self) -> (i32, i32);

    fn now(&self) -> Tick;

    fn in_bounds(&self, c: Coord) -> bool {
        let (width, height) = self.dimensions();
        c.x >= 0 && c.y >= 0 && c.x < width && c.y < height
    }

    /// Observes the square window of radius `range` around `at`.
    fn sense(&self, at: Coord, range: i32) -> SensorSnapshot;

    fn can_pickup(&self, tile: ObjectId, agent: Coord) -> bool;

    fn can_putdown(&self, hole: ObjectId, agent: Coord) -> bool;

    fn can_refuel(&self, agent: Coord) -> bool;

    /// Moves the agent standing at `from` one cell and returns its new position.
    fn move_agent(&mut self, from: Coord, direction: Direction) -> Result<Coord, WorldError>;

    /// Removes the tile under the agent and hands over its id.
    fn pickup_tile(&mut self, at: Coord) -> Result<ObjectId, WorldError>;

    /// Fills the hole under the agent with a carried tile.
    fn putdown_tile(&mut self, at: Coord) -> Result<ObjectId, WorldError>;
}

/// Reference tile world: a seeded grid where tiles, holes and obstacles
/// appear at random and vanish after a fixed lifetime.
///
/// There is exactly one fuel station, placed at construction, which never
/// expires.
#[derive(Debug, Clone)]
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    cells: Vec<Option<WorldObject>>,
    agents: HashSet<Coord>,
    fuel_station: Coord,
    tick: Tick,
    next_id: u64,
    config: WorldConfig,
    rng: StdRng,
}

impl GridWorld {
    /// Creates a world with the fuel station at a random cell.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let station = Coord::new(
            rng.random_range(0..config.width),
            rng.random_range(0..config.height),
        );
        Self::build(config, station, rng)
    }

    /// Creates an empty world with the fuel station at a known cell.
    #[must_use]
    pub fn with_fuel_station(config: &WorldConfig, station: Coord) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::build(config, station, rng)
    }

    fn build(config: &WorldConfig, station: Coord, rng: StdRng) -> Self {
        let len = usize::try_from(config.width * config.height).unwrap_or(0);
        let mut world = Self {
            width: config.width,
            height: config.height,
            cells: vec![None; len],
            agents: HashSet::new(),
            fuel_station: station,
            tick: 0,
            next_id: 0,
            config: config.clone(),
            rng,
        };
        world.insert(ObjectKind::FuelStation, station, None);
        world
    }

    fn index(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            usize::try_from(c.y * self.width + c.x).ok()
        } else {
            None
        }
    }

    fn insert(&mut self, kind: ObjectKind, pos: Coord, expires_at: Option<Tick>) -> Option<ObjectId> {
        let idx = self.index(pos)?;
        if self.cells[idx].is_some() {
            return None;
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.cells[idx] = Some(WorldObject {
            id,
            kind,
            pos,
            created_at: self.tick,
            expires_at,
        });
        Some(id)
    }

    /// Places an object with the configured lifetime. Returns `None` when the
    /// cell is taken, out of bounds, or `kind` is a second fuel station.
    pub fn place(&mut self, kind: ObjectKind, pos: Coord) -> Option<ObjectId> {
        if kind == ObjectKind::FuelStation {
            return None;
        }
        let expires = self.tick + self.config.object_lifetime;
        self.insert(kind, pos, Some(expires))
    }

    /// Registers an agent body at `pos`.
    pub fn add_agent(&mut self, pos: Coord) -> Result<(), WorldError> {
        if !self.in_bounds(pos) {
            return Err(WorldError::OutOfBounds(pos));
        }
        if self.agents.contains(&pos) || self.is_obstacle(pos) {
            return Err(WorldError::CellBlocked(pos));
        }
        self.agents.insert(pos);
        Ok(())
    }

    /// Draws random cells until one holds neither an object nor an agent.
    pub fn random_free_cell(&mut self) -> Option<Coord> {
        for _ in 0..64 {
            let pos = Coord::new(
                self.rng.random_range(0..self.width),
                self.rng.random_range(0..self.height),
            );
            if self.object_at(pos).is_none() && !self.agents.contains(&pos) {
                return Some(pos);
            }
        }
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .filter_map(|(i, _)| i32::try_from(i).ok())
            .map(|i| Coord::new(i % self.width, i / self.width))
            .find(|c| !self.agents.contains(c))
    }

    #[must_use]
    pub fn object_at(&self, c: Coord) -> Option<&WorldObject> {
        self.index(c).and_then(|i| self.cells[i].as_ref())
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.cells.iter().flatten()
    }

    #[must_use]
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects().filter(|o| o.kind == kind).count()
    }

    #[must_use]
    pub const fn fuel_station(&self) -> Coord {
        self.fuel_station
    }

    #[must_use]
    pub fn has_agent(&self, c: Coord) -> bool {
        self.agents.contains(&c)
    }

    fn is_obstacle(&self, c: Coord) -> bool {
        self.object_at(c).is_some_and(|o| o.kind == ObjectKind::Obstacle)
    }

    /// Advances the clock, removes expired objects and spawns new ones.
    pub fn update(&mut self) {
        self.tick += 1;
        let now = self.tick;
        for cell in &mut self.cells {
            if cell.is_some_and(|o| o.is_expired(now)) {
                *cell = None;
            }
        }

        let rates = [
            (ObjectKind::Tile, self.config.tile_spawn_rate),
            (ObjectKind::Hole, self.config.hole_spawn_rate),
            (ObjectKind::Obstacle, self.config.obstacle_spawn_rate),
        ];
        for (kind, rate) in rates {
            for _ in 0..self.spawn_count(rate) {
                self.spawn(kind);
            }
        }
    }

    /// Integer part of the rate always spawns; the fraction spawns with that probability.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn spawn_count(&mut self, rate: f64) -> usize {
        if !rate.is_finite() || rate <= 0.0 {
            return 0;
        }
        let whole = rate.floor();
        let extra = usize::from(self.rng.random_bool((rate - whole).clamp(0.0, 1.0)));
        (whole as usize).min(self.cells.len()) + extra
    }

    fn spawn(&mut self, kind: ObjectKind) {
        // A crowded world may not have room; give up after a few draws.
        for _ in 0..8 {
            let pos = Coord::new(
                self.rng.random_range(0..self.width),
                self.rng.random_range(0..self.height),
            );
            if self.agents.contains(&pos) {
                continue;
            }
            if let Some(id) = self.place(kind, pos) {
                trace!(?kind, %id, %pos, "spawned object");
                return;
            }
        }
    }
}

impl World for GridWorld {
    fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn now(&self) -> Tick {
        self.tick
    }

    fn sense(&self, at: Coord, range: i32) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot {
            origin: at,
            range,
            ..SensorSnapshot::default()
        };
        for dy in -range..=range {
            for dx in -range..=range {
                let c = at.offset(dx, dy);
                if let Some(object) = self.object_at(c) {
                    snapshot.objects.push(*object);
                }
                if c != at && self.agents.contains(&c) {
                    snapshot.agents.push(c);
                }
            }
        }
        snapshot
    }

    fn can_pickup(&self, tile: ObjectId, agent: Coord) -> bool {
        self.object_at(agent)
            .is_some_and(|o| o.kind == ObjectKind::Tile && o.id == tile)
    }

    fn can_putdown(&self, hole: ObjectId, agent: Coord) -> bool {
        self.object_at(agent)
            .is_some_and(|o| o.kind == ObjectKind::Hole && o.id == hole)
    }

    fn can_refuel(&self, agent: Coord) -> bool {
        agent == self.fuel_station
    }

    fn move_agent(&mut self, from: Coord, direction: Direction) -> Result<Coord, WorldError> {
        let to = from.step(direction);
        if to == from {
            return Ok(from);
        }
        if !self.in_bounds(to) {
            return Err(WorldError::OutOfBounds(to));
        }
        if self.is_obstacle(to) || self.agents.contains(&to) {
            return Err(WorldError::CellBlocked(to));
        }
        self.agents.remove(&from);
        self.agents.insert(to);
        Ok(to)
    }

    fn pickup_tile(&mut self, at: Coord) -> Result<ObjectId, WorldError> {
        let idx = self.index(at).ok_or(WorldError::OutOfBounds(at))?;
        match self.cells[idx] {
            Some(object) if object.kind == ObjectKind::Tile => {
                self.cells[idx] = None;
                Ok(object.id)
            }
            _ => Err(WorldError::NoTile(at)),
        }
    }

    fn putdown_tile(&mut self, at: Coord) -> Result<ObjectId, WorldError> {
        let idx = self.index(at).ok_or(WorldError::OutOfBounds(at))?;
        match self.cells[idx] {
            Some(object) if object.kind == ObjectKind::Hole => {
                self.cells[idx] = None;
                Ok(object.id)
            }
            _ => Err(WorldError::NoHole(at)),
        }
    }
}
