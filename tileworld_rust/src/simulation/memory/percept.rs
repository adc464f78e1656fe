//! Per-cell cache of remembered observations.

use crate::simulation::grid::{Coord, Tick, WorldObject};

/// A remembered observation: the object and the tick it was first seen.
///
/// Percepts are never edited; a refresh replaces the whole value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Percept {
    pub object: WorldObject,
    pub discovered_at: Tick,
}

impl Percept {
    #[must_use]
    pub const fn new(object: WorldObject, discovered_at: Tick) -> Self {
        Self {
            object,
            discovered_at,
        }
    }

    /// Ticks elapsed since the object was first seen.
    #[must_use]
    pub const fn age(&self, now: Tick) -> Tick {
        now.saturating_sub(self.discovered_at)
    }
}

/// A dense grid of optional percepts covering the whole world.
///
/// A stored percept always sits at its object's last known coordinate.
#[derive(Clone, Debug)]
pub struct PerceptStore {
    cells: Vec<Option<Percept>>,
    width: i32,
    height: i32,
    live: usize,
}

impl PerceptStore {
    /// Creates an empty store for a `width` x `height` world.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let len = usize::try_from(width.max(0) * height.max(0)).unwrap_or(0);
        Self {
            cells: vec![None; len],
            width,
            height,
            live: 0,
        }
    }

    fn index(&self, c: Coord) -> Option<usize> {
        if c.x < 0 || c.y < 0 || c.x >= self.width || c.y >= self.height {
            return None;
        }
        usize::try_from(c.y * self.width + c.x).ok()
    }

    #[must_use]
    pub fn get(&self, c: Coord) -> Option<&Percept> {
        self.index(c).and_then(|i| self.cells[i].as_ref())
    }

    /// Stores a percept at its object's position, returning what it replaced.
    /// Out-of-bounds percepts are dropped.
    pub fn insert(&mut self, percept: Percept) -> Option<Percept> {
        let idx = self.index(percept.object.pos)?;
        let previous = self.cells[idx].replace(percept);
        if previous.is_none() {
            self.live += 1;
        }
        previous
    }

    pub fn remove(&mut self, c: Coord) -> Option<Percept> {
        let idx = self.index(c)?;
        let previous = self.cells[idx].take();
        if previous.is_some() {
            self.live -= 1;
        }
        previous
    }

    pub fn iter(&self) -> impl Iterator<Item = &Percept> {
        self.cells.iter().flatten()
    }

    /// Number of cells currently holding a percept.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[must_use]
    pub const fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}
