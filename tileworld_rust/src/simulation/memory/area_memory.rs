//! Decaying local belief about the world.
//!
//! Each sensing pass wipes the sensor window and rebuilds it from what is
//! actually visible, so objects that vanished are forgotten while objects
//! still in view keep the tick they were first seen. Everything outside the
//! window is left as a stale belief whose trustworthiness decays with age.

use std::collections::BTreeMap;

use tracing::trace;

use crate::simulation::environment::SensorSnapshot;
use crate::simulation::grid::{CellContent, Coord, ObjectKind, Rect, Tick, WorldObject};
use crate::simulation::memory::percept::{Percept, PerceptStore};
use crate::simulation::memory::spiral::spiral_offsets;

/// The spiral search reaches this many sensor ranges from its origin.
const SPIRAL_RANGES: i32 = 4;

/// An agent's private memory of the grid.
#[derive(Clone, Debug)]
pub struct AreaMemory {
    percepts: PerceptStore,
    visited: Vec<bool>,
    visited_count: usize,
    fuel_station: Option<Coord>,
    closest: BTreeMap<ObjectKind, WorldObject>,
    spiral: Vec<(i32, i32)>,
    sensor_range: i32,
    object_lifetime: u64,
    width: i32,
    height: i32,
}

impl AreaMemory {
    /// Creates an empty memory for a `width` x `height` world.
    #[must_use]
    pub fn new(width: i32, height: i32, sensor_range: i32, object_lifetime: u64) -> Self {
        let len = usize::try_from(width.max(0) * height.max(0)).unwrap_or(0);
        Self {
            percepts: PerceptStore::new(width, height),
            visited: vec![false; len],
            visited_count: 0,
            fuel_station: None,
            closest: BTreeMap::new(),
            spiral: spiral_offsets(sensor_range * SPIRAL_RANGES),
            sensor_range,
            object_lifetime,
            width,
            height,
        }
    }

    fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn visited_index(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            usize::try_from(c.y * self.width + c.x).ok()
        } else {
            None
        }
    }

    /// Merges a fresh observation of the sensor window centred on
    /// `snapshot.origin` into memory.
    ///
    /// Every in-bounds cell of the window is cleared and marked visited, then
    /// each observed object is stored. An object already remembered at the
    /// same cell under the same id keeps its original discovery tick; anything
    /// else is stamped with `now`.
    pub fn merge_sensor_window(&mut self, snapshot: &SensorSnapshot, now: Tick) {
        self.closest.clear();
        let origin = snapshot.origin;
        let range = self.sensor_range;

        let mut previous: BTreeMap<Coord, Percept> = BTreeMap::new();
        for dy in -range..=range {
            for dx in -range..=range {
                let c = origin.offset(dx, dy);
                let Some(idx) = self.visited_index(c) else {
                    continue;
                };
                if let Some(old) = self.percepts.remove(c) {
                    previous.insert(c, old);
                }
                if !self.visited[idx] {
                    self.visited[idx] = true;
                    self.visited_count += 1;
                }
            }
        }

        for object in &snapshot.objects {
            let pos = object.pos;
            let in_window = pos.x.abs_diff(origin.x) <= range.unsigned_abs()
                && pos.y.abs_diff(origin.y) <= range.unsigned_abs();
            if !in_window || !self.in_bounds(pos) {
                continue;
            }
            if object.kind == ObjectKind::FuelStation && self.fuel_station.is_none() {
                self.fuel_station = Some(pos);
            }
            let discovered_at = match previous.get(&pos) {
                Some(old) if old.object.id == object.id => old.discovered_at,
                _ => now,
            };
            self.percepts.insert(Percept::new(*object, discovered_at));
            self.update_closest(origin, object);
        }
        trace!(%origin, seen = snapshot.objects.len(), remembered = self.percepts.len(), "merged sensor window");
    }

    fn update_closest(&mut self, origin: Coord, object: &WorldObject) {
        let closer = self
            .closest
            .get(&object.kind)
            .is_none_or(|best| origin.manhattan(object.pos) < origin.manhattan(best.pos));
        if closer {
            self.closest.insert(object.kind, *object);
        }
    }

    /// Estimated ticks an object has left: `lifetime * threshold - age`.
    ///
    /// Returns `0.0` for objects not in memory.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn estimated_remaining_life(&self, object: &WorldObject, threshold: f64, now: Tick) -> f64 {
        self.percepts
            .get(object.pos)
            .filter(|p| p.object.id == object.id)
            .map_or(0.0, |p| self.object_lifetime as f64 * threshold - p.age(now) as f64)
    }

    /// Nearest remembered object of `kind` around `origin` seen within
    /// `max_age` ticks.
    ///
    /// Falls back to the most recently discovered object of that kind inside
    /// the search radius when none is fresh enough.
    #[must_use]
    pub fn nearby_object(
        &self,
        origin: Coord,
        max_age: Tick,
        kind: ObjectKind,
        now: Tick,
    ) -> Option<&WorldObject> {
        let mut freshest: Option<&Percept> = None;
        for &(dx, dy) in &self.spiral {
            let Some(percept) = self.percepts.get(origin.offset(dx, dy)) else {
                continue;
            };
            if percept.object.kind != kind {
                continue;
            }
            if percept.age(now) <= max_age {
                return Some(&percept.object);
            }
            if freshest.is_none_or(|f| percept.discovered_at > f.discovered_at) {
                freshest = Some(percept);
            }
        }
        freshest.map(|p| &p.object)
    }

    /// Remembered objects of `kind` inside `zone`, nearest to `from` first.
    ///
    /// The fuel station is never returned.
    #[must_use]
    pub fn objects_in_zone(&self, zone: &Rect, kind: ObjectKind, from: Coord) -> Vec<WorldObject> {
        if kind == ObjectKind::FuelStation {
            return Vec::new();
        }
        let mut found: Vec<WorldObject> = zone
            .cells()
            .filter_map(|c| self.percepts.get(c))
            .map(|p| p.object)
            .filter(|o| o.kind == kind)
            .collect();
        found.sort_by_key(|o| (from.manhattan(o.pos), o.id));
        found
    }

    /// True when every cell of `zone` has been inside the sensor window.
    #[must_use]
    pub fn is_zone_fully_visited(&self, zone: &Rect) -> bool {
        zone.cells().all(|c| self.is_visited(c))
    }

    #[must_use]
    pub fn is_visited(&self, c: Coord) -> bool {
        self.visited_index(c).is_some_and(|i| self.visited[i])
    }

    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.visited_count
    }

    /// True only when an obstacle is remembered at `(x, y)`. Unknown cells
    /// are assumed passable.
    #[must_use]
    pub fn is_cell_blocked(&self, x: i32, y: i32) -> bool {
        self.percepts
            .get(Coord::new(x, y))
            .is_some_and(|p| p.object.kind == ObjectKind::Obstacle)
    }

    /// What the agent believes occupies `c`.
    #[must_use]
    pub fn cell(&self, c: Coord) -> CellContent {
        self.percepts
            .get(c)
            .map_or(CellContent::Empty, |p| CellContent::from(&p.object))
    }

    #[must_use]
    pub fn percept(&self, c: Coord) -> Option<&Percept> {
        self.percepts.get(c)
    }

    /// Drops whatever is remembered at `c`.
    pub fn forget(&mut self, c: Coord) -> Option<Percept> {
        self.percepts.remove(c)
    }

    /// Closest object of `kind` seen during the latest merge.
    #[must_use]
    pub fn closest_in_sensor_range(&self, kind: ObjectKind) -> Option<&WorldObject> {
        self.closest.get(&kind)
    }

    /// Where the fuel station was first seen. Never forgotten.
    #[must_use]
    pub const fn fuel_station(&self) -> Option<Coord> {
        self.fuel_station
    }

    /// Number of remembered objects.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.percepts.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.percepts.is_empty()
    }

    #[must_use]
    pub const fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn sensor_range(&self) -> i32 {
        self.sensor_range
    }
}
