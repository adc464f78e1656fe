//! Shared grid vocabulary: coordinates, directions and world objects.

use std::fmt;

/// Discrete simulation time.
pub type Tick = u64;

/// A cell coordinate on the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the number of 4-connected moves between two cells.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the neighbouring cell in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned block of cells, half-open on the max side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    #[must_use]
    pub const fn contains(&self, c: Coord) -> bool {
        c.x >= self.x_min && c.x < self.x_max && c.y >= self.y_min && c.y < self.y_max
    }

    /// Corner points clockwise from top-left. The right and bottom corners
    /// sit on the exclusive edge.
    #[must_use]
    pub const fn corners(&self) -> [Coord; 4] {
        [
            Coord::new(self.x_min, self.y_min),
            Coord::new(self.x_max, self.y_min),
            Coord::new(self.x_max, self.y_max),
            Coord::new(self.x_min, self.y_max),
        ]
    }

    /// All cells of the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let Self {
            x_min,
            x_max,
            y_min,
            y_max,
        } = *self;
        (y_min..y_max).flat_map(move |y| (x_min..x_max).map(move |x| Coord::new(x, y)))
    }
}

/// A single movement step. `Stay` holds position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stay,
}

impl Direction {
    /// Grid delta for this direction. North decreases `y`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Stay => (0, 0),
        }
    }

    /// The four moving directions, in expansion order.
    #[must_use]
    pub const fn moves() -> [Direction; 4] {
        [Self::North, Self::East, Self::South, Self::West]
    }

    /// Direction that moves from `from` to the adjacent cell `to`.
    #[must_use]
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        Self::moves().into_iter().find(|d| from.step(*d) == to)
    }
}

/// Stable identifier assigned to an object when the world creates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kinds of object that can occupy a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Tile,
    Hole,
    Obstacle,
    FuelStation,
}

/// An object as the environment reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub pos: Coord,
    pub created_at: Tick,
    /// Tick at which the object vanishes. The fuel station never expires.
    pub expires_at: Option<Tick>,
}

impl WorldObject {
    #[must_use]
    pub fn is_expired(&self, now: Tick) -> bool {
        self.expires_at.is_some_and(|t| now >= t)
    }
}

/// What an agent believes occupies a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellContent {
    Empty,
    Tile(ObjectId),
    Hole(ObjectId),
    Obstacle,
    FuelStation,
}

impl From<&WorldObject> for CellContent {
    fn from(object: &WorldObject) -> Self {
        match object.kind {
            ObjectKind::Tile => Self::Tile(object.id),
            ObjectKind::Hole => Self::Hole(object.id),
            ObjectKind::Obstacle => Self::Obstacle,
            ObjectKind::FuelStation => Self::FuelStation,
        }
    }
}
