//! Core types for the farm simulation
//!
//! Identifiers, grid geometry and the occupant projection shared by the
//! prey, predator and world modules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a prey creature.
///
/// Assigned monotonically and never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreyId(pub u32);

impl fmt::Display for PreyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell position on the farm grid, `x` is the column and `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        GridPos { x, y }
    }

    /// Squared Euclidean distance. Exact, so it is what ordering and reach
    /// checks compare. Saturates at `u64::MAX`, which exceeds any `u32` reach squared.
    pub fn distance_sq(&self, other: &GridPos) -> u64 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        (dx * dx).saturating_add(dy * dy)
    }

    /// Euclidean distance between two cells
    pub fn distance(&self, other: &GridPos) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// Returns the position shifted by a row/column delta
    pub fn offset(&self, drow: i32, dcol: i32) -> GridPos {
        GridPos {
            x: self.x.saturating_add(dcol),
            y: self.y.saturating_add(drow),
        }
    }
}

/// Extents of the farm grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Bounds { width, height }
    }

    /// Clamp a position into `[0, width) x [0, height)`.
    pub fn clamp(&self, x: i32, y: i32) -> GridPos {
        GridPos {
            x: x.clamp(0, self.width - 1),
            y: y.clamp(0, self.height - 1),
        }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Center cell (integer division)
    pub fn center(&self) -> GridPos {
        GridPos::new(self.width / 2, self.height / 2)
    }
}

/// What the occupancy grid shows at a cell.
///
/// Compared by identity: two `Prey` occupants are equal only when they refer
/// to the same prey id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Occupant {
    #[default]
    Empty,
    Predator,
    Prey(PreyId),
}

impl Occupant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn prey_id(&self) -> Option<PreyId> {
        match self {
            Occupant::Prey(id) => Some(*id),
            _ => None,
        }
    }
}

/// Glyph to draw for an occupied cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellGlyph<'a> {
    pub symbol: &'a str,
    /// Set for prey currently held by a tentacle
    pub held: bool,
}
