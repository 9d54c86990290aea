//! Ship records: a fixed run of cells plus a monotonically growing hit counter.

use alloc::vec::Vec;
use core::fmt;

use crate::common::Coord;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Both orientations in the order the exhaustive placement scan tries them.
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// The `k`-th cell of a run starting at (`row`, `col`).
    #[inline]
    pub fn step(self, row: usize, col: usize, k: usize) -> Coord {
        match self {
            Orientation::Horizontal => (row, col + k),
            Orientation::Vertical => (row + k, col),
        }
    }

    /// The other orientation.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A ship placed on a board.
///
/// Size, position and orientation are fixed at construction; only the hit
/// counter changes afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    orientation: Orientation,
    cells: Vec<Coord>,
    hits: usize,
}

impl Ship {
    /// Build a ship of `size` cells starting at (`row`, `col`).
    ///
    /// The caller is responsible for checking that the cells are on the board.
    pub(crate) fn new(size: usize, orientation: Orientation, row: usize, col: usize) -> Self {
        let cells = (0..size).map(|k| orientation.step(row, col, k)).collect();
        Ship {
            orientation,
            cells,
            hits: 0,
        }
    }

    /// Number of cells the ship covers.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells, starting from the origin.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Whether the ship covers (`row`, `col`).
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }

    /// Number of cells hit so far.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Record a hit. Returns `true` if this hit sank the ship.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.hits < self.size() {
            self.hits += 1;
        }
        self.is_sunk()
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits == self.size()
    }

    /// Origin of the ship (row, col).
    pub fn origin(&self) -> Coord {
        self.cells[0]
    }

    /// Orientation of the ship.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.origin();
        write!(
            f,
            "Ship {{ size: {}, origin: ({}, {}), orientation: {:?}, hits: {} }}",
            self.size(),
            row,
            col,
            self.orientation,
            self.hits,
        )
    }
}
