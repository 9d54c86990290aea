//! Grid occupancy model: per-cell state, the fleet placed on it, and attack
//! resolution including the open-water sweep around sunk ships.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::common::{Coord, GameError, GuessResult, PlacementError};
use crate::ship::{Orientation, Ship};

/// State of a single grid cell.
///
/// Transitions are one-way: `Empty -> Occupied` during placement,
/// `Occupied -> Hit` and `Empty -> Miss` during attack resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Occupied,
    Hit,
    Miss,
}

impl CellState {
    /// True once the cell has been attacked (or swept after a sinking).
    pub fn is_resolved(self) -> bool {
        matches!(self, CellState::Hit | CellState::Miss)
    }
}

/// What a front end may show for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellView {
    /// Open water, or a hidden ship cell.
    Water,
    /// Intact ship cell, only shown when ships are revealed.
    Ship,
    /// Hit on a ship still afloat.
    Hit,
    /// Hit on a sunk ship.
    Sunk,
    /// Attacked or swept water.
    Miss,
}

/// Read-only projection of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardView {
    size: usize,
    cells: Vec<CellView>,
}

impl BoardView {
    /// Side length of the projected board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Projection of (`row`, `col`), `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<CellView> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Rows of the projection, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> + '_ {
        self.cells.chunks(self.size.max(1))
    }
}

/// Outcome of [`Board::receive_attack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub result: GuessResult,
    /// Index into [`Board::ships`] of the ship that was hit.
    pub ship: Option<usize>,
}

impl AttackReport {
    pub fn hit(&self) -> bool {
        self.result.is_hit()
    }

    pub fn sunk(&self) -> bool {
        self.result == GuessResult::Sink
    }
}

/// Iterate over the in-bounds 8-neighbourhood of (`row`, `col`).
pub(crate) fn neighbors8(size: usize, row: usize, col: usize) -> impl Iterator<Item = Coord> {
    const DELTAS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];
    DELTAS
        .into_iter()
        .filter_map(move |(dr, dc)| offset(size, row, col, dr, dc))
}

/// Iterate over the in-bounds orthogonal neighbours of (`row`, `col`):
/// up, down, left, right.
pub(crate) fn neighbors4(size: usize, row: usize, col: usize) -> impl Iterator<Item = Coord> {
    const DELTAS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    DELTAS
        .into_iter()
        .filter_map(move |(dr, dc)| offset(size, row, col, dr, dc))
}

#[inline]
fn offset(size: usize, row: usize, col: usize, dr: isize, dc: isize) -> Option<Coord> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < size && c < size).then_some((r, c))
}

/// One side's grid and fleet.
#[derive(Clone)]
pub struct Board {
    size: usize,
    cells: Vec<CellState>,
    owners: Vec<Option<usize>>,
    ships: Vec<Ship>,
}

impl Board {
    /// Create an empty `size×size` board (no ships placed).
    pub fn new(size: usize) -> Self {
        Board {
            size,
            cells: vec![CellState::Empty; size * size],
            owners: vec![None; size * size],
            ships: Vec::new(),
        }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// State of (`row`, `col`), `None` off the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<CellState> {
        self.in_bounds(row, col)
            .then(|| self.cells[self.idx(row, col)])
    }

    /// Ships placed so far, in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Index of the ship covering (`row`, `col`).
    pub fn ship_at(&self, row: usize, col: usize) -> Option<usize> {
        if self.in_bounds(row, col) {
            self.owners[self.idx(row, col)]
        } else {
            None
        }
    }

    /// Returns `true` when a fleet is present and every ship is sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Number of cells covered by ships, hit or not.
    pub fn occupied_count(&self) -> usize {
        self.count(CellState::Occupied) + self.count(CellState::Hit)
    }

    /// In bounds, open water, and no ship in the 8-neighbourhood.
    pub fn is_cell_free(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Some(CellState::Empty)
            && neighbors8(self.size, row, col)
                .all(|(r, c)| self.cells[self.idx(r, c)] != CellState::Occupied)
    }

    /// Explain why a ship could not go at (`row`, `col`), if it could not.
    pub fn check_placement(
        &self,
        row: usize,
        col: usize,
        size: usize,
        orientation: Orientation,
    ) -> Result<(), PlacementError> {
        if size == 0 || size > self.size || !self.in_bounds(row, col) {
            return Err(PlacementError::OutOfBounds);
        }
        let (end_r, end_c) = orientation.step(row, col, size - 1);
        if !self.in_bounds(end_r, end_c) {
            return Err(PlacementError::OutOfBounds);
        }
        let mut touching = false;
        for k in 0..size {
            let (r, c) = orientation.step(row, col, k);
            if self.cells[self.idx(r, c)] != CellState::Empty {
                return Err(PlacementError::Overlap);
            }
            touching |= !self.is_cell_free(r, c);
        }
        if touching {
            return Err(PlacementError::Adjacent);
        }
        Ok(())
    }

    /// True iff every covered cell is in bounds and free.
    pub fn can_place(&self, row: usize, col: usize, size: usize, orientation: Orientation) -> bool {
        self.check_placement(row, col, size, orientation).is_ok()
    }

    /// Place a ship of `size` cells at (`row`, `col`). Returns the new ship's index.
    ///
    /// On failure the board is left untouched.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        size: usize,
        orientation: Orientation,
    ) -> Result<usize, GameError> {
        self.check_placement(row, col, size, orientation)?;
        let ship = Ship::new(size, orientation, row, col);
        let index = self.ships.len();
        for &(r, c) in ship.cells() {
            let i = self.idx(r, c);
            self.cells[i] = CellState::Occupied;
            self.owners[i] = Some(index);
        }
        log::debug!(
            "placed ship #{} size {} at ({}, {}) {:?}",
            index,
            size,
            row,
            col,
            orientation
        );
        self.ships.push(ship);
        Ok(index)
    }

    /// Resolve an attack at (`row`, `col`).
    ///
    /// Sinking a ship paints every still-empty cell around it as a miss.
    pub fn receive_attack(&mut self, row: usize, col: usize) -> Result<AttackReport, GameError> {
        let state = self
            .cell(row, col)
            .ok_or(GameError::OutOfBounds { row, col })?;
        let i = self.idx(row, col);
        match (state, self.owners[i]) {
            (CellState::Hit | CellState::Miss, _) => {
                Err(GameError::CellAlreadyResolved { row, col })
            }
            (CellState::Occupied, Some(index)) => {
                self.cells[i] = CellState::Hit;
                let sunk = self.ships[index].register_hit();
                if sunk {
                    self.sweep_around(index);
                }
                Ok(AttackReport {
                    result: if sunk {
                        GuessResult::Sink
                    } else {
                        GuessResult::Hit
                    },
                    ship: Some(index),
                })
            }
            _ => {
                self.cells[i] = CellState::Miss;
                Ok(AttackReport {
                    result: GuessResult::Miss,
                    ship: None,
                })
            }
        }
    }

    fn sweep_around(&mut self, index: usize) {
        let mut swept = 0;
        for k in 0..self.ships[index].size() {
            let (row, col) = self.ships[index].cells()[k];
            for (r, c) in neighbors8(self.size, row, col) {
                let i = self.idx(r, c);
                if self.cells[i] == CellState::Empty {
                    self.cells[i] = CellState::Miss;
                    swept += 1;
                }
            }
        }
        log::debug!("ship #{} sunk, {} surrounding cells swept", index, swept);
    }

    /// Project the board for display. Intact ship cells are only visible
    /// with `reveal`; hits on sunk ships always show as wrecks.
    pub fn view(&self, reveal: bool) -> BoardView {
        let cells = self
            .cells
            .iter()
            .zip(self.owners.iter())
            .map(|(state, owner)| match state {
                CellState::Empty => CellView::Water,
                CellState::Miss => CellView::Miss,
                CellState::Occupied if reveal => CellView::Ship,
                CellState::Occupied => CellView::Water,
                CellState::Hit => match owner {
                    Some(i) if self.ships[*i].is_sunk() => CellView::Sunk,
                    _ => CellView::Hit,
                },
            })
            .collect();
        BoardView {
            size: self.size,
            cells,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ size: {}, ships: {:?} }}", self.size, self.ships)?;
        for row in self.cells.chunks(self.size.max(1)) {
            for state in row {
                let ch = match state {
                    CellState::Empty => '~',
                    CellState::Occupied => 'S',
                    CellState::Hit => 'X',
                    CellState::Miss => 'O',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
