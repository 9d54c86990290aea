//! Fleet placement: randomized trials with an exhaustive fallback, plus the
//! step-by-step session a human uses to lay out their own fleet.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::Board;
use crate::common::{GameError, PlacementError};
use crate::config::GameConfig;
use crate::ship::Orientation;

/// Random attempts per ship before falling back to the exhaustive scan.
pub const PLACEMENT_TRIALS: usize = 100;

/// Whole-fleet attempts before resorting to the deterministic layout.
const FLEET_ATTEMPTS: usize = 8;

/// Pick a random legal (row, col, orientation) for a ship of `size`.
///
/// Gives up after [`PLACEMENT_TRIALS`] attempts.
pub fn random_placement<R: Rng + ?Sized>(
    board: &Board,
    size: usize,
    rng: &mut R,
) -> Option<(usize, usize, Orientation)> {
    let n = board.size();
    if n == 0 {
        return None;
    }
    for _ in 0..PLACEMENT_TRIALS {
        let r = rng.random_range(0..n);
        let c = rng.random_range(0..n);
        let orient = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        if board.can_place(r, c, size, orient) {
            return Some((r, c, orient));
        }
    }
    None
}

/// First legal (row, col, orientation) in row-major order, horizontal first.
pub fn scan_placement(board: &Board, size: usize) -> Option<(usize, usize, Orientation)> {
    let n = board.size();
    (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .flat_map(|(r, c)| Orientation::ALL.into_iter().map(move |o| (r, c, o)))
        .find(|&(r, c, o)| board.can_place(r, c, size, o))
}

/// Place each of `sizes` in order: random trials first, then the scan.
pub fn place_fleet<R: Rng + ?Sized>(
    board: &mut Board,
    sizes: &[usize],
    rng: &mut R,
) -> Result<(), GameError> {
    for &size in sizes {
        let spot = match random_placement(board, size, rng) {
            Some(spot) => spot,
            None => {
                log::trace!("random trials exhausted for size {}, scanning", size);
                scan_placement(board, size).ok_or(GameError::UnsatisfiableManifest)?
            }
        };
        let (r, c, o) = spot;
        board.place(r, c, size, o)?;
    }
    Ok(())
}

/// Deterministic largest-first layout found by depth-first search over every
/// (row, col, orientation), horizontal before vertical in row-major order.
///
/// Fails with [`GameError::UnsatisfiableManifest`] only when no layout of
/// `sizes` exists on a `grid_size` grid.
pub fn search_layout(grid_size: usize, sizes: &[usize]) -> Result<Board, GameError> {
    let mut sizes = sizes.to_vec();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    extend_layout(&Board::new(grid_size), &sizes, 0).ok_or(GameError::UnsatisfiableManifest)
}

/// Place `sizes` on top of `board`, trying slots from `first` on for the
/// first ship. Equal sizes take increasing slots so each set of positions
/// is visited once.
fn extend_layout(board: &Board, sizes: &[usize], first: usize) -> Option<Board> {
    let Some((&size, rest)) = sizes.split_first() else {
        return Some(board.clone());
    };
    let n = board.size();
    let free = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .filter(|&(r, c)| board.is_cell_free(r, c))
        .count();
    if free < sizes.iter().sum::<usize>() {
        return None;
    }

    let slots = Orientation::ALL.len() * n * n;
    for slot in first..slots {
        let (cell, o) = (slot / 2, Orientation::ALL[slot % 2]);
        if size == 1 && o == Orientation::Vertical {
            continue;
        }
        let (r, c) = (cell / n, cell % n);
        if !board.can_place(r, c, size, o) {
            continue;
        }
        let mut next = board.clone();
        if next.place(r, c, size, o).is_err() {
            continue;
        }
        let next_first = if rest.first() == Some(&size) { slot + 1 } else { 0 };
        if let Some(done) = extend_layout(&next, rest, next_first) {
            return Some(done);
        }
    }
    log::trace!("no room for size {} with {} ships left", size, sizes.len());
    None
}

/// Build a fully populated board for `config`, largest ships first.
///
/// An unlucky random prefix can leave no room for the remaining ships even
/// with the scan; the fleet is then re-rolled, and after a few failures the
/// searched layout (which validation already proved to exist) is used.
pub fn auto_place<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Board, GameError> {
    let sizes = config.fleet_sorted();
    for attempt in 0..FLEET_ATTEMPTS {
        let mut board = Board::new(config.grid_size());
        match place_fleet(&mut board, &sizes, rng) {
            Ok(()) => return Ok(board),
            Err(GameError::UnsatisfiableManifest) => {
                log::debug!("fleet placement attempt {} stalled, retrying", attempt + 1);
            }
            Err(e) => return Err(e),
        }
    }
    log::debug!("falling back to searched fleet layout");
    search_layout(config.grid_size(), &sizes)
}

/// Progress report after a successful [`PlacementSession::try_place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementProgress {
    /// Another ship of this size must be placed next.
    Next(usize),
    /// The whole manifest is on the board.
    Complete,
}

/// Interactive placement of a fleet, one ship at a time in manifest order.
#[derive(Debug, Clone)]
pub struct PlacementSession {
    config: GameConfig,
    board: Board,
    placed: usize,
}

impl PlacementSession {
    /// Start placing `config`'s fleet on an empty grid.
    pub fn begin(config: &GameConfig) -> Self {
        PlacementSession {
            config: config.clone(),
            board: Board::new(config.grid_size()),
            placed: 0,
        }
    }

    /// Size of the ship to be placed next, `None` once complete.
    pub fn next_size(&self) -> Option<usize> {
        self.config.fleet().get(self.placed).copied()
    }

    /// Sizes still waiting to be placed.
    pub fn remaining(&self) -> &[usize] {
        &self.config.fleet()[self.placed..]
    }

    pub fn is_complete(&self) -> bool {
        self.placed == self.config.fleet().len()
    }

    /// Board as laid out so far.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whether the next ship would fit at (`row`, `col`), for hover previews.
    pub fn can_place(&self, row: usize, col: usize, orientation: Orientation) -> bool {
        self.next_size()
            .is_some_and(|size| self.board.can_place(row, col, size, orientation))
    }

    /// Place the next ship of the manifest.
    pub fn try_place(
        &mut self,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<PlacementProgress, GameError> {
        let size = self.next_size().ok_or(PlacementError::FleetComplete)?;
        self.board.place(row, col, size, orientation)?;
        self.placed += 1;
        Ok(match self.next_size() {
            Some(next) => PlacementProgress::Next(next),
            None => PlacementProgress::Complete,
        })
    }

    /// Discard manual progress and auto-place the whole fleet.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.board = auto_place(&self.config, rng)?;
        self.placed = self.config.fleet().len();
        Ok(())
    }

    /// Clear the board and start over.
    pub fn reset(&mut self) {
        self.board = Board::new(self.config.grid_size());
        self.placed = 0;
    }

    /// Hand over the finished board.
    pub fn finish(self) -> Result<Board, GameError> {
        if !self.is_complete() {
            return Err(GameError::WrongPhase);
        }
        Ok(self.board)
    }
}

/// Sizes of `board`'s ships, largest first.
pub fn fleet_sizes(board: &Board) -> Vec<usize> {
    let mut sizes: Vec<usize> = board.ships().iter().map(|s| s.size()).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}
