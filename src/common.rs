//! Common types for the sea battle core: attack results and errors.

use crate::bitboard::BitBoardError;

/// A `(row, col)` position on a grid.
pub type Coord = (usize, usize);

/// Result of an attack on a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GuessResult {
    /// Attack missed all ships.
    Miss,
    /// Attack hit a ship that is still afloat.
    Hit,
    /// Attack hit the last intact cell of a ship.
    Sink,
}

impl GuessResult {
    /// True for both `Hit` and `Sink`.
    pub fn is_hit(self) -> bool {
        !matches!(self, GuessResult::Miss)
    }
}

/// Why a ship could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Part of the ship would lie outside the grid.
    OutOfBounds,
    /// A covered cell is not open water.
    Overlap,
    /// A covered cell touches another ship, diagonals included.
    Adjacent,
    /// Every ship of the manifest has already been placed.
    FleetComplete,
}

/// Errors returned by grid, placement and match operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate lies outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// The cell was already attacked.
    CellAlreadyResolved { row: usize, col: usize },
    /// Ship placement rejected.
    InvalidPlacement(PlacementError),
    /// The fleet manifest cannot fit on the configured grid.
    UnsatisfiableManifest,
    /// Grid size or fleet manifest is malformed.
    InvalidConfig(&'static str),
    /// Operation not allowed in the current match phase.
    WrongPhase,
    /// The attacked side is not the one whose turn it is to be attacked.
    OutOfTurn,
    /// The match is over; no further attacks are accepted.
    MatchFinished,
    /// Every cell has been tried already.
    BoardExhausted,
    /// Underlying bitboard error.
    BitBoard(BitBoardError),
}

impl GameError {
    /// Whether the caller can correct the input and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::OutOfBounds { .. }
                | GameError::CellAlreadyResolved { .. }
                | GameError::InvalidPlacement(_)
                | GameError::OutOfTurn
        )
    }
}

impl From<BitBoardError> for GameError {
    fn from(err: BitBoardError) -> Self {
        GameError::BitBoard(err)
    }
}

impl From<PlacementError> for GameError {
    fn from(err: PlacementError) -> Self {
        GameError::InvalidPlacement(err)
    }
}

impl core::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlacementError::OutOfBounds => write!(f, "ship would extend past the edge of the grid"),
            PlacementError::Overlap => write!(f, "ship would overlap another ship"),
            PlacementError::Adjacent => write!(f, "ship would touch another ship"),
            PlacementError::FleetComplete => write!(f, "all ships are already placed"),
        }
    }
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::OutOfBounds { row, col } => {
                write!(f, "Coordinate ({}, {}) is outside the grid", row, col)
            }
            GameError::CellAlreadyResolved { row, col } => {
                write!(f, "Cell ({}, {}) was already attacked", row, col)
            }
            GameError::InvalidPlacement(e) => write!(f, "Invalid placement: {}", e),
            GameError::UnsatisfiableManifest => {
                write!(f, "Fleet manifest cannot fit on the configured grid")
            }
            GameError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            GameError::WrongPhase => write!(f, "Operation not allowed in the current phase"),
            GameError::OutOfTurn => write!(f, "It is not that side's turn to be attacked"),
            GameError::MatchFinished => write!(f, "The match is already finished"),
            GameError::BoardExhausted => write!(f, "No untried cells remain"),
            GameError::BitBoard(e) => write!(f, "BitBoard error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlacementError {}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}
