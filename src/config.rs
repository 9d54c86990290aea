use alloc::vec::Vec;

use crate::common::GameError;
use crate::placement;

/// Default side length of the grid.
pub const DEFAULT_GRID_SIZE: usize = 10;
/// Largest supported grid; columns are addressed by a single letter.
pub const MAX_GRID_SIZE: usize = 26;
/// Default fleet manifest: one four-decker, two three-deckers, three
/// two-deckers and four single-deck boats.
pub const DEFAULT_FLEET: [usize; 10] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

/// Grid size and fleet manifest of a match.
///
/// Only constructed through [`GameConfig::new`] or `Default`, so a value
/// always describes a fleet that fits on its grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct GameConfig {
    grid_size: usize,
    fleet: Vec<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: DEFAULT_GRID_SIZE,
            fleet: DEFAULT_FLEET.to_vec(),
        }
    }
}

impl GameConfig {
    /// Validate a grid size and fleet manifest.
    pub fn new(grid_size: usize, fleet: Vec<usize>) -> Result<Self, GameError> {
        if grid_size == 0 {
            return Err(GameError::InvalidConfig("grid size must be positive"));
        }
        if grid_size > MAX_GRID_SIZE {
            return Err(GameError::InvalidConfig("grid size exceeds 26"));
        }
        if fleet.is_empty() {
            return Err(GameError::InvalidConfig("fleet manifest is empty"));
        }
        if fleet.contains(&0) {
            return Err(GameError::InvalidConfig("ship sizes must be positive"));
        }
        let config = GameConfig { grid_size, fleet };
        config.check_satisfiable()?;
        Ok(config)
    }

    /// Side length of the grid.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Ship sizes in manifest order.
    pub fn fleet(&self) -> &[usize] {
        &self.fleet
    }

    /// Ship sizes largest first, the order automatic placement uses.
    pub fn fleet_sorted(&self) -> Vec<usize> {
        let mut sizes = self.fleet.clone();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    /// Total number of ship segments in the manifest.
    pub fn total_ship_cells(&self) -> usize {
        self.fleet.iter().sum()
    }

    fn check_satisfiable(&self) -> Result<(), GameError> {
        let n = self.grid_size;
        if self.fleet.iter().any(|&s| s > n) {
            return Err(GameError::UnsatisfiableManifest);
        }
        // A ship plus its halo covers a 2×(size+1) block of the grid
        // extended by one row and column; the blocks cannot overlap.
        let needed: usize = self.fleet.iter().map(|&s| 2 * (s + 1)).sum();
        if needed > (n + 1) * (n + 1) {
            return Err(GameError::UnsatisfiableManifest);
        }
        placement::search_layout(n, &self.fleet).map(|_| ())
    }
}
