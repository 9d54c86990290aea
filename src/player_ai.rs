//! Automated opponent: density search, switching to a hunt around live hits.

use alloc::vec;
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::{
    ai,
    bitboard::BitBoard,
    board::{neighbors4, neighbors8},
    common::{Coord, GameError, GuessResult},
    config::GameConfig,
    player::Player,
};

/// Targeting mode of the [`AiPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fire at the highest-density untried cell.
    Search,
    /// Work through the neighbours of recent hits.
    Hunt,
}

/// AI player that keeps its own belief about the grid it attacks.
///
/// Confirmed hits and misses only ever grow and never share a cell.
/// Cells around a sunk ship are added to the misses since no other ship
/// can touch it.
#[derive(Debug, Clone)]
pub struct AiPlayer {
    fleet: Vec<usize>,
    remaining: Vec<usize>,
    hits: BitBoard,
    misses: BitBoard,
    /// Follow-up candidates; the newest hit's neighbours sit at the end.
    pending: Vec<Coord>,
    hunting: bool,
    last_hit: Option<Coord>,
}

impl AiPlayer {
    pub fn new(config: &GameConfig) -> Self {
        let size = config.grid_size();
        Self {
            fleet: config.fleet_sorted(),
            remaining: config.fleet_sorted(),
            hits: BitBoard::new(size),
            misses: BitBoard::new(size),
            pending: Vec::new(),
            hunting: false,
            last_hit: None,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.hunting {
            Mode::Hunt
        } else {
            Mode::Search
        }
    }

    /// Follow-up candidates not yet fired at, in the order they will be tried.
    pub fn pending(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pending
            .iter()
            .rev()
            .copied()
            .filter(|&(r, c)| !self.is_tried(r, c))
    }

    pub fn hits(&self) -> &BitBoard {
        &self.hits
    }

    pub fn misses(&self) -> &BitBoard {
        &self.misses
    }

    /// Most recent hit, if any.
    pub fn last_hit(&self) -> Option<Coord> {
        self.last_hit
    }

    /// Sizes of the ships not yet sunk, largest first.
    pub fn remaining_fleet(&self) -> &[usize] {
        &self.remaining
    }

    fn is_tried(&self, row: usize, col: usize) -> bool {
        self.hits.contains(row, col) || self.misses.contains(row, col)
    }

    /// Pick the next cell to attack.
    pub fn next_attack<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coord> {
        if self.hunting {
            while let Some((r, c)) = self.pending.pop() {
                if !self.is_tried(r, c) {
                    return Some((r, c));
                }
            }
            log::debug!("hunt candidates exhausted, back to search");
            self.hunting = false;
        }
        ai::calc_pdf_and_guess(&self.hits, &self.misses, &self.remaining, rng)
    }

    /// What [`next_attack`](Self::next_attack) would most likely pick,
    /// without consuming a hunt candidate.
    pub fn suggest<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        if self.hunting {
            if let Some(coord) = self.pending().next() {
                return Some(coord);
            }
        }
        ai::calc_pdf_and_guess(&self.hits, &self.misses, &self.remaining, rng)
    }

    /// Current density scores over the untried cells.
    pub fn density(&self) -> ai::Density {
        ai::calc_pdf(&self.hits, &self.misses, &self.remaining)
    }

    /// Fold the true outcome of an attack at (`row`, `col`) into the belief.
    pub fn record_result(
        &mut self,
        row: usize,
        col: usize,
        result: GuessResult,
    ) -> Result<(), GameError> {
        let size = self.hits.size();
        if row >= size || col >= size {
            return Err(GameError::OutOfBounds { row, col });
        }
        if self.is_tried(row, col) {
            return Err(GameError::CellAlreadyResolved { row, col });
        }

        if result == GuessResult::Miss {
            self.misses.set(row, col)?;
            return Ok(());
        }

        self.hits.set(row, col)?;
        self.last_hit = Some((row, col));
        self.hunting = true;

        if result == GuessResult::Sink {
            self.pending.clear();
            self.hunting = false;
            let wreck = self.wreck_through(row, col);
            for &(r, c) in &wreck {
                for (nr, nc) in neighbors8(size, r, c) {
                    if !self.hits.contains(nr, nc) {
                        self.misses.set(nr, nc)?;
                    }
                }
            }
            match self.remaining.iter().position(|&s| s == wreck.len()) {
                Some(i) => {
                    self.remaining.remove(i);
                }
                None => log::warn!("sunk a ship of unexpected size {}", wreck.len()),
            }
            log::debug!("sunk size {} at ({}, {}), back to search", wreck.len(), row, col);
            return Ok(());
        }

        for (r, c) in neighbors4(size, row, col) {
            if !self.is_tried(r, c) {
                self.pending.retain(|&p| p != (r, c));
                self.pending.push((r, c));
            }
        }
        log::debug!(
            "hit at ({}, {}), hunting with {} candidates",
            row,
            col,
            self.pending.len()
        );
        Ok(())
    }

    /// Orthogonally connected run of hits through (`row`, `col`). Ships are
    /// straight and never touch, so this is exactly the sunk ship.
    fn wreck_through(&self, row: usize, col: usize) -> Vec<Coord> {
        let size = self.hits.size();
        let mut seen = BitBoard::<u64>::new(size);
        let mut stack = vec![(row, col)];
        let mut wreck = Vec::new();
        while let Some((r, c)) = stack.pop() {
            if !self.hits.contains(r, c) || !seen.set(r, c).unwrap_or(false) {
                continue;
            }
            wreck.push((r, c));
            stack.extend(neighbors4(size, r, c));
        }
        wreck
    }

    /// Clear the belief state for a fresh match.
    pub fn reset(&mut self) {
        self.remaining = self.fleet.clone();
        self.hits.clear_all();
        self.misses.clear_all();
        self.pending.clear();
        self.hunting = false;
        self.last_hit = None;
    }
}

impl Player for AiPlayer {
    fn select_target(&mut self, rng: &mut SmallRng) -> Option<Coord> {
        self.next_attack(rng)
    }

    fn handle_guess_result(&mut self, coord: Coord, result: GuessResult) {
        if let Err(e) = self.record_result(coord.0, coord.1, result) {
            log::warn!("ignoring result for ({}, {}): {}", coord.0, coord.1, e);
        }
    }

    fn reset(&mut self) {
        AiPlayer::reset(self);
    }
}
