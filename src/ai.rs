// Probability-density scoring for the opponent grid.
// Integer window counts, no floating point, no_std.

use alloc::vec;
use alloc::vec::Vec;
use rand::Rng;

use crate::{bitboard::BitBoard, common::Coord, ship::Orientation};

/// Per-cell placement counts over a square grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Density {
    size: usize,
    scores: Vec<u32>,
}

impl Density {
    /// Side length of the scored grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Score of (`row`, `col`); zero off the board.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        if row < self.size && col < self.size {
            self.scores[row * self.size + col]
        } else {
            0
        }
    }

    /// Highest score on the grid.
    pub fn max(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }
}

/// Count, for every untried cell, how many horizontal and vertical windows
/// of each remaining ship size cover it without touching a known miss.
///
/// Tried cells (hits and misses) always score zero.
pub fn calc_pdf(hits: &BitBoard, misses: &BitBoard, remaining_lengths: &[usize]) -> Density {
    let n = misses.size();
    let mut scores = vec![0u32; n * n];

    for &len in remaining_lengths.iter() {
        if len == 0 || len > n {
            continue;
        }

        for orient in Orientation::ALL {
            let max_row = if orient == Orientation::Vertical { n - len + 1 } else { n };
            let max_col = if orient == Orientation::Horizontal { n - len + 1 } else { n };
            for r in 0..max_row {
                for c in 0..max_col {
                    let blocked = (0..len).any(|k| {
                        let (rr, cc) = orient.step(r, c, k);
                        misses.contains(rr, cc)
                    });
                    if blocked {
                        continue;
                    }
                    for k in 0..len {
                        let (rr, cc) = orient.step(r, c, k);
                        if !hits.contains(rr, cc) {
                            scores[rr * n + cc] += 1;
                        }
                    }
                }
            }
        }
    }

    Density { size: n, scores }
}

/// Choose uniformly among the untried cells with the highest score.
///
/// When nothing scores (every window is blocked) any untried cell is fair
/// game. Returns `None` only when every cell has been tried.
pub fn pick_best<R: Rng + ?Sized>(density: &Density, tried: &BitBoard, rng: &mut R) -> Option<Coord> {
    let n = density.size();
    let untried: Vec<Coord> = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .filter(|&(r, c)| !tried.contains(r, c))
        .collect();
    if untried.is_empty() {
        return None;
    }

    let best = untried
        .iter()
        .map(|&(r, c)| density.get(r, c))
        .max()
        .unwrap_or(0);
    let candidates: Vec<Coord> = if best == 0 {
        untried
    } else {
        untried
            .into_iter()
            .filter(|&(r, c)| density.get(r, c) == best)
            .collect()
    };
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// Convenience wrapper that scores the grid and immediately picks a target.
pub fn calc_pdf_and_guess<R: Rng + ?Sized>(
    hits: &BitBoard,
    misses: &BitBoard,
    lengths: &[usize],
    rng: &mut R,
) -> Option<Coord> {
    let density = calc_pdf(hits, misses, lengths);
    pick_best(&density, &(hits | misses), rng)
}
