//! A square bitboard whose side length is chosen at runtime.
//!
//! The board is `no_std` friendly and stores an `N×N` grid packed into a
//! vector of unsigned words `T`. It backs the attack strategy's belief sets
//! (confirmed hits and misses), so the operations are the ones those sets
//! need: membership, insertion, counting, iteration and the set algebra
//! used to derive the untried cells.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{BitAnd, BitOr};
use core::{any, fmt};
use num_traits::{PrimInt, Unsigned, Zero};

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBoardError {
    /// Row or column index is out of bounds [0..N).
    IndexOutOfBounds { row: usize, col: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::IndexOutOfBounds { row, col } => {
                write!(f, "IndexOutOfBounds: row={}, col={}", row, col)
            }
        }
    }
}

/// An N×N bitboard stored in words of the unsigned integer `T`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitBoard<T = u64>
where
    T: PrimInt + Unsigned + Zero,
{
    size: usize,
    words: Vec<T>,
}

impl<T> BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn word_bits() -> usize {
        T::zero().count_zeros() as usize
    }

    /// Create a new empty `size×size` bitboard.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        let words = cells.div_ceil(Self::word_bits());
        BitBoard {
            size,
            words: vec![T::zero(); words],
        }
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| w.is_zero())
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        let (word, bit) = self.locate(row, col)?;
        Ok(((self.words[word] >> bit) & T::one()) != T::zero())
    }

    /// Bounds-free membership test; anything off the board is unset.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.get(row, col).unwrap_or(false)
    }

    /// Sets the bit at (row, col) to 1. Returns `true` if it was previously unset.
    pub fn set(&mut self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        let (word, bit) = self.locate(row, col)?;
        let flag = T::one() << bit;
        let fresh = (self.words[word] & flag).is_zero();
        self.words[word] = self.words[word] | flag;
        Ok(fresh)
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        for w in self.words.iter_mut() {
            *w = T::zero();
        }
    }

    /// True when no position is set on both boards.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| (*a & *b).is_zero())
    }

    /// True when every position set here is also set in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| (*a & !*b).is_zero())
    }

    #[inline]
    fn locate(&self, row: usize, col: usize) -> Result<(usize, usize), BitBoardError> {
        if row >= self.size || col >= self.size {
            return Err(BitBoardError::IndexOutOfBounds { row, col });
        }
        let idx = row * self.size + col;
        Ok((idx / Self::word_bits(), idx % Self::word_bits()))
    }

    /// Creates a bitboard from an iterator over `(row, col)` positions.
    pub fn from_iter<I>(size: usize, iter: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut board = Self::new(size);
        for (r, c) in iter {
            board.set(r, c)?;
        }
        Ok(board)
    }

    /// Iterator over the set bits of the board in row-major order.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T> {
        SetBits {
            board: self,
            idx: 0,
        }
    }

    fn zip_with(&self, rhs: &Self, op: impl Fn(T, T) -> T) -> Self {
        debug_assert_eq!(self.size, rhs.size, "bitboard sizes differ");
        BitBoard {
            size: self.size,
            words: self
                .words
                .iter()
                .zip(rhs.words.iter())
                .map(|(a, b)| op(*a, *b))
                .collect(),
        }
    }
}

impl<T> fmt::Debug for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}>({}x{}):", any::type_name::<T>(), self.size, self.size)?;
        fmt::Display::fmt(self, f)?;
        writeln!(f)
    }
}

impl<T> fmt::Display for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let bit = if self.contains(r, c) { '■' } else { '□' };
                write!(f, "{} ", bit)?;
            }
            if r + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set bits of a bitboard.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T>,
    idx: usize,
}

impl<T> Iterator for SetBits<'_, T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.board.size;
        while self.idx < n * n {
            let idx = self.idx;
            self.idx += 1;
            let (r, c) = (idx / n, idx % n);
            if self.board.contains(r, c) {
                return Some((r, c));
            }
        }
        None
    }
}

/// Union of two equally sized bitboards.
impl<T> BitOr for &BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn bitor(self, rhs: Self) -> BitBoard<T> {
        self.zip_with(rhs, |a, b| a | b)
    }
}

/// Intersection of two equally sized bitboards.
impl<T> BitAnd for &BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn bitand(self, rhs: Self) -> BitBoard<T> {
        self.zip_with(rhs, |a, b| a & b)
    }
}
