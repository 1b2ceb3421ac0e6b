//! Square board of cells with wrap-around edges.
//!
//! The board is a torus: stepping off the left edge lands on the right one,
//! stepping off the top lands on the bottom. Storage is a flat row-major
//! `Vec<Cell>` of `size * size` entries.

use std::{fmt, str::FromStr};

use rand::{
    rngs::{StdRng, ThreadRng},
    Rng,
};
use tracing::debug;

use crate::error::GridError;

/// Moore neighbourhood offsets as `(d_row, d_col)`.
pub const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (1, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
];

/// State of one cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }
}

impl From<bool> for Cell {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

/// Source of uniform integers used to seed a grid.
pub trait RandomSource {
    /// Uniform draw from `[0, bound)`. `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;
}

impl RandomSource for StdRng {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

impl RandomSource for ThreadRng {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Maps `coord + offset` onto `[0, size)`, wrapping in both directions.
#[inline]
pub fn wrap(coord: usize, offset: isize, size: usize) -> usize {
    (coord as isize + offset).rem_euclid(size as isize) as usize
}

/// Fixed `size * size` board; its dimensions never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-dead grid of `size * size` cells.
    #[inline]
    pub fn new(size: usize) -> Result<Self, GridError> {
        Self::filled(size, Cell::Dead)
    }

    pub fn filled(size: usize, fill: Cell) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::InvalidDimension { size });
        }
        let len = size
            .checked_mul(size)
            .ok_or(GridError::TooLarge { size })?;
        Ok(Grid {
            size,
            cells: vec![fill; len],
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` is not below [`Grid::size`].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` is not below [`Grid::size`].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        let i = self.index(row, col);
        self.cells[i] = value;
    }

    /// Rows in order, each a slice of `size` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Marks `count` uniformly drawn cells alive.
    ///
    /// Draws may repeat, so the grid ends up with at most `count` live cells.
    pub fn seed<R: RandomSource + ?Sized>(&mut self, count: usize, source: &mut R) {
        if count > self.cell_count() {
            debug!(
                requested = count,
                cells = self.cell_count(),
                "seed count exceeds cell count"
            );
        }
        for _ in 0..count {
            let row = source.below(self.size);
            let col = source.below(self.size);
            self.set(row, col, Cell::Alive);
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.cells.iter().all(|c| !c.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Coordinate reached from `(row, col)` by `offset`, across the edges.
    #[inline]
    pub fn neighbor(&self, row: usize, col: usize, offset: (isize, isize)) -> (usize, usize) {
        (wrap(row, offset.0, self.size), wrap(col, offset.1, self.size))
    }

    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        NEIGHBOURS
            .iter()
            .map(|&d| self.neighbor(row, col, d))
            .filter(|&(r, c)| self.get(r, c).is_alive())
            .count() as u8
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "({row}, {col}) outside {0}x{0} grid",
            self.size
        );
        row * self.size + col
    }
}

/// Parses a square text pattern.
///
/// `_`, `.` and `0` are dead, whitespace is ignored, anything else is alive.
/// Blank lines are skipped, so a rendered frame parses back into its grid.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data: Vec<Vec<Cell>> = s
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| Cell::from(!matches!(c, '_' | '.' | '0')))
                    .collect::<Vec<_>>()
            })
            .filter(|r| !r.is_empty())
            .collect();

        let size = data.len();
        let mut grid = Grid::new(size)?;
        for (i, r) in data.into_iter().enumerate() {
            if r.len() != size {
                return Err(GridError::NotSquare {
                    row: i,
                    len: r.len(),
                    expected: size,
                });
            }
            for (j, c) in r.into_iter().enumerate() {
                grid.set(i, j, c);
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in self.rows() {
            for c in r {
                f.write_str(if c.is_alive() { "o" } else { "_" })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
