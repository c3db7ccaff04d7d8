use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Generation(pub u32);

impl Generation {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn increment_self(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum Cell {
    Dead,
    Alive,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Dead
    }
}

// (row, col) offsets: [nw, n, ne, w, e, sw, s, se]
const NEIGHBORHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A fixed size toroidal matrix of cells, stored row-major.
///
/// Every coordinate passed to a `Grid` wraps around its edges, so the grid
/// has no border and every cell has exactly eight neighbor positions. On an
/// axis of length one or two those positions coincide: each position is
/// still counted once, so a lone live cell on a 1x1 grid sees itself eight
/// times and a neighbor on a 2-wide axis is seen twice.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a `rows` x `cols` grid with every cell dead.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Dead; len],
        })
    }

    /// Builds a grid from ASCII rows, `#`, `O` or `1` for alive and `.`, `0`
    /// or a space for dead. All rows must have the same width.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let cols = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        let mut grid = Self::new(rows.len(), cols)?;
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != cols {
                return Err(Error::InvalidPattern(format!(
                    "row {} is {} cells wide, expected {}",
                    row,
                    line.chars().count(),
                    cols
                )));
            }
            for (col, glyph) in line.chars().enumerate() {
                let cell = match glyph {
                    '#' | 'O' | '1' => Cell::Alive,
                    '.' | '0' | ' ' => Cell::Dead,
                    other => {
                        return Err(Error::InvalidPattern(format!(
                            "unexpected glyph {:?} at row {} col {}",
                            other, row, col
                        )))
                    }
                };
                grid.set(row, col, cell);
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.cell_index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let index = self.cell_index(row, col);
        self.cells[index] = cell;
    }

    /// Iterates `((row, col), cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| ((index / cols, index % cols), *cell))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Sets each cell alive independently when a uniform draw in `[0, 1)` is
    /// at least `1 - probability_alive`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, probability_alive: f64) {
        let threshold = 1.0 - probability_alive.max(0.0).min(1.0);
        for cell in self.cells.iter_mut() {
            *cell = if rng.gen::<f64>() >= threshold {
                Cell::Alive
            } else {
                Cell::Dead
            };
        }
    }

    pub fn fill_all(&mut self) {
        self.fill(Cell::Alive);
    }

    pub fn clear_all(&mut self) {
        self.fill(Cell::Dead);
    }

    fn fill(&mut self, cell: Cell) {
        for slot in self.cells.iter_mut() {
            *slot = cell;
        }
    }

    /// Number of live cells among the eight wrapped neighbor positions of
    /// `(row, col)`, always in `0..=8`.
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        NEIGHBORHOOD
            .iter()
            .map(|&(relative_row, relative_col)| {
                let (row, col) = self.offset(row, col, relative_row, relative_col);
                self.get(row, col)
            })
            .filter(|cell| cell.is_alive())
            .count() as u8
    }

    /// Computes the next generation into a fresh grid. `self` is only read,
    /// so every neighbor count sees the previous generation.
    pub fn advance(&self) -> Grid {
        let cells = (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .map(|(row, col)| next_state(self.get(row, col), self.live_neighbors(row, col)))
            .collect();
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    fn offset(
        &self,
        row: usize,
        col: usize,
        relative_row: isize,
        relative_col: isize,
    ) -> (usize, usize) {
        (
            wrap(row, relative_row, self.rows),
            wrap(col, relative_col, self.cols),
        )
    }

    fn cell_index(&self, row: usize, col: usize) -> usize {
        (row % self.rows) * self.cols + (col % self.cols)
    }
}

fn wrap(index: usize, relative: isize, len: usize) -> usize {
    let index = index % len;
    match relative {
        -1 => (index + len - 1) % len,
        1 => (index + 1) % len,
        _ => index,
    }
}

fn next_state(cell: Cell, live_neighbors: u8) -> Cell {
    match (cell, live_neighbors) {
        (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive,
        (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Cells whose state differs between two generations of the same size, as
/// `((row, col), new_state)`.
pub fn changes<'a>(
    previous: &'a Grid,
    next: &'a Grid,
) -> impl Iterator<Item = ((usize, usize), Cell)> + 'a {
    debug_assert_eq!((previous.rows, previous.cols), (next.rows, next.cols));
    previous
        .iter()
        .zip(next.cells.iter())
        .filter(|((_, before), after)| before != *after)
        .map(|((position, _), after)| (position, *after))
}
