//! Grid storage with double buffering.
//!
//! Cells are stored row-major, one byte each: 0 = dead, 1-4 = owning team.
//! Two same-shaped buffers are kept so a generation can be written without
//! allocating; flipping the active index swaps them in constant time.

use crate::types::DEAD;

// ============================================================================
// GRID
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// All-dead grid of the given size
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![DEAD; cols * rows],
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Caller must pass in-grid coordinates.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[self.idx(x, y)]
    }

    /// Caller must pass in-grid coordinates.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, state: u8) {
        let i = self.idx(x, y);
        self.cells[i] = state;
    }

    /// Bounds-checked read for coordinates coming from outside the core
    pub fn try_get(&self, x: usize, y: usize) -> Option<u8> {
        if self.contains(x, y) {
            Some(self.get(x, y))
        } else {
            None
        }
    }

    /// Read with toroidal wrapping; `dx`/`dy` are offsets in -1..=1
    #[inline]
    pub fn get_wrapped(&self, x: usize, y: usize, dx: isize, dy: isize) -> u8 {
        let nx = wrap(x, dx, self.cols);
        let ny = wrap(y, dy, self.rows);
        self.get(nx, ny)
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn fill(&mut self, state: u8) {
        self.cells.fill(state);
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.cols == other.cols && self.rows == other.rows
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == DEAD)
    }
}

/// `(pos + delta) mod len` without going negative
#[inline]
pub fn wrap(pos: usize, delta: isize, len: usize) -> usize {
    let shifted = pos as isize + delta + len as isize;
    (shifted as usize) % len
}

// ============================================================================
// DOUBLE BUFFER
// ============================================================================

/// Two grids plus an active index: read from the active one, write the other, then flip.
#[derive(Clone, Debug)]
pub struct GridBuffers {
    buffers: [Grid; 2],
    active: usize,
}

impl GridBuffers {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            buffers: [Grid::new(cols, rows), Grid::new(cols, rows)],
            active: 0,
        }
    }

    pub fn current(&self) -> &Grid {
        &self.buffers[self.active]
    }

    pub fn current_mut(&mut self) -> &mut Grid {
        &mut self.buffers[self.active]
    }

    /// (read, write) pair for computing the next generation
    pub fn split(&mut self) -> (&Grid, &mut Grid) {
        let [a, b] = &mut self.buffers;
        if self.active == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        }
    }

    /// Make the written buffer current (no allocation, just flip the index)
    pub fn swap(&mut self) {
        self.active ^= 1;
    }
}
