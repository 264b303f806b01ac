use glam::Vec2;
use thiserror::Error;

use crate::config::{CELL_SIZE, LEVEL, LEVEL_HEIGHT, LEVEL_WIDTH};

#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("map must have at least one row and one column (got {width}x{height})")]
    Empty { width: usize, height: usize },
    #[error("cell size must be a positive finite number (got {0})")]
    BadCellSize(f32),
    #[error("expected {expected} cells for the map size, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("row {row} has {len} cells, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },
}

/// Row-major occupancy grid. 0 is empty, anything else is a wall id.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: usize,
    height: usize,
    cell_size: f32,
    cells: Vec<u8>,
}

impl GridMap {
    pub fn new(width: usize, height: usize, cell_size: f32, cells: Vec<u8>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty { width, height });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(MapError::BadCellSize(cell_size));
        }
        if cells.len() != width * height {
            return Err(MapError::SizeMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cell_size,
            cells,
        })
    }

    pub fn from_rows(rows: &[&[u8]], cell_size: f32) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, cols) in rows.iter().enumerate() {
            if cols.len() != width {
                return Err(MapError::RaggedRow {
                    row,
                    len: cols.len(),
                    width,
                });
            }
            cells.extend_from_slice(cols);
        }
        Self::new(width, rows.len(), cell_size, cells)
    }

    /// The built-in level from `config`.
    pub fn level() -> Result<Self, MapError> {
        Self::new(LEVEL_WIDTH, LEVEL_HEIGHT, CELL_SIZE, LEVEL.to_vec())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell value at (col, row), `None` outside the grid.
    #[inline]
    pub fn cell(&self, col: i32, row: i32) -> Option<u8> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Grid index of a world-pixel position. Floors, so anything left of or above the
    /// grid lands on a negative index instead of cell 0.
    #[inline]
    pub fn cell_index(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_at(&self, pos: Vec2) -> Option<u8> {
        let (col, row) = self.cell_index(pos);
        self.cell(col, row)
    }

    /// True when `pos` lies inside the grid on an empty cell.
    pub fn is_open(&self, pos: Vec2) -> bool {
        self.cell_at(pos) == Some(0)
    }

    /// Iterate `(col, row, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % self.width, i / self.width, v))
    }
}
