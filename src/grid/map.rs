//! Terrain passability
//!
//! The command core only needs to ask whether a cell can be entered. How a
//! level was built is not its concern; `ObstacleMap` is the in-memory
//! implementation the runtime and tests use.

use serde::{Deserialize, Serialize};

use crate::grid::coord::{GridCoord, GridSpec};

/// Grid passability oracle
///
/// Cells outside `0..columns` x `0..rows` must report impassable.
pub trait Passability: Send + Sync {
    fn is_passable(&self, column: i32, row: i32) -> bool;
    fn columns(&self) -> u32;
    fn rows(&self) -> u32;

    fn in_bounds(&self, column: i32, row: i32) -> bool {
        column >= 0 && row >= 0 && (column as u32) < self.columns() && (row as u32) < self.rows()
    }
}

/// Dense blocked-cell bitmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleMap {
    columns: u32,
    rows: u32,
    blocked: Vec<bool>,
}

impl ObstacleMap {
    /// A map with no obstacles
    pub fn open(spec: &GridSpec) -> Self {
        let columns = spec.columns as u32;
        let rows = spec.rows as u32;
        Self {
            columns,
            rows,
            blocked: vec![false; (columns * rows) as usize],
        }
    }

    /// Build from ASCII rows: `#` blocks a cell, anything else is open
    ///
    /// Missing rows or short rows are treated as open.
    pub fn from_rows(spec: &GridSpec, rows: &[&str]) -> Self {
        let mut map = Self::open(spec);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == '#' {
                    map.set_blocked(c as i32, r as i32, true);
                }
            }
        }
        map
    }

    pub fn block(&mut self, coord: GridCoord) {
        self.set_blocked(coord.column as i32, coord.row as i32, true);
    }

    /// Block a rectangle of cells starting at `origin`; cells past the edge are ignored
    pub fn block_span(&mut self, origin: GridCoord, span_columns: u8, span_rows: u8) {
        for dr in 0..span_rows as i32 {
            for dc in 0..span_columns as i32 {
                self.set_blocked(origin.column as i32 + dc, origin.row as i32 + dr, true);
            }
        }
    }

    pub fn set_blocked(&mut self, column: i32, row: i32, blocked: bool) {
        if let Some(idx) = self.index(column, row) {
            self.blocked[idx] = blocked;
        }
    }

    pub fn blocked_cells(&self) -> Vec<GridCoord> {
        let mut cells = Vec::new();
        for row in 0..self.rows {
            for column in 0..self.columns {
                if !self.is_passable(column as i32, row as i32) {
                    cells.push(GridCoord::new(column as u8, row as u8));
                }
            }
        }
        cells
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        if !self.in_bounds(column, row) {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }
}

impl Passability for ObstacleMap {
    fn is_passable(&self, column: i32, row: i32) -> bool {
        self.index(column, row).is_some_and(|idx| !self.blocked[idx])
    }

    fn columns(&self) -> u32 {
        self.columns
    }

    fn rows(&self) -> u32 {
        self.rows
    }
}
