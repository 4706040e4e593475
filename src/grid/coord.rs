//! Grid coordinates ("B5") and their mapping onto pixel space
//!
//! Columns are lettered from A, rows numbered from 1. Cell A1 has its
//! top-left corner at pixel (0, 0); y grows downward.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};
use crate::core::types::Vec2;

/// Arena extent and cell size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub columns: u8,
    pub rows: u8,
    /// Width and height of one cell in pixels
    pub cell_size: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        // 18 x 12 cells of 100px: an 1800 x 1200 arena, columns A-R
        Self {
            columns: 18,
            rows: 12,
            cell_size: 100.0,
        }
    }
}

impl GridSpec {
    pub fn new(columns: u8, rows: u8, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.columns > 26 {
            return Err(ArenaError::InvalidConfig(format!(
                "grid columns ({}) must be within 1..=26 (one letter each)",
                self.columns
            )));
        }
        if self.rows == 0 || self.rows > 99 {
            return Err(ArenaError::InvalidConfig(format!(
                "grid rows ({}) must be within 1..=99 (two digits at most)",
                self.rows
            )));
        }
        if self.cell_size <= 0.0 {
            return Err(ArenaError::InvalidConfig("cell_size must be positive".into()));
        }
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Is this coordinate inside the arena?
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.column < self.columns && coord.row < self.rows
    }

    /// Parse coordinate text and check it against the arena bounds
    pub fn parse_coord(&self, text: &str) -> Result<GridCoord> {
        let coord: GridCoord = text.parse()?;
        if !self.contains(coord) {
            return Err(ArenaError::OutOfBounds {
                coord: coord.to_string(),
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(coord)
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, coord: GridCoord) -> Vec2 {
        let half = self.cell_size / 2.0;
        Vec2::new(
            coord.column as f32 * self.cell_size + half,
            coord.row as f32 * self.cell_size + half,
        )
    }

    /// Raw (column, row) index under a pixel; may lie outside the arena
    pub fn cell_index(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Cell under a pixel, clamped to the arena
    pub fn cell_at(&self, position: Vec2) -> GridCoord {
        let (col, row) = self.cell_index(position.x, position.y);
        GridCoord {
            column: col.clamp(0, self.columns as i32 - 1) as u8,
            row: row.clamp(0, self.rows as i32 - 1) as u8,
        }
    }

    /// In-bounds cells within a square radius, excluding the center cell
    pub fn cells_near(&self, center: GridCoord, radius: u8) -> Vec<GridCoord> {
        let radius = radius as i32;
        let mut cells = Vec::new();
        for dc in -radius..=radius {
            for dr in -radius..=radius {
                if dc == 0 && dr == 0 {
                    continue;
                }
                let col = center.column as i32 + dc;
                let row = center.row as i32 + dr;
                if col < 0 || row < 0 || col >= self.columns as i32 || row >= self.rows as i32 {
                    continue;
                }
                cells.push(GridCoord::new(col as u8, row as u8));
            }
        }
        cells
    }
}

/// A cell address: zero-based column and row
///
/// Text form is the column letter followed by the one-based row ("B5").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridCoord {
    pub column: u8,
    pub row: u8,
}

impl GridCoord {
    pub fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    pub fn letter(&self) -> char {
        (b'A' + self.column) as char
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.row as u32 + 1)
    }
}

impl FromStr for GridCoord {
    type Err = ArenaError;

    /// Accepts "B5", "b12" and "cell B5"; bounds are not checked here
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ArenaError::InvalidCoordinate(s.to_string());

        let mut text = s.trim();
        let has_prefix = text
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("cell"));
        if has_prefix && text.len() > 4 {
            let rest = &text[4..];
            if !rest.starts_with(char::is_whitespace) {
                return Err(invalid());
            }
            text = rest.trim_start();
        }

        let mut chars = text.chars();
        let letter = chars.next().filter(char::is_ascii_alphabetic).ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u8 = digits.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }

        Ok(Self {
            column: letter.to_ascii_uppercase() as u8 - b'A',
            row: number - 1,
        })
    }
}

impl From<GridCoord> for String {
    fn from(coord: GridCoord) -> Self {
        coord.to_string()
    }
}

impl TryFrom<String> for GridCoord {
    type Error = ArenaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let coord: GridCoord = "b5".parse().unwrap();
        assert_eq!(coord, GridCoord::new(1, 4));
        assert_eq!(coord.to_string(), "B5");

        let prefixed: GridCoord = "Cell R12".parse().unwrap();
        assert_eq!(prefixed, GridCoord::new(17, 11));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "5B", "B", "B0", "B123", "BB5", "cellB5", "B-1"] {
            assert!(bad.parse::<GridCoord>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_bounds_are_configurable() {
        let spec = GridSpec::default();
        assert!(spec.parse_coord("R12").is_ok());
        assert!(matches!(
            spec.parse_coord("S1"),
            Err(ArenaError::OutOfBounds { .. })
        ));
        assert!(spec.parse_coord("A13").is_err());

        let wide = GridSpec::new(26, 20, 50.0);
        assert!(wide.parse_coord("Z20").is_ok());
    }

    #[test]
    fn test_cell_center() {
        let spec = GridSpec::default();
        let center = spec.cell_center("B5".parse().unwrap());
        assert_eq!(center, Vec2::new(150.0, 450.0));
    }

    #[test]
    fn test_pixel_to_cell_is_clamped() {
        let spec = GridSpec::default();
        assert_eq!(spec.cell_at(Vec2::new(150.0, 450.0)).to_string(), "B5");
        assert_eq!(spec.cell_at(Vec2::new(-40.0, -1.0)).to_string(), "A1");
        assert_eq!(spec.cell_at(Vec2::new(5000.0, 5000.0)).to_string(), "R12");
    }

    #[test]
    fn test_center_round_trip_is_lossless() {
        let spec = GridSpec::default();
        for col in 0..spec.columns {
            for row in 0..spec.rows {
                let coord = GridCoord::new(col, row);
                assert_eq!(spec.cell_at(spec.cell_center(coord)), coord);
            }
        }
    }

    #[test]
    fn test_cells_near_corner() {
        let spec = GridSpec::default();
        let near = spec.cells_near(GridCoord::new(0, 0), 1);
        assert_eq!(near.len(), 3);
        assert!(!near.contains(&GridCoord::new(0, 0)));
    }

    #[test]
    fn test_serde_as_text() {
        let coord = GridCoord::new(8, 5);
        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, "\"I6\"");
        let back: GridCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, coord);
    }
}
