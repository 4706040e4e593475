//! Eight-point compass mapped onto arena headings (0 = up, clockwise)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};
use crate::core::types::normalize_heading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    /// Clockwise from north, 45 degrees apart
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    /// Every accepted spelling, longest first so prefixes never shadow
    pub const ALIASES: [(&'static str, Compass); 16] = [
        ("northeast", Compass::NE),
        ("northwest", Compass::NW),
        ("southeast", Compass::SE),
        ("southwest", Compass::SW),
        ("north", Compass::N),
        ("south", Compass::S),
        ("east", Compass::E),
        ("west", Compass::W),
        ("ne", Compass::NE),
        ("nw", Compass::NW),
        ("se", Compass::SE),
        ("sw", Compass::SW),
        ("n", Compass::N),
        ("s", Compass::S),
        ("e", Compass::E),
        ("w", Compass::W),
    ];

    /// Heading in degrees
    pub fn bearing(self) -> f32 {
        match self {
            Compass::N => 0.0,
            Compass::NE => 45.0,
            Compass::E => 90.0,
            Compass::SE => 135.0,
            Compass::S => 180.0,
            Compass::SW => 225.0,
            Compass::W => 270.0,
            Compass::NW => 315.0,
        }
    }

    /// Closest compass point to an arbitrary heading
    pub fn nearest(heading: f32) -> Self {
        let index = ((normalize_heading(heading) + 22.5) / 45.0) as usize % 8;
        Self::ALL[index]
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Compass::N => "N",
            Compass::NE => "NE",
            Compass::E => "E",
            Compass::SE => "SE",
            Compass::S => "S",
            Compass::SW => "SW",
            Compass::W => "W",
            Compass::NW => "NW",
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Compass {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(needle))
            .map(|(_, compass)| *compass)
            .ok_or_else(|| ArenaError::UnknownCompass(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_equivalent() {
        assert_eq!("northeast".parse::<Compass>().unwrap(), Compass::NE);
        assert_eq!("NE".parse::<Compass>().unwrap(), Compass::NE);
        assert_eq!("West".parse::<Compass>().unwrap(), Compass::W);
        assert!("up".parse::<Compass>().is_err());
    }

    #[test]
    fn test_bearings_step_by_45() {
        for (i, compass) in Compass::ALL.iter().enumerate() {
            assert_eq!(compass.bearing(), i as f32 * 45.0);
        }
    }

    #[test]
    fn test_nearest() {
        assert_eq!(Compass::nearest(10.0), Compass::N);
        assert_eq!(Compass::nearest(350.0), Compass::N);
        assert_eq!(Compass::nearest(100.0), Compass::E);
        assert_eq!(Compass::nearest(-90.0), Compass::W);
    }
}
