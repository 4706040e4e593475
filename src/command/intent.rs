//! Structured intents parsed from directive text

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Compass, GridCoord};

/// Discriminant of an `Intent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentKind {
    MoveTo,
    Face,
    ShootOnce,
    Patrol,
    Guard,
    ShootOnSight,
}

impl IntentKind {
    /// Runs until replaced by a new directive
    pub fn is_repeating(self) -> bool {
        matches!(self, Self::Patrol | Self::Guard | Self::ShootOnSight)
    }

    /// Competes for the single movement slot each tick
    pub fn is_movement(self) -> bool {
        matches!(self, Self::MoveTo | Self::Patrol | Self::Guard)
    }
}

/// One unit of parsed behavior
///
/// Serializes as `{"type": "PATROL", "params": {"cell_a": "B2", "cell_b": "B9"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// One-shot: drive to a cell center and stop
    MoveTo { cell: GridCoord },
    /// One-shot: rotate to a compass bearing
    Face { direction: Compass },
    /// One-shot: fire a single round
    ShootOnce,
    /// Repeating: shuttle between two cells forever
    Patrol { cell_a: GridCoord, cell_b: GridCoord },
    /// Repeating: hold a cell, firing on anything that shows up
    Guard { cell: GridCoord },
    /// Repeating: turn toward and fire at a visible opponent
    ShootOnSight,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::MoveTo { .. } => IntentKind::MoveTo,
            Intent::Face { .. } => IntentKind::Face,
            Intent::ShootOnce => IntentKind::ShootOnce,
            Intent::Patrol { .. } => IntentKind::Patrol,
            Intent::Guard { .. } => IntentKind::Guard,
            Intent::ShootOnSight => IntentKind::ShootOnSight,
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.kind().is_repeating()
    }

    pub fn is_movement(&self) -> bool {
        self.kind().is_movement()
    }

    /// Canonical directive text that parses back to this intent
    pub fn directive(&self) -> String {
        match self {
            Intent::MoveTo { cell } => format!("move to {cell}"),
            Intent::Face { direction } => format!("face {direction}"),
            Intent::ShootOnce => "shoot".to_string(),
            Intent::Patrol { cell_a, cell_b } => format!("patrol between {cell_a} and {cell_b}"),
            Intent::Guard { cell } => format!("guard {cell}"),
            Intent::ShootOnSight => "shoot at anything in your sight".to_string(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::MoveTo { cell } => write!(f, "MOVE_TO({cell})"),
            Intent::Face { direction } => write!(f, "FACE({direction})"),
            Intent::ShootOnce => f.write_str("SHOOT_ONCE"),
            Intent::Patrol { cell_a, cell_b } => write!(f, "PATROL({cell_a}, {cell_b})"),
            Intent::Guard { cell } => write!(f, "GUARD({cell})"),
            Intent::ShootOnSight => f.write_str("SHOOT_ON_SIGHT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let cell = GridCoord::new(1, 1);
        assert!(Intent::Patrol { cell_a: cell, cell_b: cell }.is_repeating());
        assert!(Intent::Guard { cell }.is_movement());
        assert!(Intent::ShootOnSight.is_repeating());
        assert!(!Intent::ShootOnSight.is_movement());
        assert!(!Intent::MoveTo { cell }.is_repeating());
        assert!(Intent::MoveTo { cell }.is_movement());
        assert!(!Intent::Face { direction: Compass::N }.is_movement());
        assert!(!Intent::ShootOnce.is_repeating());
    }

    #[test]
    fn test_serializes_with_type_and_params() {
        let intent = Intent::Patrol {
            cell_a: "B2".parse().unwrap(),
            cell_b: "B9".parse().unwrap(),
        };
        let json = serde_json::to_value(intent).unwrap();
        assert_eq!(json["type"], "PATROL");
        assert_eq!(json["params"]["cell_a"], "B2");
        assert_eq!(json["params"]["cell_b"], "B9");

        let back: Intent = serde_json::from_value(json).unwrap();
        assert_eq!(back, intent);
    }

    #[test]
    fn test_display() {
        let intent = Intent::Face { direction: Compass::NE };
        assert_eq!(intent.to_string(), "FACE(NE)");
        assert_eq!(intent.directive(), "face NE");
    }
}
