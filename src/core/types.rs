//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Arena tick counter (one physics frame)
pub type Tick = u64;

/// Which side of the arena an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    Player1,
    Player2,
}

impl PlayerSlot {
    pub fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Player1 => "player1",
            Self::Player2 => "player2",
        }
    }
}

/// 2D position in pixel/world units (y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along a heading (0 = up, clockwise-positive)
    pub fn from_heading(heading_deg: f32) -> Self {
        let rad = heading_deg.to_radians();
        Self {
            x: rad.sin(),
            y: -rad.cos(),
        }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Normalize any angle in degrees into [0, 360)
pub fn normalize_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Read-only view of one entity for a single tick
///
/// Produced by the physics layer; the command core never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub position: Vec2,
    /// Degrees, 0 = up, clockwise-positive, always in [0, 360)
    pub heading: f32,
    pub alive: bool,
}

impl EntitySnapshot {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            heading: normalize_heading(heading),
            alive: true,
        }
    }

    /// Snapshot of an entity that is no longer in play
    pub fn dead(x: f32, y: f32, heading: f32) -> Self {
        Self {
            alive: false,
            ..Self::new(x, y, heading)
        }
    }
}
