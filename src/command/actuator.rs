//! Low-level actuator vocabulary consumed by the physics layer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};

/// One discrete instruction applied for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorCommand {
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
    Shoot,
    Stop,
}

impl ActuatorCommand {
    pub const ALL: [ActuatorCommand; 6] = [
        ActuatorCommand::Forward,
        ActuatorCommand::Backward,
        ActuatorCommand::RotateLeft,
        ActuatorCommand::RotateRight,
        ActuatorCommand::Shoot,
        ActuatorCommand::Stop,
    ];

    pub fn is_rotation(self) -> bool {
        matches!(self, Self::RotateLeft | Self::RotateRight)
    }

    /// Translation commands (the ones a single movement intent may own)
    pub fn is_motion(self) -> bool {
        matches!(self, Self::Forward | Self::Backward)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::RotateLeft => "rotate_left",
            Self::RotateRight => "rotate_right",
            Self::Shoot => "shoot",
            Self::Stop => "stop",
        }
    }

    /// Rotation toward a signed angular error (positive = clockwise)
    pub fn rotate_toward(error: f32) -> Self {
        if error > 0.0 {
            Self::RotateRight
        } else {
            Self::RotateLeft
        }
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActuatorCommand {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ArenaError::UnknownActuator(s.to_string()))
    }
}
