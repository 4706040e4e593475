//! Arena configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every struct deserializes from TOML
//! with per-field defaults, so a config file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};
use crate::grid::GridSpec;

/// Top-level configuration for one arena
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub grid: GridSpec,
    pub executor: ExecutorConfig,
    pub avoidance: AvoidanceConfig,
    pub body: BodyConfig,
}

impl ArenaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.executor.validate()?;
        self.avoidance.validate()?;
        self.body.validate()
    }
}

/// Tuning for the per-entity command executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Distance (pixels) below which a waypoint counts as reached
    ///
    /// A quarter of a cell. Must stay above the per-tick travel distance
    /// (body speed) or the entity can step over the arrival disc.
    pub arrive_distance: f32,

    /// Angular error (degrees) above which the executor issues a rotation
    pub aim_threshold: f32,

    /// Angular error (degrees) below which the entity may still advance
    ///
    /// Between aim_threshold and move_angle the entity turns and drives at
    /// the same time. Above move_angle it turns in place, which keeps the
    /// distance to the waypoint from growing.
    pub move_angle: f32,

    /// Angular error (degrees) inside which firing is allowed
    ///
    /// Tighter than aim_threshold: the entity never fires while it is
    /// still turning toward the target.
    pub fire_threshold: f32,

    /// Angular error (degrees) at which a FACE intent is complete
    pub face_tolerance: f32,

    /// Guard post radius as a multiple of arrive_distance
    ///
    /// Outside this radius GUARD is "returning to post"; inside it holds.
    pub guard_radius_factor: f32,

    /// Total field-of-view cone in degrees (target must be within +/- half)
    pub fov_degrees: f32,

    /// Maximum sighting distance in pixels
    pub max_range: f32,

    /// Projectile spawn offset ahead of the entity center, in cells
    pub barrel_offset_factor: f32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            arrive_distance: 25.0,
            aim_threshold: 8.0,
            move_angle: 30.0,
            fire_threshold: 5.0,
            face_tolerance: 5.0,
            guard_radius_factor: 1.6,
            fov_degrees: 120.0,
            max_range: 800.0,
            barrel_offset_factor: 0.45,
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.arrive_distance <= 0.0 {
            return Err(ArenaError::InvalidConfig(
                "arrive_distance must be positive".into(),
            ));
        }
        if self.fire_threshold > self.aim_threshold {
            return Err(ArenaError::InvalidConfig(format!(
                "fire_threshold ({}) should be <= aim_threshold ({})",
                self.fire_threshold, self.aim_threshold
            )));
        }
        if self.aim_threshold >= self.move_angle {
            return Err(ArenaError::InvalidConfig(format!(
                "aim_threshold ({}) should be < move_angle ({})",
                self.aim_threshold, self.move_angle
            )));
        }
        if !(0.0..=360.0).contains(&self.fov_degrees) {
            return Err(ArenaError::InvalidConfig(format!(
                "fov_degrees ({}) must be within 0..=360",
                self.fov_degrees
            )));
        }
        Ok(())
    }

    /// Radius around a guard point inside which the entity holds position
    pub fn guard_radius(&self) -> f32 {
        self.arrive_distance * self.guard_radius_factor
    }
}

/// Tuning for the obstacle avoidance sensor ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidanceConfig {
    /// How far ahead the forward probe reaches (pixels)
    pub sense_radius: f32,

    /// Obstacles closer than this suppress forward motion while steering
    pub inner_radius: f32,

    /// Sample points per probe ray
    pub probe_steps: u32,

    /// Offsets (degrees) surveyed on each side when the path is blocked
    pub side_angles: Vec<f32>,

    /// Clear-probe advantage the opposite side needs to break a commitment
    ///
    /// At 2, a near-symmetric obstacle (scores differing by one probe every
    /// other tick) never flips the committed direction.
    pub hysteresis: u32,

    /// Ticks to keep steering after the forward probe reports clear
    pub clear_grace: u32,

    /// Half-width of the square hitbox projected by every probe (pixels)
    pub hitbox_half: f32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            sense_radius: 170.0,
            inner_radius: 100.0,
            probe_steps: 5,
            side_angles: vec![30.0, 60.0, 90.0],
            hysteresis: 2,
            clear_grace: 6,
            hitbox_half: 36.0,
        }
    }
}

impl AvoidanceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.probe_steps == 0 {
            return Err(ArenaError::InvalidConfig(
                "probe_steps must be at least 1".into(),
            ));
        }
        if self.inner_radius > self.sense_radius {
            return Err(ArenaError::InvalidConfig(format!(
                "inner_radius ({}) should be <= sense_radius ({})",
                self.inner_radius, self.sense_radius
            )));
        }
        if self.side_angles.is_empty() {
            return Err(ArenaError::InvalidConfig(
                "side_angles must list at least one offset".into(),
            ));
        }
        Ok(())
    }
}

/// Minimal tank kinematics used by the arena runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Pixels travelled per FORWARD/BACKWARD tick
    pub speed: f32,

    /// Degrees turned per ROTATE tick
    pub rotation_speed: f32,

    /// Minimum ticks between two accepted SHOOT commands (400 ms at 30 Hz)
    pub fire_cooldown_ticks: u32,

    pub max_health: u32,

    /// Half-width of the square collision box (pixels)
    pub hitbox_half: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            rotation_speed: 3.0,
            fire_cooldown_ticks: 12,
            max_health: 3,
            hitbox_half: 36.0,
        }
    }
}

impl BodyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.speed <= 0.0 || self.rotation_speed <= 0.0 {
            return Err(ArenaError::InvalidConfig(
                "speed and rotation_speed must be positive".into(),
            ));
        }
        if self.max_health == 0 {
            return Err(ArenaError::InvalidConfig("max_health must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ArenaConfig::from_toml_str(
            r#"
            [grid]
            columns = 10
            rows = 8

            [avoidance]
            clear_grace = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.columns, 10);
        assert_eq!(config.grid.rows, 8);
        assert_eq!(config.grid.cell_size, 100.0);
        assert_eq!(config.avoidance.clear_grace, 3);
        assert_eq!(config.avoidance.hysteresis, 2);
        assert_eq!(config.executor, ExecutorConfig::default());
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        let mut config = ArenaConfig::default();
        config.executor.fire_threshold = 20.0;
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_inner_radius_bounded_by_sense_radius() {
        let err = ArenaConfig::from_toml_str("[avoidance]\ninner_radius = 500.0\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_guard_radius() {
        let exec = ExecutorConfig::default();
        assert!((exec.guard_radius() - 40.0).abs() < 1e-4);
    }
}
