//! Sensor-ring probes
//!
//! A probe slides the entity's square hitbox along a ray and reports the
//! first sample distance at which any corner lands on an impassable cell.

use serde::{Deserialize, Serialize};

use crate::command::actuator::ActuatorCommand;
use crate::core::config::AvoidanceConfig;
use crate::core::types::{normalize_heading, Vec2};
use crate::grid::{GridSpec, Passability};
use crate::navigation::geometry::{angle_error, bearing_to};

/// Side the avoider steers toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    pub fn command(self) -> ActuatorCommand {
        match self {
            Steer::Left => ActuatorCommand::RotateLeft,
            Steer::Right => ActuatorCommand::RotateRight,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Steer::Left => Steer::Right,
            Steer::Right => Steer::Left,
        }
    }
}

/// Outcome of one probe ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub blocked: bool,
    /// Distance of the first blocked sample, or the probe's reach when clear
    pub distance: f32,
}

/// Clear-probe count on each side of the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clearance {
    pub left: u32,
    pub right: u32,
}

impl Clearance {
    pub fn score(&self, side: Steer) -> u32 {
        match side {
            Steer::Left => self.left,
            Steer::Right => self.right,
        }
    }
}

/// Project the hitbox along `heading` and detect the first collision
pub fn probe_direction(
    origin: Vec2,
    heading: f32,
    grid: &dyn Passability,
    spec: &GridSpec,
    config: &AvoidanceConfig,
) -> Probe {
    probe_ray(origin, heading, config.sense_radius, grid, spec, config)
}

/// Like `probe_direction`, but samples only out to `reach` pixels
pub fn probe_ray(
    origin: Vec2,
    heading: f32,
    reach: f32,
    grid: &dyn Passability,
    spec: &GridSpec,
    config: &AvoidanceConfig,
) -> Probe {
    let dir = Vec2::from_heading(heading);
    let h = config.hitbox_half;
    let step = reach / config.probe_steps as f32;

    for i in 1..=config.probe_steps {
        let sample = step * i as f32;
        let center = origin + dir * sample;
        let corners = [
            (center.x - h, center.y - h),
            (center.x + h, center.y - h),
            (center.x - h, center.y + h),
            (center.x + h, center.y + h),
        ];
        let hit = corners.iter().any(|&(cx, cy)| {
            let (col, row) = spec.cell_index(cx, cy);
            !grid.is_passable(col, row)
        });
        if hit {
            return Probe {
                blocked: true,
                distance: sample,
            };
        }
    }

    Probe {
        blocked: false,
        distance: reach,
    }
}

/// Count clear probes at each configured offset on both sides
pub fn survey_sides(
    origin: Vec2,
    heading: f32,
    grid: &dyn Passability,
    spec: &GridSpec,
    config: &AvoidanceConfig,
) -> Clearance {
    let mut clearance = Clearance::default();
    for &offset in &config.side_angles {
        let left = probe_direction(origin, normalize_heading(heading - offset), grid, spec, config);
        let right = probe_direction(origin, normalize_heading(heading + offset), grid, spec, config);
        if !left.blocked {
            clearance.left += 1;
        }
        if !right.blocked {
            clearance.right += 1;
        }
    }
    clearance
}

/// Choose a side from scratch (no prior commitment)
///
/// Higher clearance wins. Ties break toward the navigation target when one
/// is known, otherwise left.
pub fn pick_direction(
    clearance: Clearance,
    origin: Vec2,
    heading: f32,
    target: Option<Vec2>,
) -> Steer {
    if clearance.left > clearance.right {
        return Steer::Left;
    }
    if clearance.right > clearance.left {
        return Steer::Right;
    }
    match target {
        Some(target) => {
            let err = angle_error(bearing_to(origin, target), heading);
            if err >= 0.0 {
                Steer::Right
            } else {
                Steer::Left
            }
        }
        None => Steer::Left,
    }
}

/// Stateless avoidance: no commitment, no grace window
///
/// For one-off checks where no per-entity state is available. Prefer
/// `ObstacleAvoider` for anything ticked repeatedly.
pub fn avoid_obstacles(
    origin: Vec2,
    heading: f32,
    grid: &dyn Passability,
    spec: &GridSpec,
    config: &AvoidanceConfig,
    target: Option<Vec2>,
) -> Option<Vec<ActuatorCommand>> {
    let ahead = probe_direction(origin, heading, grid, spec, config);
    if !ahead.blocked {
        return None;
    }
    let clearance = survey_sides(origin, heading, grid, spec, config);
    let side = pick_direction(clearance, origin, heading, target);
    Some(steering_commands(side, ahead.distance, config))
}

/// Rotation toward `side`, plus FORWARD when the obstacle is not too close
pub(crate) fn steering_commands(
    side: Steer,
    obstacle_distance: f32,
    config: &AvoidanceConfig,
) -> Vec<ActuatorCommand> {
    let mut cmds = vec![side.command()];
    if obstacle_distance > config.inner_radius {
        cmds.push(ActuatorCommand::Forward);
    }
    cmds
}
