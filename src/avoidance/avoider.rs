//! Stateful avoider with direction commitment
//!
//! State machine:
//! - uncommitted -> committed(side) on the first blocked forward probe
//! - committed(side) -> committed(opposite) only when the opposite side's
//!   clearance beats the committed side by the hysteresis margin
//! - committed(side) keeps steering for `clear_grace` ticks after the forward
//!   probe clears, then returns to uncommitted

use crate::avoidance::probe::{
    pick_direction, probe_direction, probe_ray, steering_commands, survey_sides, Steer,
};
use crate::command::actuator::ActuatorCommand;
use crate::core::config::AvoidanceConfig;
use crate::core::types::Vec2;
use crate::grid::{GridSpec, Passability};
use crate::navigation::geometry::{bearing_to, distance};

/// One per entity. Reset on respawn.
#[derive(Debug, Clone)]
pub struct ObstacleAvoider {
    config: AvoidanceConfig,
    spec: GridSpec,
    committed: Option<Steer>,
    clear_ticks: u32,
}

impl ObstacleAvoider {
    pub fn new(config: AvoidanceConfig, spec: GridSpec) -> Self {
        Self {
            config,
            spec,
            committed: None,
            clear_ticks: 0,
        }
    }

    /// Currently committed steering side, if any
    pub fn committed(&self) -> Option<Steer> {
        self.committed
    }

    /// Ticks of forward clearance seen while still committed
    pub fn clear_ticks(&self) -> u32 {
        self.clear_ticks
    }

    /// Drop any commitment immediately
    pub fn reset(&mut self) {
        self.committed = None;
        self.clear_ticks = 0;
    }

    /// Is `target` inside the sensor ring with nothing in between?
    ///
    /// Probes along the bearing to the target and stops on it, so walls
    /// beyond a waypoint near the arena edge do not count.
    pub fn reaches(&self, position: Vec2, target: Vec2, grid: &dyn Passability) -> bool {
        let remaining = distance(position, target);
        if remaining > self.config.sense_radius {
            return false;
        }
        let bearing = bearing_to(position, target);
        !probe_ray(position, bearing, remaining, grid, &self.spec, &self.config).blocked
    }

    /// Sense obstacles ahead and return steering commands
    ///
    /// `None` means the path is clear and the caller proceeds with its own
    /// plan. `Some` replaces the caller's forward command for this tick.
    pub fn evaluate(
        &mut self,
        position: Vec2,
        heading: f32,
        grid: &dyn Passability,
        target: Option<Vec2>,
    ) -> Option<Vec<ActuatorCommand>> {
        let ahead = probe_direction(position, heading, grid, &self.spec, &self.config);

        if !ahead.blocked {
            let side = self.committed?;
            if self.clear_ticks >= self.config.clear_grace {
                tracing::debug!(?side, "avoidance grace window elapsed, releasing commitment");
                self.reset();
                return None;
            }
            // Keep turning away so the body clears the obstacle's footprint,
            // but the path itself is open so forward motion is fine.
            self.clear_ticks += 1;
            return Some(vec![side.command(), ActuatorCommand::Forward]);
        }

        self.clear_ticks = 0;
        let clearance = survey_sides(position, heading, grid, &self.spec, &self.config);

        let side = match self.committed {
            Some(side) => {
                let opposite = side.opposite();
                if clearance.score(opposite) >= clearance.score(side) + self.config.hysteresis {
                    tracing::debug!(from = ?side, to = ?opposite, left = clearance.left, right = clearance.right, "avoidance switching sides");
                    opposite
                } else {
                    side
                }
            }
            None => {
                let side = pick_direction(clearance, position, heading, target);
                tracing::debug!(?side, left = clearance.left, right = clearance.right, "avoidance committing");
                side
            }
        };
        self.committed = Some(side);

        Some(steering_commands(side, ahead.distance, &self.config))
    }
}
