//! Obstacle avoidance steering
//!
//! An invisible sensor ring projected ahead of the entity. When the hitbox
//! would hit impassable terrain within the sense radius, the avoider surveys
//! both sides and replaces the caller's forward command with steering toward
//! the clearer side, committing to that side so head-on approaches do not
//! flap left/right.

pub mod avoider;
pub mod probe;

pub use avoider::ObstacleAvoider;
pub use probe::{
    avoid_obstacles, pick_direction, probe_direction, probe_ray, survey_sides, Clearance, Probe, Steer,
};
