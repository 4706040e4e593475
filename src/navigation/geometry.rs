//! Planar geometry in arena heading convention (0 = up, clockwise-positive)

use crate::core::types::{normalize_heading, Vec2};

/// Euclidean distance between two points
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    from.distance(&to)
}

/// Heading that points from `from` toward `to`, in [0, 360)
pub fn bearing_to(from: Vec2, to: Vec2) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    normalize_heading(dx.atan2(-dy).to_degrees())
}

/// Signed difference `desired - current` wrapped to [-180, 180)
///
/// Positive means the target lies to the right (rotate clockwise).
pub fn angle_error(desired: f32, current: f32) -> f32 {
    (desired - current + 180.0).rem_euclid(360.0) - 180.0
}
