//! Arena grid: coordinates, compass bearings and terrain passability

pub mod compass;
pub mod coord;
pub mod map;

pub use compass::Compass;
pub use coord::{GridCoord, GridSpec};
pub use map::{ObstacleMap, Passability};
