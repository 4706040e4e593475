//! Navigation geometry and visibility
//!
//! Pure functions with no state: distances, bearings, angular error and the
//! field-of-view / line-of-sight predicate.

pub mod geometry;
pub mod visibility;

pub use geometry::{angle_error, bearing_to, distance};
pub use visibility::{grid_line, has_clear_los, is_in_sight, SightCone, SightGrid};
