pub mod config;
pub mod error;
pub mod types;

pub use config::{ArenaConfig, AvoidanceConfig, BodyConfig, ExecutorConfig};
pub use error::{ArenaError, Result};
pub use types::{normalize_heading, EntitySnapshot, PlayerSlot, Tick, Vec2};
