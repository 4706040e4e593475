//! Tank Arena - natural language command core for grid arena tanks

pub mod arena;
pub mod avoidance;
pub mod command;
pub mod core;
pub mod grid;
pub mod navigation;
