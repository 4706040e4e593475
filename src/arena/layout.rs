//! Arena layout: terrain plus the two spawn points

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerSlot, Vec2};
use crate::grid::{GridCoord, GridSpec, ObstacleMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub cell: GridCoord,
    /// Initial heading in degrees
    pub heading: f32,
}

#[derive(Debug, Clone)]
pub struct ArenaLayout {
    pub map: Arc<ObstacleMap>,
    pub player1: SpawnPoint,
    pub player2: SpawnPoint,
}

impl ArenaLayout {
    pub fn new(map: ObstacleMap, player1: SpawnPoint, player2: SpawnPoint) -> Self {
        Self {
            map: Arc::new(map),
            player1,
            player2,
        }
    }

    /// Open arena, players facing each other across row 6
    pub fn open(spec: &GridSpec) -> Self {
        Self::new(ObstacleMap::open(spec), Self::west_spawn(spec), Self::east_spawn(spec))
    }

    /// Two short pillars off the main lanes, clear of every demo waypoint
    pub fn skirmish(spec: &GridSpec) -> Self {
        let mut map = ObstacleMap::open(spec);
        map.block_span(GridCoord::new(6, 2), 1, 2);
        map.block_span(GridCoord::new(11, 7), 1, 2);
        Self::new(map, Self::west_spawn(spec), Self::east_spawn(spec))
    }

    fn west_spawn(spec: &GridSpec) -> SpawnPoint {
        SpawnPoint {
            cell: GridCoord::new(1u8.min(spec.columns.saturating_sub(1)), middle_row(spec)),
            heading: 90.0,
        }
    }

    fn east_spawn(spec: &GridSpec) -> SpawnPoint {
        SpawnPoint {
            cell: GridCoord::new(spec.columns.saturating_sub(2), middle_row(spec)),
            heading: 270.0,
        }
    }

    pub fn spawn(&self, slot: PlayerSlot) -> SpawnPoint {
        match slot {
            PlayerSlot::Player1 => self.player1,
            PlayerSlot::Player2 => self.player2,
        }
    }

    pub fn spawn_position(&self, slot: PlayerSlot, spec: &GridSpec) -> Vec2 {
        spec.cell_center(self.spawn(slot).cell)
    }
}

fn middle_row(spec: &GridSpec) -> u8 {
    spec.rows.saturating_sub(1) / 2
}
