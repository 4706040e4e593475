//! Shared snapshot provider
//!
//! The physics loop publishes one consistent picture of both entities per
//! tick; drivers on other tasks copy it out whole. The lock is held only for
//! the copy, never across a tick.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::core::types::{EntitySnapshot, PlayerSlot, Tick};

/// Both entities at one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub tick: Tick,
    pub player1: EntitySnapshot,
    pub player2: EntitySnapshot,
}

impl ArenaSnapshot {
    pub fn entity(&self, slot: PlayerSlot) -> EntitySnapshot {
        match slot {
            PlayerSlot::Player1 => self.player1,
            PlayerSlot::Player2 => self.player2,
        }
    }

    /// (self, opponent) as seen from `slot`
    pub fn view(&self, slot: PlayerSlot) -> (EntitySnapshot, EntitySnapshot) {
        (self.entity(slot), self.entity(slot.opponent()))
    }
}

#[derive(Debug, Clone)]
pub struct SharedArena {
    inner: Arc<Mutex<ArenaSnapshot>>,
}

impl SharedArena {
    pub fn new(initial: ArenaSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Copy of the latest published snapshot
    pub fn snapshot(&self) -> ArenaSnapshot {
        *self.lock()
    }

    pub fn publish(&self, snapshot: ArenaSnapshot) {
        *self.lock() = snapshot;
    }

    fn lock(&self) -> MutexGuard<'_, ArenaSnapshot> {
        // A panicked writer cannot leave a torn Copy value behind
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
