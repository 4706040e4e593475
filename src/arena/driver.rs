//! Scripted driver task
//!
//! Owns one executor (and optionally a strategist that rewrites its
//! intents), reads the shared snapshot once per tick and queues the
//! resulting actuator commands for the session. Stopping is cooperative:
//! the flag is checked between ticks, never mid-tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::arena::opponent::Strategist;
use crate::arena::session::ControlMessage;
use crate::arena::state::SharedArena;
use crate::command::executor::CommandExecutor;
use crate::command::intent::Intent;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{PlayerSlot, Tick};

/// External stop switch for a running driver
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct ScriptedDriver {
    slot: PlayerSlot,
    executor: CommandExecutor,
    strategist: Option<Strategist>,
    arena: SharedArena,
    outbox: mpsc::Sender<(PlayerSlot, ControlMessage)>,
    tick_interval: Duration,
    max_ticks: Option<Tick>,
    stop: StopHandle,
}

impl ScriptedDriver {
    pub fn new(
        slot: PlayerSlot,
        executor: CommandExecutor,
        arena: SharedArena,
        outbox: mpsc::Sender<(PlayerSlot, ControlMessage)>,
    ) -> Self {
        Self {
            slot,
            executor,
            strategist: None,
            arena,
            outbox,
            tick_interval: Duration::from_millis(33),
            max_ticks: None,
            stop: StopHandle::default(),
        }
    }

    /// Fixed intents, as in a demo scenario
    pub fn with_intents(mut self, intents: Vec<Intent>) -> Self {
        self.executor.set_intents(intents);
        self
    }

    /// Let a strategist choose (and periodically replace) the intents
    pub fn with_strategist(mut self, strategist: Strategist) -> Self {
        self.strategist = Some(strategist);
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: Tick) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run on the current tokio runtime
    pub fn spawn(self) -> (StopHandle, JoinHandle<Result<Tick>>) {
        let stop = self.stop_handle();
        (stop, tokio::spawn(self.run()))
    }

    /// Tick until stopped, out of ticks, or the session hangs up
    ///
    /// Returns the number of ticks driven.
    pub async fn run(mut self) -> Result<Tick> {
        tracing::info!(player = self.slot.name(), "driver started");
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks: Tick = 0;
        while !self.stop.is_stopped() {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            ticker.tick().await;

            let snapshot = self.arena.snapshot();
            let (me, opponent) = snapshot.view(self.slot);
            // Nothing to drive once either side of the round is down
            if me.alive && opponent.alive {
                if let Some(intents) = self
                    .strategist
                    .as_mut()
                    .and_then(|strategist| strategist.poll(&me, &opponent))
                {
                    self.executor.set_intents(intents);
                }
                for command in self.executor.tick(&me, &opponent) {
                    self.outbox
                        .send((self.slot, ControlMessage::Actuator(command)))
                        .await
                        .map_err(|_| ArenaError::DriverStopped(self.slot.name().to_string()))?;
                }
            }
            ticks += 1;
        }

        tracing::info!(player = self.slot.name(), ticks, "driver stopped");
        Ok(ticks)
    }
}
