//! Scripted demo scenarios
//!
//! Each scenario hands both players a directive and lets the session run
//! for a fixed span of game time, or until someone dies.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::arena::driver::ScriptedDriver;
use crate::arena::layout::ArenaLayout;
use crate::arena::opponent::{Strategist, StrategistConfig, TICKS_PER_SECOND};
use crate::arena::session::{ArenaSession, ControlMessage};
use crate::arena::state::ArenaSnapshot;
use crate::command::executor::CommandExecutor;
use crate::command::intent::Intent;
use crate::command::parser::parse_intents;
use crate::core::config::ArenaConfig;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{PlayerSlot, Tick};
use crate::grid::Passability;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemoScenario {
    pub name: &'static str,
    pub player1: &'static str,
    pub player2: &'static str,
    pub duration_secs: f32,
}

impl DemoScenario {
    pub fn ticks(&self) -> Tick {
        (self.duration_secs * TICKS_PER_SECOND as f32).round() as Tick
    }

    pub fn directive(&self, slot: PlayerSlot) -> &'static str {
        match slot {
            PlayerSlot::Player1 => self.player1,
            PlayerSlot::Player2 => self.player2,
        }
    }
}

pub const DEMO_SCENARIOS: [DemoScenario; 4] = [
    DemoScenario {
        name: "Basic Movement",
        player1: "Move to I6",
        player2: "Move to J6",
        duration_secs: 6.0,
    },
    DemoScenario {
        name: "Patrol & Guard",
        player1: "Patrol between C3 and C9",
        player2: "Guard position P6",
        duration_secs: 12.0,
    },
    DemoScenario {
        name: "Combat Patrol",
        player1: "Patrol between D2 and D10 and shoot at anything in your sight",
        player2: "Patrol between O2 and O10 and shoot at anything in your sight",
        duration_secs: 14.0,
    },
    DemoScenario {
        name: "Assault vs Defense",
        player1: "Move to I3 and shoot at anything in your sight",
        player2: "Guard position J9 and shoot at anything in your sight",
        duration_secs: 12.0,
    },
];

/// Look a scenario up by (case-insensitive) name or 1-based index
pub fn find_scenario(key: &str) -> Option<&'static DemoScenario> {
    if let Ok(index) = key.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| DEMO_SCENARIOS.get(i));
    }
    DEMO_SCENARIOS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(key.trim()))
}

/// Outcome of one headless scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub ticks: Tick,
    pub intents: [Vec<Intent>; 2],
    pub shots_fired: [u32; 2],
    pub final_state: ArenaSnapshot,
    /// A player died before time ran out
    pub ended_early: bool,
}

/// Play a scenario through a fresh session
///
/// `tick_limit` caps the run below the scenario's own duration.
pub fn run_scenario(
    scenario: &DemoScenario,
    config: &ArenaConfig,
    layout: &ArenaLayout,
    tick_limit: Option<Tick>,
) -> ScenarioReport {
    let mut session = ArenaSession::new(config.clone(), layout.clone());
    for slot in [PlayerSlot::Player1, PlayerSlot::Player2] {
        let text = scenario.directive(slot).to_string();
        session.handle(slot, ControlMessage::Strategy(text));
    }

    let budget = tick_limit.map_or(scenario.ticks(), |limit| limit.min(scenario.ticks()));
    tracing::info!(scenario = scenario.name, ticks = budget, "running demo scenario");

    let mut ended_early = false;
    let mut final_state = session.snapshot();
    while session.tick_count() < budget {
        final_state = session.step();
        if !final_state.player1.alive || !final_state.player2.alive {
            ended_early = true;
            break;
        }
    }

    let intents_of = |slot| {
        session
            .executor(slot)
            .map(|executor| executor.intents().to_vec())
            .unwrap_or_default()
    };
    ScenarioReport {
        name: scenario.name.to_string(),
        ticks: session.tick_count(),
        intents: [intents_of(PlayerSlot::Player1), intents_of(PlayerSlot::Player2)],
        shots_fired: [
            session.body(PlayerSlot::Player1).shots_fired(),
            session.body(PlayerSlot::Player2).shots_fired(),
        ],
        final_state,
        ended_early,
    }
}

/// Directive-driven player 1 against the strategist, both on driver tasks
///
/// The session runs on the calling task and applies whatever the drivers
/// have queued before each step, so runs are not tick-for-tick
/// reproducible.
pub async fn run_versus(
    directive: &str,
    config: &ArenaConfig,
    layout: &ArenaLayout,
    seed: u64,
    ticks: Tick,
    tick_interval: Duration,
) -> Result<ScenarioReport> {
    let mut session = ArenaSession::new(config.clone(), layout.clone());
    session.set_guarded(PlayerSlot::Player1, false);
    session.set_guarded(PlayerSlot::Player2, false);

    let (tx, mut rx) = mpsc::channel(256);
    let intents = parse_intents(directive, &config.grid);
    let executor = |session: &ArenaSession| {
        let map: Arc<dyn Passability> = session.map();
        CommandExecutor::from_config(config, Some(map))
    };

    let (stop1, player1) =
        ScriptedDriver::new(PlayerSlot::Player1, executor(&session), session.shared(), tx.clone())
            .with_intents(intents.clone())
            .with_tick_interval(tick_interval)
            .spawn();
    let (stop2, player2) =
        ScriptedDriver::new(PlayerSlot::Player2, executor(&session), session.shared(), tx)
            .with_strategist(Strategist::new(seed, config.grid, StrategistConfig::default()))
            .with_tick_interval(tick_interval)
            .spawn();

    let mut ticker = interval(tick_interval);
    let mut ended_early = false;
    let mut final_state = session.snapshot();
    while session.tick_count() < ticks {
        ticker.tick().await;
        while let Ok((slot, message)) = rx.try_recv() {
            session.handle(slot, message);
        }
        final_state = session.step();
        if !final_state.player1.alive || !final_state.player2.alive {
            ended_early = true;
            break;
        }
    }

    stop1.stop();
    stop2.stop();
    // Keep draining so a driver blocked on a full queue can observe the stop
    let joined = async { (player1.await, player2.await) };
    tokio::pin!(joined);
    let (first, second) = loop {
        tokio::select! {
            result = &mut joined => break result,
            Some(_) = rx.recv() => {}
        }
    };
    for result in [first, second] {
        result.map_err(|e| ArenaError::DriverStopped(e.to_string()))??;
    }

    Ok(ScenarioReport {
        name: "Versus".to_string(),
        ticks: session.tick_count(),
        intents: [intents, Vec::new()],
        shots_fired: [
            session.body(PlayerSlot::Player1).shots_fired(),
            session.body(PlayerSlot::Player2).shots_fired(),
        ],
        final_state,
        ended_early,
    })
}
