//! Arena runtime around the command core
//!
//! Bodies, the shared snapshot, the session that applies control messages,
//! scripted drivers and the opponent strategist. Projectile flight and hit
//! detection are not modelled.

pub mod body;
pub mod demo;
pub mod driver;
pub mod layout;
pub mod opponent;
pub mod session;
pub mod state;

pub use body::TankBody;
pub use demo::{find_scenario, run_scenario, run_versus, DemoScenario, ScenarioReport, DEMO_SCENARIOS};
pub use driver::{ScriptedDriver, StopHandle};
pub use layout::{ArenaLayout, SpawnPoint};
pub use opponent::{Strategist, StrategistConfig, StrategyKind, TICKS_PER_SECOND};
pub use session::{ArenaSession, ControlMessage};
pub use state::{ArenaSnapshot, SharedArena};
