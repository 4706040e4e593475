//! Arena session: the physics-side consumer of control messages
//!
//! Owns both bodies. Each seat may carry its own directive executor (set by
//! `ControlMessage::Strategy`) and always carries a guard avoider that
//! screens raw FORWARD commands from remote controllers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arena::body::TankBody;
use crate::arena::layout::ArenaLayout;
use crate::arena::state::{ArenaSnapshot, SharedArena};
use crate::avoidance::ObstacleAvoider;
use crate::command::actuator::ActuatorCommand;
use crate::command::directive::Directive;
use crate::command::executor::CommandExecutor;
use crate::core::config::ArenaConfig;
use crate::core::types::{PlayerSlot, Tick};
use crate::grid::{ObstacleMap, Passability};
use crate::navigation::geometry::{angle_error, bearing_to};
use crate::navigation::visibility::{is_in_sight, SightCone, SightGrid};

/// Auto-fire turns toward the target until within this many degrees
const AUTO_FIRE_TOLERANCE: f32 = 3.0;

/// One item on a seat's control queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ControlMessage {
    Actuator(ActuatorCommand),
    /// Directive text; "stop" or empty clears the strategy
    Strategy(String),
    ClearStrategy,
    AutoFire(bool),
}

impl ControlMessage {
    /// Classify a line of operator input
    ///
    /// Actuator words and `auto on|off` are recognized; everything else is
    /// treated as directive text.
    pub fn from_line(line: &str) -> Self {
        let trimmed = line.trim();
        if let Ok(command) = trimmed.parse::<ActuatorCommand>() {
            if command != ActuatorCommand::Stop {
                return ControlMessage::Actuator(command);
            }
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "auto on" => ControlMessage::AutoFire(true),
            "auto off" => ControlMessage::AutoFire(false),
            _ => ControlMessage::Strategy(trimmed.to_string()),
        }
    }
}

struct Seat {
    body: TankBody,
    executor: Option<CommandExecutor>,
    strategy: Option<String>,
    guard: ObstacleAvoider,
    /// Screen raw FORWARD through `guard`
    guarded: bool,
    auto_fire: bool,
}

pub struct ArenaSession {
    config: ArenaConfig,
    layout: ArenaLayout,
    cone: SightCone,
    seats: [Seat; 2],
    tick: Tick,
    shared: SharedArena,
}

impl ArenaSession {
    pub fn new(config: ArenaConfig, layout: ArenaLayout) -> Self {
        let seats = [PlayerSlot::Player1, PlayerSlot::Player2].map(|slot| {
            let spawn = layout.spawn(slot);
            Seat {
                body: TankBody::new(
                    config.body.clone(),
                    config.grid,
                    config.grid.cell_center(spawn.cell),
                    spawn.heading,
                ),
                executor: None,
                strategy: None,
                guard: ObstacleAvoider::new(config.avoidance.clone(), config.grid),
                guarded: true,
                auto_fire: false,
            }
        });
        let initial = ArenaSnapshot {
            tick: 0,
            player1: seats[0].body.snapshot(),
            player2: seats[1].body.snapshot(),
        };
        Self {
            cone: SightCone::from(&config.executor),
            config,
            layout,
            seats,
            tick: 0,
            shared: SharedArena::new(initial),
        }
    }

    /// Handle for drivers on other tasks
    pub fn shared(&self) -> SharedArena {
        self.shared.clone()
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn map(&self) -> Arc<ObstacleMap> {
        Arc::clone(&self.layout.map)
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn body(&self, slot: PlayerSlot) -> &TankBody {
        &self.seat(slot).body
    }

    pub fn body_mut(&mut self, slot: PlayerSlot) -> &mut TankBody {
        &mut self.seat_mut(slot).body
    }

    pub fn executor(&self, slot: PlayerSlot) -> Option<&CommandExecutor> {
        self.seat(slot).executor.as_ref()
    }

    pub fn strategy(&self, slot: PlayerSlot) -> Option<&str> {
        self.seat(slot).strategy.as_deref()
    }

    pub fn auto_fire(&self, slot: PlayerSlot) -> bool {
        self.seat(slot).auto_fire
    }

    pub fn guard(&self, slot: PlayerSlot) -> &ObstacleAvoider {
        &self.seat(slot).guard
    }

    /// Whether raw FORWARD from this seat's controller is screened
    ///
    /// Seats fed by a scripted driver turn this off: their executor already
    /// avoids obstacles.
    pub fn set_guarded(&mut self, slot: PlayerSlot, guarded: bool) {
        self.seat_mut(slot).guarded = guarded;
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            tick: self.tick,
            player1: self.seats[0].body.snapshot(),
            player2: self.seats[1].body.snapshot(),
        }
    }

    /// Apply one control message to a seat
    ///
    /// Returns how strategy text was interpreted, `None` for other messages.
    pub fn handle(&mut self, slot: PlayerSlot, message: ControlMessage) -> Option<Directive> {
        match message {
            ControlMessage::Actuator(command) => {
                self.apply_raw(slot, command);
                None
            }
            ControlMessage::Strategy(text) => {
                let directive = Directive::interpret(&text, &self.config.grid);
                match &directive {
                    Directive::Stop => self.clear_strategy(slot),
                    Directive::Strategy(intents) => {
                        tracing::info!(player = slot.name(), directive = %text, "strategy set");
                        let map: Arc<dyn Passability> = self.map();
                        let mut executor = CommandExecutor::from_config(&self.config, Some(map));
                        executor.set_intents(intents.clone());
                        let seat = self.seat_mut(slot);
                        seat.executor = Some(executor);
                        seat.strategy = Some(text);
                    }
                    Directive::Unrecognized => {
                        tracing::warn!(player = slot.name(), directive = %text, "directive not understood, keeping current strategy");
                    }
                }
                Some(directive)
            }
            ControlMessage::ClearStrategy => {
                self.clear_strategy(slot);
                Some(Directive::Stop)
            }
            ControlMessage::AutoFire(enabled) => {
                self.seat_mut(slot).auto_fire = enabled;
                None
            }
        }
    }

    fn clear_strategy(&mut self, slot: PlayerSlot) {
        tracing::info!(player = slot.name(), "strategy cleared");
        let seat = self.seat_mut(slot);
        seat.executor = None;
        seat.strategy = None;
    }

    /// Apply a command from a remote controller
    ///
    /// A guarded FORWARD that would run into terrain is replaced by the
    /// guard avoider's steering.
    pub fn apply_raw(&mut self, slot: PlayerSlot, command: ActuatorCommand) {
        let map = Arc::clone(&self.layout.map);
        let seat = self.seat_mut(slot);
        if command == ActuatorCommand::Forward && seat.guarded {
            let steering = seat.guard.evaluate(
                seat.body.position(),
                seat.body.heading(),
                &*map,
                None,
            );
            if let Some(steering) = steering {
                for step in steering {
                    seat.body.apply(step, &*map);
                }
                return;
            }
        }
        seat.body.apply(command, &*map);
    }

    /// Advance the arena one tick
    ///
    /// Executors see the same start-of-tick snapshot, then auto-fire runs,
    /// cooldowns advance and the new snapshot is published.
    pub fn step(&mut self) -> ArenaSnapshot {
        let start = self.snapshot();
        let map = Arc::clone(&self.layout.map);

        for (index, slot) in [PlayerSlot::Player1, PlayerSlot::Player2].into_iter().enumerate() {
            let (me, opponent) = start.view(slot);
            let seat = &mut self.seats[index];
            if !me.alive {
                continue;
            }
            if let Some(executor) = seat.executor.as_mut() {
                for command in executor.tick(&me, &opponent) {
                    seat.body.apply(command, &*map);
                }
            }
        }

        for index in 0..2 {
            self.auto_fire_assist(index, &*map);
        }

        for seat in &mut self.seats {
            seat.body.cool_down();
        }
        self.tick += 1;
        let snapshot = self.snapshot();
        self.shared.publish(snapshot);
        snapshot
    }

    /// Turn toward a visible opponent and fire
    fn auto_fire_assist(&mut self, index: usize, map: &ObstacleMap) {
        let opponent = self.seats[1 - index].body.snapshot();
        let seat = &mut self.seats[index];
        let me = seat.body.snapshot();
        if !seat.auto_fire || !me.alive || !opponent.alive {
            return;
        }
        let terrain = SightGrid::new(map, &self.config.grid);
        if !is_in_sight(&me, &opponent, &self.cone, Some(terrain)) {
            return;
        }
        let err = angle_error(bearing_to(me.position, opponent.position), me.heading);
        if err.abs() > AUTO_FIRE_TOLERANCE {
            seat.body.apply(ActuatorCommand::rotate_toward(err), map);
        }
        seat.body.apply(ActuatorCommand::Shoot, map);
    }

    /// New round: bodies back to spawn, avoiders and executors reset
    pub fn respawn(&mut self) {
        tracing::info!(tick = self.tick, "respawning both players");
        for (index, slot) in [PlayerSlot::Player1, PlayerSlot::Player2].into_iter().enumerate() {
            let spawn = self.layout.spawn(slot);
            let position = self.config.grid.cell_center(spawn.cell);
            let seat = &mut self.seats[index];
            seat.body.respawn(position, spawn.heading);
            seat.guard.reset();
            if let Some(executor) = seat.executor.as_mut() {
                executor.reset();
            }
        }
        self.shared.publish(self.snapshot());
    }

    fn seat(&self, slot: PlayerSlot) -> &Seat {
        match slot {
            PlayerSlot::Player1 => &self.seats[0],
            PlayerSlot::Player2 => &self.seats[1],
        }
    }

    fn seat_mut(&mut self, slot: PlayerSlot) -> &mut Seat {
        match slot {
            PlayerSlot::Player1 => &mut self.seats[0],
            PlayerSlot::Player2 => &mut self.seats[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::layout::SpawnPoint;
    use crate::command::intent::Intent;
    use crate::grid::{GridCoord, GridSpec};

    fn open_session() -> ArenaSession {
        let config = ArenaConfig::default();
        let layout = ArenaLayout::open(&config.grid);
        ArenaSession::new(config, layout)
    }

    #[test]
    fn test_from_line() {
        assert_eq!(
            ControlMessage::from_line("forward"),
            ControlMessage::Actuator(ActuatorCommand::Forward)
        );
        assert_eq!(ControlMessage::from_line("AUTO ON"), ControlMessage::AutoFire(true));
        assert_eq!(
            ControlMessage::from_line("stop"),
            ControlMessage::Strategy("stop".into())
        );
        assert_eq!(
            ControlMessage::from_line("guard E5"),
            ControlMessage::Strategy("guard E5".into())
        );
    }

    #[test]
    fn test_strategy_installs_executor() {
        let mut session = open_session();
        let directive = session.handle(
            PlayerSlot::Player1,
            ControlMessage::Strategy("move to I6".into()),
        );
        assert!(matches!(directive, Some(Directive::Strategy(_))));
        let executor = session.executor(PlayerSlot::Player1).unwrap();
        assert_eq!(
            executor.intents(),
            &[Intent::MoveTo {
                cell: GridCoord::new(8, 5)
            }]
        );
        assert_eq!(session.strategy(PlayerSlot::Player1), Some("move to I6"));
    }

    #[test]
    fn test_unrecognized_keeps_current_strategy() {
        let mut session = open_session();
        session.handle(PlayerSlot::Player1, ControlMessage::Strategy("guard E5".into()));
        let directive = session.handle(PlayerSlot::Player1, ControlMessage::Strategy("dance".into()));
        assert_eq!(directive, Some(Directive::Unrecognized));
        assert_eq!(session.strategy(PlayerSlot::Player1), Some("guard E5"));
    }

    #[test]
    fn test_stop_clears_strategy() {
        let mut session = open_session();
        session.handle(PlayerSlot::Player1, ControlMessage::Strategy("guard E5".into()));
        session.handle(PlayerSlot::Player1, ControlMessage::Strategy("Stop".into()));
        assert!(session.executor(PlayerSlot::Player1).is_none());
        assert!(session.strategy(PlayerSlot::Player1).is_none());
    }

    #[test]
    fn test_step_drives_executor() {
        let mut session = open_session();
        session.handle(PlayerSlot::Player1, ControlMessage::Strategy("move to I6".into()));
        let before = session.body(PlayerSlot::Player1).position();
        let snap = session.step();
        assert_eq!(snap.tick, 1);
        assert!(snap.player1.position.x > before.x);
        assert_eq!(session.shared().snapshot(), snap);
    }

    fn session_with(map: ObstacleMap, p1: GridCoord, p2: GridCoord) -> ArenaSession {
        let config = ArenaConfig::default();
        let layout = ArenaLayout::new(
            map,
            SpawnPoint {
                cell: p1,
                heading: 90.0,
            },
            SpawnPoint {
                cell: p2,
                heading: 270.0,
            },
        );
        ArenaSession::new(config, layout)
    }

    #[test]
    fn test_guarded_forward_steers_at_wall() {
        let spec = GridSpec::default();
        let mut map = ObstacleMap::open(&spec);
        map.block_span(GridCoord::new(3, 0), 1, 12);
        let mut session = session_with(map, GridCoord::new(1, 5), GridCoord::new(16, 5));

        session.handle(PlayerSlot::Player1, ControlMessage::Actuator(ActuatorCommand::Forward));
        assert!(session.guard(PlayerSlot::Player1).committed().is_some());
        assert_ne!(session.body(PlayerSlot::Player1).heading(), 90.0);

        session.set_guarded(PlayerSlot::Player2, false);
        session.handle(PlayerSlot::Player2, ControlMessage::Actuator(ActuatorCommand::Forward));
        assert!(session.guard(PlayerSlot::Player2).committed().is_none());
    }

    #[test]
    fn test_auto_fire_shoots_visible_opponent() {
        let spec = GridSpec::default();
        let mut session = session_with(ObstacleMap::open(&spec), GridCoord::new(1, 5), GridCoord::new(8, 5));
        session.handle(PlayerSlot::Player1, ControlMessage::AutoFire(true));
        assert!(session.auto_fire(PlayerSlot::Player1));
        session.step();
        assert_eq!(session.body(PlayerSlot::Player1).shots_fired(), 1);
        assert_eq!(session.body(PlayerSlot::Player2).shots_fired(), 0);

        // Out of range: no shot
        let mut far = open_session();
        far.handle(PlayerSlot::Player1, ControlMessage::AutoFire(true));
        far.step();
        assert_eq!(far.body(PlayerSlot::Player1).shots_fired(), 0);
    }

    #[test]
    fn test_respawn_resets_state() {
        let mut session = open_session();
        session.handle(PlayerSlot::Player1, ControlMessage::Strategy("shoot".into()));
        session.step();
        assert!(session.executor(PlayerSlot::Player1).unwrap().is_completed(0));
        session.body_mut(PlayerSlot::Player1).take_damage(3);
        assert!(!session.snapshot().player1.alive);

        session.respawn();
        assert!(session.body(PlayerSlot::Player1).is_alive());
        assert!(!session.executor(PlayerSlot::Player1).unwrap().is_completed(0));
        let spawn = GridSpec::default().cell_center(GridCoord::new(1, 5));
        assert_eq!(session.body(PlayerSlot::Player1).position(), spawn);
    }
}
