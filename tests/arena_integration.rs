//! Arena session, driver and demo integration tests

use std::sync::Arc;
use std::time::Duration;

use tank_arena::arena::{
    find_scenario, run_scenario, ArenaLayout, ArenaSession, ControlMessage, ScriptedDriver,
};
use tank_arena::command::{parse, ActuatorCommand, CommandExecutor, Directive};
use tank_arena::core::config::ArenaConfig;
use tank_arena::core::types::PlayerSlot;
use tank_arena::grid::{GridCoord, Passability};
use tank_arena::navigation::distance;
use tokio::sync::mpsc;

fn coord(text: &str) -> GridCoord {
    text.parse().unwrap()
}

#[test]
fn test_patrol_and_guard_on_skirmish_map() {
    let config = ArenaConfig::default();
    let layout = ArenaLayout::skirmish(&config.grid);
    let mut session = ArenaSession::new(config.clone(), layout);

    session.handle(
        PlayerSlot::Player1,
        ControlMessage::Strategy("Patrol between C3 and C9".into()),
    );
    session.handle(
        PlayerSlot::Player2,
        ControlMessage::Strategy("Guard position P6".into()),
    );

    let mut flips = 0;
    let mut leg = 0;
    for _ in 0..360 {
        let snapshot = session.step();
        assert!(snapshot.player1.alive && snapshot.player2.alive);
        let now = session.executor(PlayerSlot::Player1).unwrap().patrol_leg();
        if now != leg {
            flips += 1;
            leg = now;
        }
    }
    assert!(flips >= 1, "patrol never reached an endpoint");

    let post = config.grid.cell_center(coord("P6"));
    let guard = session.body(PlayerSlot::Player2).position();
    assert!(distance(guard, post) <= config.executor.guard_radius());
}

#[test]
fn test_basic_movement_demo_meets_in_the_middle() {
    let config = ArenaConfig::default();
    let layout = ArenaLayout::open(&config.grid);
    let scenario = find_scenario("basic movement").unwrap();
    let report = run_scenario(scenario, &config, &layout, None);

    assert!(!report.ended_early);
    assert_eq!(report.intents[0], parse("Move to I6"));
    let p1 = report.final_state.player1.position;
    let p2 = report.final_state.player2.position;
    assert!(distance(p1, config.grid.cell_center(coord("I6"))) < config.executor.arrive_distance);
    assert!(distance(p2, config.grid.cell_center(coord("J6"))) < config.executor.arrive_distance);
    assert_eq!(report.shots_fired, [0, 0]);
}

#[test]
fn test_death_and_respawn_keep_strategy() {
    let config = ArenaConfig::default();
    let layout = ArenaLayout::open(&config.grid);
    let mut session = ArenaSession::new(config.clone(), layout.clone());
    session.handle(
        PlayerSlot::Player1,
        ControlMessage::Strategy("move to E6 and face north".into()),
    );
    for _ in 0..20 {
        session.step();
    }

    session.body_mut(PlayerSlot::Player2).take_damage(config.body.max_health);
    let snapshot = session.step();
    assert!(!snapshot.player2.alive);

    session.respawn();
    let snapshot = session.snapshot();
    assert!(snapshot.player2.alive);
    assert_eq!(
        snapshot.player1.position,
        layout.spawn_position(PlayerSlot::Player1, &config.grid)
    );
    assert_eq!(session.strategy(PlayerSlot::Player1), Some("move to E6 and face north"));
    assert_eq!(session.executor(PlayerSlot::Player1).unwrap().intents().len(), 2);
}

#[test]
fn test_control_message_wire_format() {
    let forward = ControlMessage::Actuator(ActuatorCommand::Forward);
    let json = serde_json::to_string(&forward).unwrap();
    assert_eq!(json, r#"{"kind":"actuator","value":"forward"}"#);

    let strategy: ControlMessage =
        serde_json::from_str(r#"{"kind":"strategy","value":"guard E5"}"#).unwrap();
    assert_eq!(strategy, ControlMessage::Strategy("guard E5".into()));

    let clear: ControlMessage = serde_json::from_str(r#"{"kind":"clear_strategy"}"#).unwrap();
    let mut session = ArenaSession::new(
        ArenaConfig::default(),
        ArenaLayout::open(&ArenaConfig::default().grid),
    );
    session.handle(PlayerSlot::Player2, strategy);
    assert_eq!(session.handle(PlayerSlot::Player2, clear), Some(Directive::Stop));
    assert!(session.strategy(PlayerSlot::Player2).is_none());
}

#[tokio::test]
async fn test_driver_feeds_session_until_stopped() {
    let config = ArenaConfig::default();
    let layout = ArenaLayout::open(&config.grid);
    let mut session = ArenaSession::new(config.clone(), layout);
    session.set_guarded(PlayerSlot::Player1, false);

    let grid: Arc<dyn Passability> = session.map();
    let executor = CommandExecutor::from_config(&config, Some(grid));
    let (tx, mut rx) = mpsc::channel(64);
    let (stop, handle) = ScriptedDriver::new(PlayerSlot::Player1, executor, session.shared(), tx)
        .with_intents(parse("move to I6"))
        .with_tick_interval(Duration::from_millis(1))
        .spawn();

    let start = session.body(PlayerSlot::Player1).position();
    let mut received = 0;
    while received < 10 {
        let (slot, message) = rx.recv().await.unwrap();
        assert_eq!(slot, PlayerSlot::Player1);
        session.handle(slot, message);
        session.step();
        received += 1;
    }
    assert!(session.body(PlayerSlot::Player1).position().x > start.x);

    stop.stop();
    let mut handle = handle;
    // Keep draining so a send in flight cannot hold the driver up
    let ticks = loop {
        tokio::select! {
            joined = &mut handle => break joined.unwrap().unwrap(),
            Some(_) = rx.recv() => {}
        }
    };
    assert!(ticks >= 10);
}
