//! Tank Arena - Entry Point
//!
//! Interactive console for the arena. Player 1 takes directives and raw
//! actuator commands from the prompt; player 2 is run by the strategist.

use tank_arena::arena::{
    run_versus, ArenaLayout, ArenaSession, ControlMessage, Strategist, StrategistConfig,
    TICKS_PER_SECOND,
};
use tank_arena::command::Directive;
use tank_arena::core::config::ArenaConfig;
use tank_arena::core::error::Result;
use tank_arena::core::types::PlayerSlot;

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tokio::runtime::Runtime;

const OPPONENT_SEED: u64 = 2024;
const VERSUS_TICKS: u64 = 20 * TICKS_PER_SECOND;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("tank_arena=info")
        .init();

    tracing::info!("Tank Arena starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => ArenaConfig::load(Path::new(&path))?,
        None => ArenaConfig::default(),
    };
    let layout = ArenaLayout::skirmish(&config.grid);

    // Only the versus command needs async drivers
    let rt = Runtime::new()?;

    let mut session = ArenaSession::new(config.clone(), layout.clone());
    let mut opponent = Strategist::new(
        OPPONENT_SEED,
        config.grid,
        StrategistConfig {
            startup_delay_ticks: 5 * TICKS_PER_SECOND,
            ..StrategistConfig::default()
        },
    );

    println!("\n=== TANK ARENA ===");
    println!(
        "{} x {} grid, columns A-{}, rows 1-{}",
        config.grid.columns,
        config.grid.rows,
        (b'A' + config.grid.columns - 1) as char,
        config.grid.rows
    );
    println!();
    println!("Commands:");
    println!("  tick / t            - Advance the arena by one tick");
    println!("  run <n>             - Run n ticks");
    println!("  status / s          - Print the arena snapshot as JSON");
    println!("  respawn             - Put both tanks back on their spawn points");
    println!("  forward|backward|rotate_left|rotate_right|shoot");
    println!("                      - Send one raw actuator command");
    println!("  auto on|off         - Toggle auto-fire assist");
    println!("  versus <directive>  - Headless match against the strategist");
    println!("  stop                - Clear the current strategy");
    println!("  quit / q            - Exit");
    println!("  <any text>          - Directive, e.g. \"patrol between B2 and B9 and shoot on sight\"");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            step(&mut session, &mut opponent);
            display_status(&session);
            continue;
        }

        if input == "status" || input == "s" {
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            continue;
        }

        if input == "respawn" {
            session.respawn();
            display_status(&session);
            continue;
        }

        if let Some(n) = input.strip_prefix("run ") {
            match n.trim().parse::<u64>() {
                Ok(n) => {
                    for _ in 0..n {
                        step(&mut session, &mut opponent);
                    }
                    display_status(&session);
                }
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }

        if let Some(directive) = input.strip_prefix("versus ") {
            let report = rt.block_on(run_versus(
                directive,
                &config,
                &layout,
                OPPONENT_SEED,
                VERSUS_TICKS,
                Duration::from_millis(1),
            ))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            continue;
        }

        let message = ControlMessage::from_line(input);
        match session.handle(PlayerSlot::Player1, message.clone()) {
            Some(Directive::Strategy(intents)) => {
                println!("Parsed intents:");
                println!("{}", serde_json::to_string_pretty(&intents)?);
            }
            Some(Directive::Stop) => println!("Strategy cleared."),
            Some(Directive::Unrecognized) => {
                println!("Could not understand that. Try \"move to E5\" or \"guard C3\".")
            }
            None => match message {
                ControlMessage::AutoFire(enabled) => {
                    println!("Auto-fire {}.", if enabled { "on" } else { "off" })
                }
                _ => display_status(&session),
            },
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// One arena tick with the strategist steering player 2
fn step(session: &mut ArenaSession, opponent: &mut Strategist) {
    let (me, enemy) = session.snapshot().view(PlayerSlot::Player2);
    if me.alive && opponent.poll(&me, &enemy).is_some() {
        if let Some((_, text)) = opponent.current() {
            let text = text.clone();
            session.handle(PlayerSlot::Player2, ControlMessage::Strategy(text));
        }
    }

    let snapshot = session.step();
    if !snapshot.player1.alive || !snapshot.player2.alive {
        println!("A tank is down at tick {}; respawning.", snapshot.tick);
        session.respawn();
    }
}

fn display_status(session: &ArenaSession) {
    let grid = &session.config().grid;
    for slot in [PlayerSlot::Player1, PlayerSlot::Player2] {
        let body = session.body(slot);
        let strategy = session.strategy(slot).unwrap_or("-");
        println!(
            "  {} {} heading {:>5.1} hp {} shots {} | {}",
            slot.name(),
            grid.cell_at(body.position()),
            body.heading(),
            body.health(),
            body.shots_fired(),
            strategy
        );
    }
    println!("  tick {}", session.tick_count());
}
