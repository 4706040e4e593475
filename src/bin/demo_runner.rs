//! Headless Demo Runner
//!
//! Plays the scripted demo scenarios (or a directive against the
//! strategist) without a console and prints the outcome.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tank_arena::arena::{
    find_scenario, run_scenario, run_versus, ArenaLayout, ScenarioReport, DEMO_SCENARIOS,
    TICKS_PER_SECOND,
};
use tank_arena::core::config::ArenaConfig;

/// Headless Demo Runner - scripted tank scenarios
#[derive(Parser, Debug)]
#[command(name = "demo_runner")]
#[command(about = "Run the scripted arena demos and report where everyone ended up")]
struct Args {
    /// Scenario name or 1-based index (default: all)
    #[arg(long)]
    scenario: Option<String>,

    /// Cap on ticks per scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// Play this directive as player 1 against the strategist instead
    #[arg(long)]
    versus: Option<String>,

    /// Strategist seed for --versus
    #[arg(long)]
    seed: Option<u64>,

    /// Arena config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use an open arena with no pillars
    #[arg(long)]
    open: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunOutput {
    seed: Option<u64>,
    reports: Vec<ScenarioReport>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("tank_arena=warn")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ArenaConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => ArenaConfig::default(),
    };
    let layout = if args.open {
        ArenaLayout::open(&config.grid)
    } else {
        ArenaLayout::skirmish(&config.grid)
    };

    let output = if let Some(directive) = &args.versus {
        let seed = args.seed.unwrap_or_else(rand::random);
        let ticks = args.ticks.unwrap_or(30 * TICKS_PER_SECOND);
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("Failed to start runtime: {}", e);
                std::process::exit(1);
            }
        };
        let report = rt.block_on(run_versus(
            directive,
            &config,
            &layout,
            seed,
            ticks,
            Duration::from_millis(5),
        ));
        match report {
            Ok(report) => RunOutput {
                seed: Some(seed),
                reports: vec![report],
            },
            Err(e) => {
                eprintln!("Versus run failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        let scenarios: Vec<_> = match &args.scenario {
            Some(key) => match find_scenario(key) {
                Some(scenario) => vec![scenario],
                None => {
                    eprintln!("Unknown scenario '{}'. Available:", key);
                    for (i, scenario) in DEMO_SCENARIOS.iter().enumerate() {
                        eprintln!("  {}. {}", i + 1, scenario.name);
                    }
                    std::process::exit(2);
                }
            },
            None => DEMO_SCENARIOS.iter().collect(),
        };
        RunOutput {
            seed: None,
            reports: scenarios
                .into_iter()
                .map(|scenario| run_scenario(scenario, &config, &layout, args.ticks))
                .collect(),
        }
    };

    match args.format.as_str() {
        "text" => {
            for report in &output.reports {
                print_report(&config, report);
            }
        }
        _ => match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn print_report(config: &ArenaConfig, report: &ScenarioReport) {
    println!("{}", report.name);
    println!("{}", "=".repeat(report.name.len()));
    println!("Ticks: {}{}", report.ticks, if report.ended_early { " (ended early)" } else { "" });
    for (index, entity) in [report.final_state.player1, report.final_state.player2]
        .iter()
        .enumerate()
    {
        let directive: Vec<String> = report.intents[index].iter().map(|i| i.directive()).collect();
        println!(
            "Player {}: {} heading {:.0} shots {} alive {} | {}",
            index + 1,
            config.grid.cell_at(entity.position),
            entity.heading,
            report.shots_fired[index],
            entity.alive,
            directive.join(" and ")
        );
    }
    println!();
}
