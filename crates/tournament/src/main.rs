//! Tournament CLI
//!
//! Simulate Pozo events and print standings.

use pozo_core::{EventType, StandingsCalculator};
use std::env;
use std::path::Path;
use tournament::{load_matches, standings_table, EventFile, RunnerError, SimulationConfig, Simulator};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Pozo Tournament Runner");
    println!();
    println!("Usage:");
    println!("  tournament simulate <event.toml> [--rounds N] [--seed S] [--out results.json] [--quiet]");
    println!("  tournament standings <matches.json> [--type americana|entreno|pozo]");
    println!();
    println!("Event types:");
    println!("  americana     - Open seeding, ranked by games won");
    println!("  entreno       - Level-seeded ladder, ranked by wins and court");
    println!("  pozo          - Court ladder, ranked by wins and court");
    println!();
    println!("Examples:");
    println!("  tournament simulate demos/friday_pozo.toml --seed 7");
    println!("  tournament standings results.json --type pozo");
    println!();
    println!("Logging is controlled with RUST_LOG (default: tournament=info,pozo_core=info).");
}

fn parse_event_type(value: &str) -> Result<EventType, RunnerError> {
    match value.to_lowercase().as_str() {
        "americana" => Ok(EventType::Americana),
        "entreno" => Ok(EventType::Entreno),
        "pozo" => Ok(EventType::Pozo),
        other => Err(RunnerError::Usage(format!("unknown event type: {}", other))),
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, RunnerError> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| RunnerError::Usage(format!("{} needs a value", flag)))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, RunnerError> {
    value
        .parse()
        .map_err(|_| RunnerError::Usage(format!("invalid value for {}: {}", flag, value)))
}

fn run_simulate(args: &[String]) -> Result<(), RunnerError> {
    let Some(event_path) = args.first() else {
        return Err(RunnerError::Usage("simulate requires an event file".to_string()));
    };

    let mut config = SimulationConfig::default();
    let mut out: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rounds" | "-r" => {
                config.rounds = Some(parse_number(flag_value(args, i, "--rounds")?, "--rounds")?);
                i += 1;
            }
            "--seed" | "-s" => {
                config.seed = parse_number(flag_value(args, i, "--seed")?, "--seed")?;
                i += 1;
            }
            "--out" | "-o" => {
                out = Some(flag_value(args, i, "--out")?);
                i += 1;
            }
            "--quiet" | "-q" => config.verbose = false,
            other => return Err(RunnerError::Usage(format!("unknown option: {}", other))),
        }
        i += 1;
    }

    let file = EventFile::load(Path::new(event_path))?;
    println!("=== Simulating: {} ===", file.name());
    println!(
        "Participants: {}, Pairs: {}, Seed: {}",
        file.participants.len(),
        file.pairs.len(),
        config.seed
    );
    println!();

    let results = Simulator::new(config).run(&file)?;
    println!();
    results.print_report();

    if let Some(path) = out {
        results.save(Path::new(path))?;
        println!("Results saved to {}", path);
    }
    Ok(())
}

fn run_standings(args: &[String]) -> Result<(), RunnerError> {
    let Some(matches_path) = args.first() else {
        return Err(RunnerError::Usage("standings requires a matches file".to_string()));
    };

    let mut event_type = EventType::Americana;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--type" | "-t" => {
                event_type = parse_event_type(flag_value(args, i, "--type")?)?;
                i += 1;
            }
            other => return Err(RunnerError::Usage(format!("unknown option: {}", other))),
        }
        i += 1;
    }

    let matches = load_matches(Path::new(matches_path))?;
    let rows = StandingsCalculator::calculate(&matches, event_type);
    if rows.is_empty() {
        println!("No finished matches found.");
        return Ok(());
    }

    println!("=== Standings ({}) ===", event_type.as_str());
    print!("{}", standings_table(&rows, event_type));
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tournament=info,pozo_core=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "simulate" | "sim" => run_simulate(&args[2..]),
        "standings" => run_standings(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(RunnerError::Usage(format!("unknown command: {}", other))),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if matches!(e, RunnerError::Usage(_)) {
            print_usage();
        }
        std::process::exit(1);
    }
}
