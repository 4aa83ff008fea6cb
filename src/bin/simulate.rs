//! Reward balance simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 100 players, 90 days
//!   cargo run --bin simulate -- -n 20 -d 30    # 20 players for a month
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use questify::simulator::{run_simulation, SimConfig};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              QUESTIFY REWARD SIMULATOR                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Players:        {}", config.num_runs);
    println!("  Days:           {}", config.days);
    println!("  Skip Chance:    {:.0}%", config.skip_chance * 100.0);
    println!(
        "  Tasks per Day:  {}-{}",
        config.min_tasks_per_day, config.max_tasks_per_day
    );
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(e) = std::fs::write(&filename, report.to_json()) {
            eprintln!("Failed to write JSON report: {}", e);
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-d" | "--days" => {
                if i + 1 < args.len() {
                    config.days = args[i + 1].parse().unwrap_or(90);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--skip-chance" => {
                if i + 1 < args.len() {
                    config.skip_chance = args[i + 1].parse().unwrap_or(0.15);
                    i += 1;
                }
            }
            "--tasks" => {
                if i + 1 < args.len() {
                    if let Some((min, max)) = args[i + 1].split_once('-') {
                        config.min_tasks_per_day = min.parse().unwrap_or(1);
                        config.max_tasks_per_day = max.parse().unwrap_or(6);
                    }
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "--year" => {
                config = SimConfig::long_term();
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Questify Reward Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>         Number of simulated players (default: 100)");
    println!("    -d, --days <D>         Days each player plays (default: 90)");
    println!("    -s, --seed <S>         Random seed for reproducibility");
    println!("    --skip-chance <P>      Chance to skip a day, 0.0-1.0 (default: 0.15)");
    println!("    --tasks <MIN-MAX>      Tasks per active day (default: 1-6)");
    println!("    -v, --verbose          Print every run");
    println!("    --json                 Save JSON report");
    println!("    --quick                20 players for 30 days");
    println!("    --year                 25 players for 365 days");
    println!("    -h, --help             Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                       # Default run");
    println!("    cargo run --bin simulate -- -n 20 -d 30       # A month of play");
    println!("    cargo run --bin simulate -- --seed 42         # Reproducible");
    println!("    cargo run --bin simulate -- --skip-chance 0.5 # Casual players");
}
