pub mod commands;
pub mod logging;
pub mod snapshot;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sprout_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "sprout",
    about = "Sprout food suggestion CLI",
    long_about = "Suggest new foods for a child from the foods they already like, list popular starter foods, and inspect runtime readiness.",
    after_help = "Examples:\n  sprout suggest --liked 12,40 --max 5\n  sprout popular --json\n  sprout doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Suggest foods similar to the liked ones, best match first")]
    Suggest {
        #[arg(long, default_value = "", help = "Comma-separated ids of liked foods")]
        liked: String,
        #[arg(long, allow_hyphen_values = true, help = "Maximum suggestions; zero or less yields none")]
        max: Option<i64>,
        #[arg(long, help = "Catalog snapshot path (overrides catalog.snapshot_path)")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List popular kid-friendly foods for children without preferences")]
    Popular {
        #[arg(long, allow_hyphen_values = true, help = "Maximum suggestions; zero or less yields none")]
        max: Option<i64>,
        #[arg(long, help = "Catalog snapshot path (overrides catalog.snapshot_path)")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, snapshot readability, and catalog contents")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    logging::init(&logging);

    let result = match cli.command {
        Command::Suggest { liked, max, catalog, json } => {
            commands::suggest::run(&liked, max, catalog, json)
        }
        Command::Popular { max, catalog, json } => commands::popular::run(max, catalog, json),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
