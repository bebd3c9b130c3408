//! Headless driver for the progression runtime.
//!
//! Run with: `cargo run -p progression-cli -- <command>`
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Show, Simulate, Slots, Validate};
use config::CliConfig;

/// Drive and inspect progression saves from the command line
#[derive(Parser)]
#[command(name = "progression")]
#[command(about = "Headless driver for the RPG progression core", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load content files and check that an engine can be built from them
    Validate(Validate),

    /// Advance a player through time and print the emitted events
    Simulate(Simulate),

    /// Print a saved snapshot
    Show(Show),

    /// List save slots
    Slots(Slots),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(cmd) => cmd.execute(&config),
        Command::Simulate(cmd) => cmd.execute(&config).await,
        Command::Show(cmd) => cmd.execute(&config),
        Command::Slots(cmd) => cmd.execute(&config),
    }
}
