use crate::errors::AppResult;
use clap::{Parser, Subcommand};
use tracing_subscriber;

pub mod commands;

/// Bitcoin Cash UTXO Balance Pipeline
#[derive(Parser)]
#[command(name = "bch-balance-pipeline")]
#[command(about = "Bitcoin Cash UTXO Balance Pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load the three source CSV exports into the snapshot database
    Ingest(commands::ingest::IngestCommand),
    /// Run the transforms: build, check and swap the staging and mart tables
    Run(commands::run::RunCommand),
    /// Run the output-contract checks against the live tables
    Check(commands::check::CheckCommand),
    /// Print database statistics
    Stats(commands::stats::StatsCommand),
}

pub fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest(command) => command.run(),
        Commands::Run(command) => command.run(),
        Commands::Check(command) => command.run(),
        Commands::Stats(command) => command.run(),
    }
}
