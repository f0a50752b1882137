use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::pipeline::{PipelineRunner, RunOptions};
use crate::processor::ProgressReporter;
use crate::utils::currency::format_sats_as_bch;
use crate::utils::time::timestamp_to_iso;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct RunCommand {
    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    database_path: Option<PathBuf>,

    /// Only rebuild the staging table
    #[arg(long)]
    staging_only: bool,

    /// Only rebuild the balance mart
    #[arg(long)]
    mart_only: bool,
}

impl RunCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== BCH Balance Pipeline - Run ===");

        if self.staging_only && self.mart_only {
            return Err(AppError::Config(
                "--staging-only and --mart-only are mutually exclusive".to_string(),
            ));
        }

        let app_config = match AppConfig::load() {
            Ok(config) => {
                info!("Configuration loaded successfully");
                config
            }
            Err(e) => {
                warn!("Failed to load configuration: {}", e);
                AppConfig::get_defaults()?
            }
        };

        let database_path = self
            .database_path
            .clone()
            .unwrap_or(app_config.database.default_path);

        if !database_path.exists() {
            return Err(AppError::Config(format!(
                "Database does not exist: {} (run `ingest` first)",
                database_path.display()
            )));
        }

        let options = RunOptions {
            staging: !self.mart_only,
            mart: !self.staging_only,
        };

        info!("Database: {}", database_path.display());
        info!("Staging transform: {}", options.staging);
        info!("Balance transform: {}", options.mart);

        let mut runner = PipelineRunner::new(&database_path.to_string_lossy())?;
        let summary = runner.run(&options)?;

        // Print summary
        println!(
            "
=== PIPELINE RUN COMPLETE ==="
        );
        if let Some(rows) = summary.staging_rows {
            println!("Staging rows: {}", rows);
            if let (Some(start), Some(max_ts)) = (summary.window_start, summary.max_block_timestamp)
            {
                println!(
                    "Staging window: {} - {} ({} to {})",
                    start,
                    max_ts,
                    timestamp_to_iso(start),
                    timestamp_to_iso(max_ts)
                );
            }
        }
        if let Some(rows) = summary.mart_rows {
            println!("Mart rows: {}", rows);
            println!(
                "Total balance: {}",
                format_sats_as_bch(summary.total_balance_sats)
            );
        }
        println!(
            "Processing time: {}",
            ProgressReporter::format_elapsed_time(summary.timing.processing_duration.as_secs_f64())
        );

        Ok(())
    }
}
