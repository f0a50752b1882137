use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::processor::{ProgressReporter, SnapshotLoader};
use crate::types::statistics::StatisticsCollector;
use crate::types::IngestConfig;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct IngestCommand {
    /// Path to transactions CSV (overrides config.toml and env vars)
    #[arg(long)]
    transactions_csv: Option<PathBuf>,

    /// Path to outputs CSV (overrides config.toml and env vars)
    #[arg(long)]
    outputs_csv: Option<PathBuf>,

    /// Path to inputs CSV (overrides config.toml and env vars)
    #[arg(long)]
    inputs_csv: Option<PathBuf>,

    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    database_path: Option<PathBuf>,

    /// Batch size for database inserts (overrides config.toml)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Progress report interval (records) (overrides config.toml)
    #[arg(long)]
    progress_interval: Option<usize>,
}

impl IngestCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== BCH Balance Pipeline - Ingest ===");

        // Load configuration from file/environment
        let app_config = match AppConfig::load() {
            Ok(config) => {
                info!("Configuration loaded successfully");
                config
            }
            Err(e) => {
                warn!("Failed to load configuration: {}", e);
                info!("Falling back to built-in defaults; CLI arguments still apply");
                AppConfig::get_defaults()?
            }
        };

        // CLI arguments override config values
        let config = IngestConfig {
            transactions_csv: self
                .transactions_csv
                .clone()
                .unwrap_or(app_config.paths.transactions_csv),
            outputs_csv: self
                .outputs_csv
                .clone()
                .unwrap_or(app_config.paths.outputs_csv),
            inputs_csv: self
                .inputs_csv
                .clone()
                .unwrap_or(app_config.paths.inputs_csv),
            database_path: self
                .database_path
                .clone()
                .unwrap_or(app_config.database.default_path),
            batch_size: self.batch_size.unwrap_or(app_config.processing.batch_size),
            progress_interval: self
                .progress_interval
                .unwrap_or(app_config.processing.progress_interval),
        };

        // Validate inputs
        for (label, path) in [
            ("Transactions CSV", &config.transactions_csv),
            ("Outputs CSV", &config.outputs_csv),
            ("Inputs CSV", &config.inputs_csv),
        ] {
            if !path.exists() {
                return Err(crate::errors::AppError::Config(format!(
                    "{} does not exist: {}",
                    label,
                    path.display()
                )));
            }
        }

        info!("Configuration:");
        info!("  Transactions CSV: {}", config.transactions_csv.display());
        info!("  Outputs CSV: {}", config.outputs_csv.display());
        info!("  Inputs CSV: {}", config.inputs_csv.display());
        info!("  Database: {}", config.database_path.display());
        info!("  Batch size: {}", config.batch_size);

        let database_path = config.database_path.clone();
        let mut loader = SnapshotLoader::new(config)?;
        let stats = loader.load_all()?;

        // Print summary
        println!(
            "
=== INGEST COMPLETE ==="
        );
        println!("Transaction rows loaded: {}", stats.transactions_loaded);
        println!("Output rows loaded: {}", stats.outputs_loaded);
        println!("Input rows loaded: {}", stats.inputs_loaded);
        println!("Malformed records: {}", stats.malformed_records);
        println!("Error rate: {:.4}%", stats.error_rate());
        println!(
            "Processing time: {}",
            ProgressReporter::format_elapsed_time(stats.timing.processing_duration.as_secs_f64())
        );
        println!("Processing rate: {:.2} records/sec", stats.processing_rate());
        println!("Batches committed: {}", stats.batches_committed);

        // Show database stats
        let db_stats = loader.get_database_stats()?;
        println!(
            "
=== SNAPSHOT SUMMARY ==="
        );
        println!("Source transactions: {}", db_stats.source_transactions);
        println!("Source outputs: {}", db_stats.source_outputs);
        println!("Source inputs: {}", db_stats.source_inputs);
        println!("Coinbase transactions: {}", db_stats.coinbase_transactions);
        if let (Some(min), Some(max)) = (
            db_stats.min_block_timestamp,
            db_stats.max_block_timestamp,
        ) {
            println!("Block timestamp range: {} - {}", min, max);
        }

        println!(
            "
Database written to: {}",
            database_path.display()
        );

        Ok(())
    }
}
