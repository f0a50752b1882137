use crate::config::AppConfig;
use crate::database::traits::StatisticsOperations;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::utils::currency::format_sats_as_bch;
use crate::utils::time::timestamp_to_iso;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct StatsCommand {
    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    database_path: Option<PathBuf>,
}

impl StatsCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== BCH Balance Pipeline - Stats ===");

        let app_config = match AppConfig::load() {
            Ok(config) => config,
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
                "Database does not exist: {}",
                database_path.display()
            )));
        }

        let db = Database::new(&database_path.to_string_lossy())?;
        let stats = db.get_database_stats()?;

        println!(
            "
=== DATABASE STATISTICS ==="
        );
        println!("Source transactions: {}", stats.source_transactions);
        println!("Source outputs: {}", stats.source_outputs);
        println!("Source inputs: {}", stats.source_inputs);
        println!("Coinbase transactions: {}", stats.coinbase_transactions);
        if let (Some(min), Some(max)) = (stats.min_block_timestamp, stats.max_block_timestamp) {
            println!(
                "Block timestamp range: {} - {} ({} to {})",
                min,
                max,
                timestamp_to_iso(min),
                timestamp_to_iso(max)
            );
        }
        println!("Staging rows: {}", stats.staging_rows);
        println!("Mart rows: {}", stats.mart_rows);
        println!(
            "Total mart balance: {}",
            format_sats_as_bch(stats.total_balance_sats)
        );

        Ok(())
    }
}
