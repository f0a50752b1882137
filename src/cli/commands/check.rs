use crate::config::AppConfig;
use crate::database::{Database, MART_TABLE, STAGING_TABLE};
use crate::errors::{AppError, AppResult};
use crate::quality::QualityChecker;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct CheckCommand {
    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    database_path: Option<PathBuf>,
}

impl CheckCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== BCH Balance Pipeline - Check ===");

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

        let mut outcomes = QualityChecker::run_staging_checks(db.connection(), STAGING_TABLE)?;
        outcomes.extend(QualityChecker::run_mart_checks(db.connection(), MART_TABLE)?);

        println!(
            "
=== CONTRACT CHECKS ==="
        );
        for outcome in &outcomes {
            let status = if outcome.passed() { "PASS" } else { "FAIL" };
            println!("[{}] {} ({} violations)", status, outcome.check, outcome.violations);
        }

        QualityChecker::ensure_passed(&outcomes)?;
        println!(
            "
All checks passed."
        );
        Ok(())
    }
}
