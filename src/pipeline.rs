//! Pipeline orchestration: transform, check, swap.
//!
//! Each run is a full refresh: every transform recomputes its complete
//! result from the current snapshot, writes it to a build table, and the
//! build is swapped in atomically only after the quality pass. A failing
//! check drops the build table and leaves the live table untouched.
//!
//! The two transforms share no state and could run in either order; staging
//! runs first for stable reporting.

use crate::database::schema::{BUILD_SUFFIX, MART_TABLE, STAGING_TABLE};
use crate::database::traits::{MartOperations, StagingOperations};
use crate::database::Database;
use crate::errors::AppResult;
use crate::quality::QualityChecker;
use crate::transform::{BalanceTransform, StagingTransform};
use crate::types::PipelineSummary;
use tracing::{info, warn};

/// Rows per insert transaction when materializing a build table
const INSERT_CHUNK_SIZE: usize = 10_000;

/// Which transforms a run executes
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub staging: bool,
    pub mart: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            staging: true,
            mart: true,
        }
    }
}

/// Orchestrates transform -> build -> check -> swap for both tables
pub struct PipelineRunner {
    database: Database,
}

impl PipelineRunner {
    /// Open the database at the given path and prepare a runner
    pub fn new(database_path: &str) -> AppResult<Self> {
        let database = Database::new(database_path)?;
        Ok(Self { database })
    }

    /// Wrap an already-open database
    pub fn from_database(database: Database) -> Self {
        Self { database }
    }

    /// Get a reference to the underlying database
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Execute the selected transforms with full-refresh semantics
    pub fn run(&mut self, options: &RunOptions) -> AppResult<PipelineSummary> {
        let mut summary = PipelineSummary::new();

        if options.staging {
            self.run_staging(&mut summary)?;
        }
        if options.mart {
            self.run_mart(&mut summary)?;
        }

        summary.timing.finish();
        info!("Pipeline run completed");
        Ok(summary)
    }

    fn run_staging(&mut self, summary: &mut PipelineSummary) -> AppResult<()> {
        info!("Running staging transform");
        let result = StagingTransform::run(&self.database)?;

        self.database.create_staging_build()?;
        for chunk in result.rows.chunks(INSERT_CHUNK_SIZE) {
            self.database.insert_staging_batch(chunk)?;
        }

        let build_table = format!("{STAGING_TABLE}{BUILD_SUFFIX}");
        let outcomes =
            QualityChecker::run_staging_checks(self.database.connection(), &build_table)?;
        if let Err(e) = QualityChecker::ensure_passed(&outcomes) {
            warn!("Staging build rejected - live table left untouched");
            self.database.drop_staging_build()?;
            return Err(e);
        }

        self.database.swap_staging()?;

        summary.staging_rows = Some(result.rows.len());
        summary.max_block_timestamp = result.max_block_timestamp;
        summary.window_start = result.window_start;
        Ok(())
    }

    fn run_mart(&mut self, summary: &mut PipelineSummary) -> AppResult<()> {
        info!("Running balance transform");
        let balances = BalanceTransform::run(&self.database)?;

        self.database.create_mart_build()?;
        for chunk in balances.chunks(INSERT_CHUNK_SIZE) {
            self.database.insert_mart_batch(chunk)?;
        }

        let build_table = format!("{MART_TABLE}{BUILD_SUFFIX}");
        let outcomes = QualityChecker::run_mart_checks(self.database.connection(), &build_table)?;
        if let Err(e) = QualityChecker::ensure_passed(&outcomes) {
            warn!("Mart build rejected - live table left untouched");
            self.database.drop_mart_build()?;
            return Err(e);
        }

        self.database.swap_mart()?;

        summary.mart_rows = Some(balances.len());
        summary.total_balance_sats = balances.iter().map(|b| b.balance_sats).sum();
        Ok(())
    }
}
