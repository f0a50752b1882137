//! Database trait abstractions for modular database operations.
//!
//! This module defines the core traits that abstract database operations
//! across the areas of the pipeline: snapshot loading, staging
//! materialization, mart materialization, and statistics.

use crate::errors::AppResult;
use crate::types::{AddressBalance, CanonicalTransaction, InputRecord, SourceOutput, SourceTransaction};

/// Core database connection access
pub trait DatabaseConnection {
    /// Get a reference to the underlying SQLite connection
    fn connection(&self) -> &rusqlite::Connection;
}

/// Source snapshot operations - loading the three raw streams
pub trait SourceOperations {
    /// Clear the snapshot tables before a fresh ingest
    fn reset_source_tables(&mut self) -> AppResult<()>;

    /// Insert a batch of transaction rows
    fn insert_transaction_batch(&mut self, batch: &[SourceTransaction]) -> AppResult<()>;

    /// Insert a batch of output rows (address list persisted as JSON)
    fn insert_output_batch(&mut self, batch: &[SourceOutput]) -> AppResult<()>;

    /// Insert a batch of input rows
    fn insert_input_batch(&mut self, batch: &[InputRecord]) -> AppResult<()>;
}

/// Staging table operations - build, swap, inspect
pub trait StagingOperations {
    /// Create an empty staging build table (dropping any stale one)
    fn create_staging_build(&mut self) -> AppResult<()>;

    /// Insert canonical rows into the staging build table
    fn insert_staging_batch(&mut self, rows: &[CanonicalTransaction]) -> AppResult<()>;

    /// Atomically replace the live staging table with the build table
    fn swap_staging(&mut self) -> AppResult<()>;

    /// Drop the staging build table (abort path)
    fn drop_staging_build(&mut self) -> AppResult<()>;

    /// Row count of the live staging table
    fn staging_row_count(&self) -> AppResult<u64>;

    /// All live staging rows, ordered by tx_hash
    fn get_staging_rows(&self) -> AppResult<Vec<CanonicalTransaction>>;
}

/// Mart table operations - build, swap, inspect
pub trait MartOperations {
    /// Create an empty mart build table (dropping any stale one)
    fn create_mart_build(&mut self) -> AppResult<()>;

    /// Insert balance rows into the mart build table
    fn insert_mart_batch(&mut self, rows: &[AddressBalance]) -> AppResult<()>;

    /// Atomically replace the live mart table with the build table
    fn swap_mart(&mut self) -> AppResult<()>;

    /// Drop the mart build table (abort path)
    fn drop_mart_build(&mut self) -> AppResult<()>;

    /// Row count of the live mart table
    fn mart_row_count(&self) -> AppResult<u64>;

    /// Look up the live balance for a single address
    fn get_balance(&self, address: &str) -> AppResult<Option<AddressBalance>>;

    /// All live mart rows, ordered by address
    fn get_mart_rows(&self) -> AppResult<Vec<AddressBalance>>;

    /// Sum of balance_sats across the live mart
    fn total_balance_sats(&self) -> AppResult<u64>;
}

/// Statistics and reporting operations
pub trait StatisticsOperations {
    /// Aggregate row counts and ranges across all tables
    fn get_database_stats(&self) -> AppResult<crate::database::DatabaseStats>;
}
