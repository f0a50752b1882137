//! Modular database operations for the balance pipeline.
//!
//! This module provides a clean interface to database operations
//! organised by pipeline area.
//!
//! ## Architecture
//!
//! The `Database` struct directly implements all area operation traits:
//! - `SourceOperations` - snapshot loading for the three raw streams
//! - `StagingOperations` - staging build/swap/inspection
//! - `MartOperations` - mart build/swap/inspection
//! - `StatisticsOperations` - statistics and reporting

pub mod helpers;
mod mart;
pub mod schema;
mod source;
mod staging;
pub mod statistics;
pub mod traits;

// Re-export the main types and traits
pub use schema::{setup_schema, MART_TABLE, STAGING_TABLE};
pub use statistics::DatabaseStats;
pub use traits::*;

use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::info;

/// The main database interface that implements all area operation traits.
///
/// This struct directly holds a SQLite connection and provides all database
/// operations through trait implementations organised by pipeline area.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Create a new database instance
    ///
    /// Opens (or creates) the database at the given path and initialises the
    /// snapshot and materialized-table schema. The live staging and mart
    /// tables exist from this point on (empty until the first swap).
    pub fn new(database_path: &str) -> AppResult<Self> {
        let connection = Connection::open(database_path)?;

        // Initialise the schema
        setup_schema(&connection)?;

        info!("Database initialised at: {}", database_path);
        Ok(Self { connection })
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Execute a function within a database transaction
    pub fn execute_transaction<F, R>(&mut self, f: F) -> AppResult<R>
    where
        F: FnOnce(&rusqlite::Transaction) -> AppResult<R>,
    {
        let tx = self.connection.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

impl DatabaseConnection for Database {
    fn connection(&self) -> &rusqlite::Connection {
        &self.connection
    }
}
