//! Snapshot and materialized-table schema
//!
//! ## Table groups
//!
//! 1. **Source snapshot** (`source_transactions`, `source_outputs`,
//!    `source_inputs`): one row per raw record from the CSV exports.
//!    Constraints are deliberately loose (NOT NULL only on safe fields) -
//!    the source is not owned by this system and carries historical
//!    duplicates by `hash`.
//!
//! 2. **Materialized tables** (`stg_transactions`, `address_balances`): the
//!    output contract tables. Uniqueness and not-null guarantees are enforced
//!    by the quality pass before swap, not by storage-engine constraints, so
//!    a contract violation surfaces as a named check failure rather than a
//!    mid-insert error on a half-written table.
//!
//! Transforms write into `*_build` shadow tables and the pipeline swaps them
//! in atomically after checks pass (full-refresh semantics).

use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

/// Suffix for build (pre-swap) tables
pub const BUILD_SUFFIX: &str = "_build";

/// Live staging table name
pub const STAGING_TABLE: &str = "stg_transactions";

/// Live mart table name
pub const MART_TABLE: &str = "address_balances";

/// Initialise the complete schema
pub fn setup_schema(connection: &Connection) -> AppResult<()> {
    connection.execute_batch(
        r#"
        PRAGMA user_version = 1;

        -- ═══════════════════════════════════════════════════════════════════
        -- SOURCE SNAPSHOT
        -- ═══════════════════════════════════════════════════════════════════

        -- Raw transaction stream. Duplicate hashes are expected; dedup is the
        -- staging transform's job, not the snapshot's.
        CREATE TABLE IF NOT EXISTS source_transactions (
            hash TEXT NOT NULL,
            block_timestamp INTEGER NOT NULL,
            block_number INTEGER,
            is_coinbase INTEGER NOT NULL DEFAULT 0,
            fee INTEGER,
            input_count INTEGER,
            output_count INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_source_tx_timestamp
            ON source_transactions(block_timestamp);
        CREATE INDEX IF NOT EXISTS idx_source_tx_hash
            ON source_transactions(hash);
        -- Partial index for the coinbase-address scan
        CREATE INDEX IF NOT EXISTS idx_source_tx_coinbase
            ON source_transactions(hash)
            WHERE is_coinbase = 1;

        -- Raw output stream. The ordered address list is stored as a JSON
        -- array; one output may attribute value to several addresses.
        CREATE TABLE IF NOT EXISTS source_outputs (
            transaction_hash TEXT NOT NULL,
            output_index INTEGER,
            value INTEGER NOT NULL,
            addresses_json TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_source_outputs_key
            ON source_outputs(transaction_hash, output_index);

        -- Raw input stream. Both columns nullable: coinbase inputs reference
        -- no prior output.
        CREATE TABLE IF NOT EXISTS source_inputs (
            spent_transaction_hash TEXT,
            spent_output_index INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_source_inputs_key
            ON source_inputs(spent_transaction_hash, spent_output_index);
        "#,
    )?;

    // Live materialized tables start empty and are replaced by swap
    create_staging_table(connection, STAGING_TABLE)?;
    create_staging_indexes(connection)?;
    create_mart_table(connection, MART_TABLE)?;
    create_mart_indexes(connection)?;

    debug!("Schema initialised");
    Ok(())
}

/// Create a staging-shaped table under the given name (live or build)
pub fn create_staging_table(connection: &Connection, name: &str) -> AppResult<()> {
    connection.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {name} (
            tx_hash TEXT,
            block_timestamp INTEGER,
            block_date TEXT,
            block_number INTEGER,
            is_coinbase INTEGER,
            fee INTEGER,
            input_count INTEGER,
            output_count INTEGER
        );
        "#
    ))?;
    Ok(())
}

/// Create a mart-shaped table under the given name (live or build)
pub fn create_mart_table(connection: &Connection, name: &str) -> AppResult<()> {
    connection.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {name} (
            address TEXT,
            balance_sats INTEGER,
            balance_bch REAL
        );
        "#
    ))?;
    Ok(())
}

/// Indexes for the live staging table (recreated after each swap)
///
/// `block_date` is the day-partition stand-in; downstream scans filter on it.
pub fn create_staging_indexes(connection: &Connection) -> AppResult<()> {
    connection.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_stg_tx_hash ON stg_transactions(tx_hash);
        CREATE INDEX IF NOT EXISTS idx_stg_block_date ON stg_transactions(block_date);
        "#,
    )?;
    Ok(())
}

/// Indexes for the live mart table (recreated after each swap)
pub fn create_mart_indexes(connection: &Connection) -> AppResult<()> {
    connection.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_mart_address ON address_balances(address);
        "#,
    )?;
    Ok(())
}
