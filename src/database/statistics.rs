//! Database statistics and reporting queries.

use crate::database::schema::{MART_TABLE, STAGING_TABLE};
use crate::database::traits::StatisticsOperations;
use crate::database::Database;
use crate::errors::AppResult;

/// Aggregate counts and ranges across the snapshot and materialized tables
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub source_transactions: u64,
    pub source_outputs: u64,
    pub source_inputs: u64,
    pub coinbase_transactions: u64,
    pub min_block_timestamp: Option<i64>,
    pub max_block_timestamp: Option<i64>,
    pub staging_rows: u64,
    pub mart_rows: u64,
    pub total_balance_sats: u64,
}

impl StatisticsOperations for Database {
    fn get_database_stats(&self) -> AppResult<DatabaseStats> {
        let conn = self.connection();

        let (source_transactions, coinbase_transactions, min_ts, max_ts) = conn.query_row(
            r#"SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN is_coinbase = 1 THEN 1 ELSE 0 END), 0),
                MIN(block_timestamp),
                MAX(block_timestamp)
            FROM source_transactions"#,
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)? as u64,
                    row.get::<_, i64>(1)? as u64,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                ))
            },
        )?;

        let source_outputs: i64 =
            conn.query_row("SELECT COUNT(*) FROM source_outputs", [], |row| row.get(0))?;
        let source_inputs: i64 =
            conn.query_row("SELECT COUNT(*) FROM source_inputs", [], |row| row.get(0))?;

        let staging_rows: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {STAGING_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        let (mart_rows, total_balance_sats) = conn.query_row(
            &format!("SELECT COUNT(*), COALESCE(SUM(balance_sats), 0) FROM {MART_TABLE}"),
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        Ok(DatabaseStats {
            source_transactions,
            source_outputs: source_outputs as u64,
            source_inputs: source_inputs as u64,
            coinbase_transactions,
            min_block_timestamp: min_ts,
            max_block_timestamp: max_ts,
            staging_rows: staging_rows as u64,
            mart_rows: mart_rows as u64,
            total_balance_sats: total_balance_sats as u64,
        })
    }
}
