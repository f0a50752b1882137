//! Staging table operations - build, swap, inspect.
//!
//! The staging transform writes into `stg_transactions_build`; the pipeline
//! swaps it in only after the quality pass. The swap (drop + rename +
//! reindex) runs inside one transaction, so the live table is either the old
//! state or the new state, never a mix.

use crate::database::helpers::canonical_transaction_from_row;
use crate::database::schema::{self, BUILD_SUFFIX, STAGING_TABLE};
use crate::database::traits::StagingOperations;
use crate::database::Database;
use crate::errors::AppResult;
use crate::types::CanonicalTransaction;
use rusqlite::params;
use tracing::debug;

fn build_table() -> String {
    format!("{STAGING_TABLE}{BUILD_SUFFIX}")
}

impl StagingOperations for Database {
    fn create_staging_build(&mut self) -> AppResult<()> {
        let build = build_table();
        self.connection()
            .execute_batch(&format!("DROP TABLE IF EXISTS {build};"))?;
        schema::create_staging_table(self.connection(), &build)?;
        debug!("Created empty staging build table");
        Ok(())
    }

    fn insert_staging_batch(&mut self, rows: &[CanonicalTransaction]) -> AppResult<()> {
        let build = build_table();
        self.execute_transaction(|tx| {
            let mut stmt = tx.prepare_cached(&format!(
                r#"INSERT INTO {build}
                   (tx_hash, block_timestamp, block_date, block_number,
                    is_coinbase, fee, input_count, output_count)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#
            ))?;

            for row in rows {
                stmt.execute(params![
                    row.tx_hash,
                    row.block_timestamp,
                    row.block_date,
                    row.block_number,
                    row.is_coinbase,
                    row.fee,
                    row.input_count,
                    row.output_count
                ])?;
            }

            debug!("Inserted {} canonical rows into staging build", rows.len());
            Ok(())
        })
    }

    fn swap_staging(&mut self) -> AppResult<()> {
        let build = build_table();
        self.execute_transaction(|tx| {
            tx.execute_batch(&format!(
                r#"
                DROP TABLE IF EXISTS {STAGING_TABLE};
                ALTER TABLE {build} RENAME TO {STAGING_TABLE};
                "#
            ))?;
            Ok(())
        })?;
        // Indexes are dropped with the old table; recreate on the new one
        schema::create_staging_indexes(self.connection())?;
        debug!("Staging table swapped");
        Ok(())
    }

    fn drop_staging_build(&mut self) -> AppResult<()> {
        let build = build_table();
        self.connection()
            .execute_batch(&format!("DROP TABLE IF EXISTS {build};"))?;
        Ok(())
    }

    fn staging_row_count(&self) -> AppResult<u64> {
        let count: i64 = self.connection().query_row(
            &format!("SELECT COUNT(*) FROM {STAGING_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn get_staging_rows(&self) -> AppResult<Vec<CanonicalTransaction>> {
        let mut stmt = self.connection().prepare(&format!(
            r#"SELECT tx_hash, block_timestamp, block_date, block_number,
                      is_coinbase, fee, input_count, output_count
               FROM {STAGING_TABLE}
               ORDER BY tx_hash"#
        ))?;

        let rows = stmt
            .query_map([], canonical_transaction_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
