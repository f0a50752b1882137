//! Mart table operations - build, swap, inspect.
//!
//! Mirrors the staging operations for the `address_balances` table: the
//! balance transform writes into a build table, the pipeline swaps after the
//! quality pass.

use crate::database::helpers::address_balance_from_row;
use crate::database::schema::{self, BUILD_SUFFIX, MART_TABLE};
use crate::database::traits::MartOperations;
use crate::database::Database;
use crate::errors::AppResult;
use crate::types::AddressBalance;
use rusqlite::params;
use tracing::debug;

fn build_table() -> String {
    format!("{MART_TABLE}{BUILD_SUFFIX}")
}

impl MartOperations for Database {
    fn create_mart_build(&mut self) -> AppResult<()> {
        let build = build_table();
        self.connection()
            .execute_batch(&format!("DROP TABLE IF EXISTS {build};"))?;
        schema::create_mart_table(self.connection(), &build)?;
        debug!("Created empty mart build table");
        Ok(())
    }

    fn insert_mart_batch(&mut self, rows: &[AddressBalance]) -> AppResult<()> {
        let build = build_table();
        self.execute_transaction(|tx| {
            let mut stmt = tx.prepare_cached(&format!(
                r#"INSERT INTO {build} (address, balance_sats, balance_bch)
                   VALUES (?1, ?2, ?3)"#
            ))?;

            for row in rows {
                stmt.execute(params![row.address, row.balance_sats, row.balance_bch])?;
            }

            debug!("Inserted {} balance rows into mart build", rows.len());
            Ok(())
        })
    }

    fn swap_mart(&mut self) -> AppResult<()> {
        let build = build_table();
        self.execute_transaction(|tx| {
            tx.execute_batch(&format!(
                r#"
                DROP TABLE IF EXISTS {MART_TABLE};
                ALTER TABLE {build} RENAME TO {MART_TABLE};
                "#
            ))?;
            Ok(())
        })?;
        schema::create_mart_indexes(self.connection())?;
        debug!("Mart table swapped");
        Ok(())
    }

    fn drop_mart_build(&mut self) -> AppResult<()> {
        let build = build_table();
        self.connection()
            .execute_batch(&format!("DROP TABLE IF EXISTS {build};"))?;
        Ok(())
    }

    fn mart_row_count(&self) -> AppResult<u64> {
        let count: i64 =
            self.connection()
                .query_row(&format!("SELECT COUNT(*) FROM {MART_TABLE}"), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    fn get_balance(&self, address: &str) -> AppResult<Option<AddressBalance>> {
        let mut stmt = self.connection().prepare(&format!(
            r#"SELECT address, balance_sats, balance_bch
               FROM {MART_TABLE}
               WHERE address = ?1"#
        ))?;

        let mut rows = stmt.query_map(params![address], address_balance_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn get_mart_rows(&self) -> AppResult<Vec<AddressBalance>> {
        let mut stmt = self.connection().prepare(&format!(
            r#"SELECT address, balance_sats, balance_bch
               FROM {MART_TABLE}
               ORDER BY address"#
        ))?;

        let rows = stmt
            .query_map([], address_balance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn total_balance_sats(&self) -> AppResult<u64> {
        let total: i64 = self.connection().query_row(
            &format!("SELECT COALESCE(SUM(balance_sats), 0) FROM {MART_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }
}
