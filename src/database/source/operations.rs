//! Source snapshot operations - loading the three raw streams.
//!
//! Each batch is inserted inside a single transaction with prepared
//! statements. The snapshot preserves the source as-is: duplicate
//! transaction hashes survive, input rows may be all-NULL (coinbase),
//! and the ordered address list is stored as a JSON array column.

use crate::database::traits::SourceOperations;
use crate::database::Database;
use crate::errors::AppResult;
use crate::types::{InputRecord, SourceOutput, SourceTransaction};
use rusqlite::params;
use tracing::debug;

impl SourceOperations for Database {
    fn reset_source_tables(&mut self) -> AppResult<()> {
        self.execute_transaction(|tx| {
            tx.execute("DELETE FROM source_transactions", [])?;
            tx.execute("DELETE FROM source_outputs", [])?;
            tx.execute("DELETE FROM source_inputs", [])?;
            Ok(())
        })?;
        debug!("Source snapshot tables cleared");
        Ok(())
    }

    fn insert_transaction_batch(&mut self, batch: &[SourceTransaction]) -> AppResult<()> {
        self.execute_transaction(|tx| {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO source_transactions
                   (hash, block_timestamp, block_number, is_coinbase, fee,
                    input_count, output_count)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            )?;

            for record in batch {
                stmt.execute(params![
                    record.hash,
                    record.block_timestamp,
                    record.block_number,
                    record.is_coinbase,
                    record.fee,
                    record.input_count,
                    record.output_count
                ])?;
            }

            debug!("Inserted batch of {} transaction rows", batch.len());
            Ok(())
        })
    }

    fn insert_output_batch(&mut self, batch: &[SourceOutput]) -> AppResult<()> {
        self.execute_transaction(|tx| {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO source_outputs
                   (transaction_hash, output_index, value, addresses_json)
                   VALUES (?1, ?2, ?3, ?4)"#,
            )?;

            for record in batch {
                // serde_json::Error converts to AppError::InvalidData via From
                let addresses_json = serde_json::to_string(&record.addresses)?;
                stmt.execute(params![
                    record.transaction_hash,
                    record.output_index,
                    record.value,
                    addresses_json
                ])?;
            }

            debug!("Inserted batch of {} output rows", batch.len());
            Ok(())
        })
    }

    fn insert_input_batch(&mut self, batch: &[InputRecord]) -> AppResult<()> {
        self.execute_transaction(|tx| {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO source_inputs
                   (spent_transaction_hash, spent_output_index)
                   VALUES (?1, ?2)"#,
            )?;

            for record in batch {
                stmt.execute(params![
                    record.spent_transaction_hash,
                    record.spent_output_index
                ])?;
            }

            debug!("Inserted batch of {} input rows", batch.len());
            Ok(())
        })
    }
}
