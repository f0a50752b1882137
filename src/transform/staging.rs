//! Staging transform: windowed deduplication of the raw transaction stream.
//!
//! Produces one canonical row per distinct transaction hash inside a trailing
//! 90-day window. The window is anchored at the maximum `block_timestamp`
//! observed in the entire source, not at wall-clock now, so replaying a
//! historical snapshot with no recent activity yields a stable result.

use crate::database::helpers::source_transaction_from_row;
use crate::database::Database;
use crate::errors::AppResult;
use crate::types::{CanonicalTransaction, SourceTransaction};
use crate::utils::time::window_start;
use std::collections::HashMap;
use tracing::info;

/// Output of one staging transform run
#[derive(Debug, Clone)]
pub struct StagingResult {
    pub rows: Vec<CanonicalTransaction>,
    pub max_block_timestamp: Option<i64>,
    pub window_start: Option<i64>,
}

impl StagingResult {
    fn empty() -> Self {
        Self {
            rows: Vec::new(),
            max_block_timestamp: None,
            window_start: None,
        }
    }
}

/// Staging transform engine
pub struct StagingTransform;

impl StagingTransform {
    /// Compute the canonical transaction set from the current snapshot
    ///
    /// 1. Anchor: `max_ts` = maximum `block_timestamp` across the full stream.
    ///    An empty stream produces zero rows, not an error.
    /// 2. Window: scan rows with `block_timestamp >= max_ts - 90 days`.
    /// 3. Dedup: group by `hash`, retaining the instance ranking highest by
    ///    `(block_timestamp, hash)` descending. Duplicates outside the window
    ///    are never scanned, so they cannot win.
    pub fn run(db: &Database) -> AppResult<StagingResult> {
        let conn = db.connection();

        let max_ts: Option<i64> = conn.query_row(
            "SELECT MAX(block_timestamp) FROM source_transactions",
            [],
            |row| row.get(0),
        )?;

        let Some(max_ts) = max_ts else {
            info!("Source transaction stream is empty - staging output has zero rows");
            return Ok(StagingResult::empty());
        };

        let start = window_start(max_ts);
        info!(
            "Staging window anchored at {}: keeping block_timestamp >= {}",
            max_ts, start
        );

        let mut stmt = conn.prepare(
            r#"SELECT hash, block_timestamp, block_number, is_coinbase, fee,
                      input_count, output_count
               FROM source_transactions
               WHERE block_timestamp >= ?1"#,
        )?;

        // Within a hash group the secondary rank key equals the group key, so
        // the comparison reduces to block_timestamp; ties keep the held
        // instance (contract columns are identical either way).
        let mut winners: HashMap<String, SourceTransaction> = HashMap::new();
        let rows = stmt.query_map([start], source_transaction_from_row)?;
        for row in rows {
            let tx = row?;
            match winners.get(&tx.hash) {
                Some(current) if current.block_timestamp >= tx.block_timestamp => {}
                _ => {
                    winners.insert(tx.hash.clone(), tx);
                }
            }
        }

        let mut canonical: Vec<CanonicalTransaction> = winners
            .into_values()
            .map(CanonicalTransaction::from_source)
            .collect();
        canonical.sort_by(|a, b| a.tx_hash.cmp(&b.tx_hash));

        info!(
            "Staging transform produced {} canonical rows",
            canonical.len()
        );

        Ok(StagingResult {
            rows: canonical,
            max_block_timestamp: Some(max_ts),
            window_start: Some(start),
        })
    }
}
