//! Shared database helper functions to reduce code duplication
//!
//! Standard row mappings used by the area operation modules and the
//! transforms.

use crate::types::{AddressBalance, CanonicalTransaction, SourceTransaction};
use rusqlite::Row;

/// Construct a SourceTransaction from a snapshot query row
///
/// Expects columns in this order:
/// 0. hash (TEXT)
/// 1. block_timestamp (INTEGER)
/// 2. block_number (INTEGER)
/// 3. is_coinbase (INTEGER 0/1)
/// 4. fee (INTEGER)
/// 5. input_count (INTEGER)
/// 6. output_count (INTEGER)
pub fn source_transaction_from_row(row: &Row) -> rusqlite::Result<SourceTransaction> {
    Ok(SourceTransaction {
        hash: row.get(0)?,
        block_timestamp: row.get(1)?,
        block_number: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        is_coinbase: row.get::<_, i64>(3)? == 1,
        fee: row.get::<_, Option<i64>>(4)?.unwrap_or(0) as u64,
        input_count: row.get::<_, Option<i64>>(5)?.unwrap_or(0) as u32,
        output_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0) as u32,
    })
}

/// Construct a CanonicalTransaction from a staging-table row
///
/// Expects columns in this order:
/// 0. tx_hash (TEXT)
/// 1. block_timestamp (INTEGER)
/// 2. block_date (TEXT)
/// 3. block_number (INTEGER)
/// 4. is_coinbase (INTEGER 0/1)
/// 5. fee (INTEGER)
/// 6. input_count (INTEGER)
/// 7. output_count (INTEGER)
pub fn canonical_transaction_from_row(row: &Row) -> rusqlite::Result<CanonicalTransaction> {
    Ok(CanonicalTransaction {
        tx_hash: row.get(0)?,
        block_timestamp: row.get(1)?,
        block_date: row.get(2)?,
        block_number: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
        is_coinbase: row.get::<_, i64>(4)? == 1,
        fee: row.get::<_, Option<i64>>(5)?.unwrap_or(0) as u64,
        input_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0) as u32,
        output_count: row.get::<_, Option<i64>>(7)?.unwrap_or(0) as u32,
    })
}

/// Construct an AddressBalance from a mart-table row
///
/// Expects columns in this order:
/// 0. address (TEXT)
/// 1. balance_sats (INTEGER)
/// 2. balance_bch (REAL)
pub fn address_balance_from_row(row: &Row) -> rusqlite::Result<AddressBalance> {
    Ok(AddressBalance {
        address: row.get(0)?,
        balance_sats: row.get::<_, i64>(1)? as u64,
        balance_bch: row.get(2)?,
    })
}
