//! Common types shared across the pipeline
//!
//! This module contains the record types for the three source streams
//! (transactions, outputs, inputs), plus the derived rows the two transforms
//! emit (canonical transactions, address balances).

use crate::utils::currency::sats_to_bch;
use crate::utils::time::timestamp_to_iso;
use serde::{Deserialize, Serialize};

/// Separator for the multi-address CSV field (multi-sig outputs carry
/// several addresses in one ordered field)
pub const ADDRESS_SEPARATOR: char = '|';

/// Raw transaction row from transactions.csv - matches the exact CSV structure
///
/// The source provides no uniqueness guarantee on `hash`; historical
/// duplicates are expected and preserved in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub block_timestamp: i64,
    pub block_number: i64,
    pub is_coinbase: u8, // 0 or 1
    pub fee: u64,
    pub input_count: u32,
    pub output_count: u32,
}

impl TransactionRecord {
    /// Convert to a SourceTransaction, rejecting rows with an empty hash
    pub fn to_source_transaction(&self) -> Result<SourceTransaction, crate::errors::AppError> {
        if self.hash.is_empty() {
            return Err(crate::errors::AppError::InvalidData(
                "transaction row has empty hash".to_string(),
            ));
        }

        Ok(SourceTransaction {
            hash: self.hash.clone(),
            block_timestamp: self.block_timestamp,
            block_number: self.block_number,
            is_coinbase: self.is_coinbase == 1,
            fee: self.fee,
            input_count: self.input_count,
            output_count: self.output_count,
        })
    }
}

/// A transaction row as stored in the snapshot database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTransaction {
    pub hash: String,
    pub block_timestamp: i64,
    pub block_number: i64,
    pub is_coinbase: bool,
    pub fee: u64,
    pub input_count: u32,
    pub output_count: u32,
}

/// Raw output row from outputs.csv - matches the exact CSV structure
///
/// `addresses` is a `|`-separated ordered list; multi-sig outputs carry more
/// than one entry, unattributable outputs (OP_RETURN etc.) carry none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    pub transaction_hash: String,
    pub index: i64,
    pub value: u64,
    pub addresses: String,
}

impl OutputRecord {
    /// Split the raw address field into its ordered entries, dropping empties
    pub fn parse_addresses(&self) -> Vec<String> {
        self.addresses
            .split(ADDRESS_SEPARATOR)
            .filter(|a| !a.is_empty())
            .map(|a| a.to_string())
            .collect()
    }

    /// Convert to a SourceOutput, rejecting rows with an empty transaction hash
    pub fn to_source_output(&self) -> Result<SourceOutput, crate::errors::AppError> {
        if self.transaction_hash.is_empty() {
            return Err(crate::errors::AppError::InvalidData(
                "output row has empty transaction_hash".to_string(),
            ));
        }

        Ok(SourceOutput {
            transaction_hash: self.transaction_hash.clone(),
            output_index: self.index,
            value: self.value,
            addresses: self.parse_addresses(),
        })
    }
}

/// An output row as stored in the snapshot database
///
/// The address list is persisted as a JSON array column, preserving order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutput {
    pub transaction_hash: String,
    pub output_index: i64,
    pub value: u64,
    pub addresses: Vec<String>,
}

impl SourceOutput {
    /// Create a unique key for this output (transaction_hash:index)
    pub fn output_key(&self) -> String {
        format!("{}:{}", self.transaction_hash, self.output_index)
    }
}

/// Raw input row from inputs.csv, stored as-is in the snapshot
///
/// Both fields are nullable: coinbase inputs reference no prior output.
/// An empty CSV field deserializes to None.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRecord {
    pub spent_transaction_hash: Option<String>,
    pub spent_output_index: Option<i64>,
}

impl InputRecord {
    /// The `(transaction_hash, output_index)` key of the output this input
    /// consumes, or None for coinbase-style inputs
    pub fn spent_key(&self) -> Option<(String, i64)> {
        match (&self.spent_transaction_hash, self.spent_output_index) {
            (Some(hash), Some(index)) if !hash.is_empty() => Some((hash.clone(), index)),
            _ => None,
        }
    }
}

/// One deduplicated transaction row emitted by the staging transform
///
/// `block_date` is the ISO day derived from `block_timestamp` and stands in
/// for day-level partitioning of the staging table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub tx_hash: String,
    pub block_timestamp: i64,
    pub block_date: String,
    pub block_number: i64,
    pub is_coinbase: bool,
    pub fee: u64,
    pub input_count: u32,
    pub output_count: u32,
}

impl CanonicalTransaction {
    /// Build the canonical row for a winning source instance
    pub fn from_source(tx: SourceTransaction) -> Self {
        Self {
            tx_hash: tx.hash,
            block_timestamp: tx.block_timestamp,
            block_date: timestamp_to_iso(tx.block_timestamp),
            block_number: tx.block_number,
            is_coinbase: tx.is_coinbase,
            fee: tx.fee,
            input_count: tx.input_count,
            output_count: tx.output_count,
        }
    }
}

/// One mart row: the current spendable balance of a single address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressBalance {
    pub address: String,
    pub balance_sats: u64,
    pub balance_bch: f64,
}

impl AddressBalance {
    /// Build a mart row from an aggregated satoshi total
    pub fn new(address: String, balance_sats: u64) -> Self {
        Self {
            address,
            balance_sats,
            balance_bch: sats_to_bch(balance_sats),
        }
    }
}
