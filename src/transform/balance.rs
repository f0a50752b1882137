//! Balance transform: per-address UTXO balances over full history.
//!
//! Consumes the raw outputs/inputs/transactions streams (never the staging
//! output) and computes the current spendable balance of every address,
//! excluding any address with a lifetime coinbase association.
//!
//! The exclusion is strict by policy: one coinbase-tagged output anywhere in
//! history removes the address from the mart permanently, even when its
//! unrelated activity would yield a legitimate balance.

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::types::AddressBalance;
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Balance transform engine
pub struct BalanceTransform;

impl BalanceTransform {
    /// Compute current per-address balances from the current snapshot
    ///
    /// 1. Build the spent-output key set from inputs (rows without a
    ///    back-reference are ignored).
    /// 2. Build the coinbase transaction-hash set over full history.
    /// 3. Stream all outputs once: expand each into per-address units,
    ///    collect coinbase-tainted addresses, and aggregate the value of
    ///    unspent units per address with checked summation.
    /// 4. Drop tainted addresses from the aggregate (anti-join on address).
    pub fn run(db: &Database) -> AppResult<Vec<AddressBalance>> {
        let conn = db.connection();

        // Spent-output key set. An output is a UTXO iff its key is absent.
        let mut spent_keys: HashSet<(String, i64)> = HashSet::new();
        {
            let mut stmt = conn.prepare(
                r#"SELECT spent_transaction_hash, spent_output_index
                   FROM source_inputs
                   WHERE spent_transaction_hash IS NOT NULL
                     AND spent_transaction_hash != ''
                     AND spent_output_index IS NOT NULL"#,
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                spent_keys.insert(row?);
            }
        }
        info!("Spent-output key set: {} entries", spent_keys.len());

        // Coinbase transactions over the full unwindowed stream
        let mut coinbase_txs: HashSet<String> = HashSet::new();
        {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT hash FROM source_transactions WHERE is_coinbase = 1",
            )?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            for row in rows {
                coinbase_txs.insert(row?);
            }
        }
        info!("Coinbase transactions: {}", coinbase_txs.len());

        // Single streamed pass over outputs
        let mut balances: HashMap<String, u64> = HashMap::new();
        let mut coinbase_addresses: HashSet<String> = HashSet::new();
        {
            let mut stmt = conn.prepare(
                r#"SELECT transaction_hash, output_index, value, addresses_json
                   FROM source_outputs"#,
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, i64>(2)? as u64,
                    row.get::<_, String>(3)?,
                ))
            })?;

            for row in rows {
                let (tx_hash, output_index, value, addresses_json) = row?;
                let addresses: Vec<String> = serde_json::from_str(&addresses_json)?;

                let is_coinbase = coinbase_txs.contains(&tx_hash);
                if is_coinbase {
                    for address in addresses.iter().filter(|a| !a.is_empty()) {
                        coinbase_addresses.insert(address.clone());
                    }
                }

                // A spent output contributes nothing for any of its addresses.
                // An output with no index cannot be referenced by an input.
                let is_spent = match output_index {
                    Some(index) => spent_keys.contains(&(tx_hash.clone(), index)),
                    None => false,
                };
                if is_spent {
                    continue;
                }

                for address in addresses.iter().filter(|a| !a.is_empty()) {
                    let current = balances.get(address.as_str()).copied().unwrap_or(0);
                    let updated =
                        current
                            .checked_add(value)
                            .ok_or_else(|| AppError::BalanceOverflow {
                                address: address.clone(),
                            })?;
                    balances.insert(address.clone(), updated);
                }
            }
        }
        info!("Coinbase-tainted addresses: {}", coinbase_addresses.len());

        // Anti-join: drop any address with a lifetime coinbase association
        let mut mart: Vec<AddressBalance> = balances
            .into_iter()
            .filter(|(address, _)| !coinbase_addresses.contains(address))
            .map(|(address, sats)| AddressBalance::new(address, sats))
            .collect();
        mart.sort_by(|a, b| a.address.cmp(&b.address));

        info!("Balance transform produced {} address rows", mart.len());
        Ok(mart)
    }
}
