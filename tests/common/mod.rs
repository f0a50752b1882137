//! Common Test Utilities
//!
//! This module provides shared utilities and helper functions used across all
//! test files to reduce code duplication and ensure consistent test setup.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global test counter for generating unique test database paths
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique test database path for a given test
///
/// This function creates a unique database path by combining:
/// - Test name
/// - Process ID
/// - Atomic counter
/// - Current timestamp
///
/// This ensures no test conflicts even when running in parallel.
pub fn create_unique_test_db_path(test_name: &str) -> String {
    let test_dir = PathBuf::from("test_output/tests");
    std::fs::create_dir_all(&test_dir).unwrap();

    let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let db_path = test_dir.join(format!(
        "{}_{}_{}_{}.db",
        test_name,
        std::process::id(),
        unique_id,
        timestamp
    ));
    db_path.to_str().unwrap().to_string()
}

/// Database setup and teardown utilities
pub mod database {
    use bch_balance_pipeline::database::Database;

    /// Test database wrapper that automatically cleans up on drop
    pub struct TestDatabase {
        pub db: Database,
        path: String,
    }

    impl TestDatabase {
        /// Create a new test database with automatic cleanup
        ///
        /// All test databases use the production schema.
        pub fn new(test_name: &str) -> anyhow::Result<Self> {
            let path = super::create_unique_test_db_path(test_name);
            let db = Database::new(&path)?;
            Ok(TestDatabase { db, path })
        }

        /// Get the database path
        pub fn path(&self) -> &str {
            &self.path
        }

        /// Get a reference to the inner database
        pub fn database(&self) -> &Database {
            &self.db
        }

        /// Get a mutable reference to the inner database
        pub fn database_mut(&mut self) -> &mut Database {
            &mut self.db
        }
    }

    impl Drop for TestDatabase {
        fn drop(&mut self) {
            if std::path::Path::new(&self.path).exists() {
                let _ = std::fs::remove_file(&self.path);
            }
        }
    }
}

/// Snapshot seeding helpers
pub mod seeding {
    use bch_balance_pipeline::types::{InputRecord, SourceOutput, SourceTransaction};

    /// Build a source transaction row with sensible defaults
    pub fn transaction(hash: &str, block_timestamp: i64, is_coinbase: bool) -> SourceTransaction {
        SourceTransaction {
            hash: hash.to_string(),
            block_timestamp,
            block_number: 800_000,
            is_coinbase,
            fee: 250,
            input_count: 1,
            output_count: 2,
        }
    }

    /// Build a source output row
    pub fn output(tx_hash: &str, index: i64, value: u64, addresses: &[&str]) -> SourceOutput {
        SourceOutput {
            transaction_hash: tx_hash.to_string(),
            output_index: index,
            value,
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Build an input row referencing the output it spends
    pub fn spend(tx_hash: &str, index: i64) -> InputRecord {
        InputRecord {
            spent_transaction_hash: Some(tx_hash.to_string()),
            spent_output_index: Some(index),
        }
    }
}

/// CSV fixture writers matching the production export format
pub mod fixtures {
    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    /// One row of the transactions export:
    /// (hash, block_timestamp, block_number, is_coinbase, fee, input_count, output_count)
    pub type TxRow<'a> = (&'a str, i64, i64, u8, u64, u32, u32);

    /// One row of the outputs export: (transaction_hash, index, value, addresses)
    /// where addresses is the raw `|`-separated field
    pub type OutputRow<'a> = (&'a str, i64, u64, &'a str);

    /// One row of the inputs export: (spent_transaction_hash, spent_output_index)
    /// with empty strings standing for NULL
    pub type InputRow<'a> = (&'a str, &'a str);

    /// Write a transactions CSV with comment headers like the production format
    pub fn write_transactions_csv(dir: &Path, rows: &[TxRow]) -> PathBuf {
        let path = dir.join("transactions.csv");
        let mut file = File::create(&path).expect("Failed to create transactions CSV");

        writeln!(file, "# BCH chain export - transactions").unwrap();
        writeln!(
            file,
            "hash,block_timestamp,block_number,is_coinbase,fee,input_count,output_count"
        )
        .unwrap();
        for (hash, ts, block, coinbase, fee, inputs, outputs) in rows {
            writeln!(
                file,
                "{},{},{},{},{},{},{}",
                hash, ts, block, coinbase, fee, inputs, outputs
            )
            .unwrap();
        }
        path
    }

    /// Write an outputs CSV with comment headers like the production format
    pub fn write_outputs_csv(dir: &Path, rows: &[OutputRow]) -> PathBuf {
        let path = dir.join("outputs.csv");
        let mut file = File::create(&path).expect("Failed to create outputs CSV");

        writeln!(file, "# BCH chain export - outputs").unwrap();
        writeln!(file, "transaction_hash,index,value,addresses").unwrap();
        for (tx_hash, index, value, addresses) in rows {
            writeln!(file, "{},{},{},{}", tx_hash, index, value, addresses).unwrap();
        }
        path
    }

    /// Write an inputs CSV with comment headers like the production format
    pub fn write_inputs_csv(dir: &Path, rows: &[InputRow]) -> PathBuf {
        let path = dir.join("inputs.csv");
        let mut file = File::create(&path).expect("Failed to create inputs CSV");

        writeln!(file, "# BCH chain export - inputs").unwrap();
        writeln!(file, "spent_transaction_hash,spent_output_index").unwrap();
        for (tx_hash, index) in rows {
            writeln!(file, "{},{}", tx_hash, index).unwrap();
        }
        path
    }
}
