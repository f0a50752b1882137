//! The two core transforms of the pipeline.
//!
//! Both are pure, deterministic functions over the source snapshot and are
//! independent of each other: `staging` windows and deduplicates the raw
//! transaction stream; `balance` computes per-address UTXO balances from the
//! full unwindowed history. The balance transform never reads the staging
//! output.

pub mod balance;
pub mod staging;

pub use balance::BalanceTransform;
pub use staging::{StagingResult, StagingTransform};
