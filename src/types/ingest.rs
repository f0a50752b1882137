//! Snapshot ingestion configuration
//!
//! Configuration for loading the three source CSV exports into the local
//! snapshot database.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for snapshot ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub transactions_csv: PathBuf,
    pub outputs_csv: PathBuf,
    pub inputs_csv: PathBuf,
    pub database_path: PathBuf,
    pub batch_size: usize,
    pub progress_interval: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            transactions_csv: "./data/transactions.csv".into(),
            outputs_csv: "./data/outputs.csv".into(),
            inputs_csv: "./data/inputs.csv".into(),
            database_path: "./balance_pipeline.db".into(),
            batch_size: 10_000,         // Records per batch insert
            progress_interval: 100_000, // Progress report every N records
        }
    }
}

/// Builder for IngestConfig with validation
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    transactions_csv: Option<PathBuf>,
    outputs_csv: Option<PathBuf>,
    inputs_csv: Option<PathBuf>,
    database_path: Option<PathBuf>,
    batch_size: Option<usize>,
    progress_interval: Option<usize>,
}

impl IngestConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transactions CSV path
    pub fn transactions_csv<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.transactions_csv = Some(path.into());
        self
    }

    /// Set the outputs CSV path
    pub fn outputs_csv<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.outputs_csv = Some(path.into());
        self
    }

    /// Set the inputs CSV path
    pub fn inputs_csv<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inputs_csv = Some(path.into());
        self
    }

    /// Set the database file path
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the batch size for database operations
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Set the progress reporting interval
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Build the configuration with validation
    pub fn build(self) -> Result<IngestConfig, String> {
        let defaults = IngestConfig::default();
        let config = IngestConfig {
            transactions_csv: self.transactions_csv.unwrap_or(defaults.transactions_csv),
            outputs_csv: self.outputs_csv.unwrap_or(defaults.outputs_csv),
            inputs_csv: self.inputs_csv.unwrap_or(defaults.inputs_csv),
            database_path: self.database_path.unwrap_or(defaults.database_path),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            progress_interval: self.progress_interval.unwrap_or(defaults.progress_interval),
        };

        config.validate()?;
        Ok(config)
    }
}

impl IngestConfig {
    /// Create a new builder
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::new()
    }

    /// Validate the current configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("Batch size cannot be zero".to_string());
        }

        if self.progress_interval == 0 {
            return Err("Progress interval cannot be zero".to_string());
        }

        Ok(())
    }
}
