use super::{ConfigValidator, ProgressReporter, StandardProgressTracker};
use crate::database::traits::{SourceOperations, StatisticsOperations};
use crate::database::{Database, DatabaseStats};
use crate::errors::{AppError, AppResult};
use crate::types::statistics::IngestStats;
use crate::types::{IngestConfig, InputRecord, OutputRecord, TransactionRecord};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Snapshot loader for the three source CSV streams
///
/// Loads transactions, outputs and inputs into the snapshot tables in
/// batches. Re-running replaces the snapshot wholesale (full refresh).
pub struct SnapshotLoader {
    config: IngestConfig,
    database: Database,
}

impl SnapshotLoader {
    /// Create a new snapshot loader
    pub fn new(config: IngestConfig) -> AppResult<Self> {
        ConfigValidator::validate_batch_config(config.batch_size, config.progress_interval)?;

        let database = Database::new(&config.database_path.to_string_lossy())?;

        ConfigValidator::log_config_summary(
            "Snapshot Loader",
            config.batch_size,
            config.progress_interval,
            Some(&format!("Database: {}", config.database_path.display())),
        );
        info!("Transactions CSV: {}", config.transactions_csv.display());
        info!("Outputs CSV: {}", config.outputs_csv.display());
        info!("Inputs CSV: {}", config.inputs_csv.display());

        Ok(Self { config, database })
    }

    /// Get database statistics
    pub fn get_database_stats(&self) -> AppResult<DatabaseStats> {
        self.database.get_database_stats()
    }

    /// Count data records in a CSV file (memory-efficient, portable)
    /// Skips comment lines (starting with #) and the CSV header line
    fn count_csv_records(path: &Path) -> AppResult<u64> {
        let file = File::open(path).map_err(AppError::Io)?;
        let reader = BufReader::with_capacity(8 * 1024 * 1024, file); // 8MB buffer

        let mut count = 0u64;
        let mut found_header = false;

        for line_result in reader.lines() {
            let line = line_result.map_err(AppError::Io)?;
            let trimmed = line.trim();

            // Skip comment lines (starting with #)
            if trimmed.starts_with('#') {
                continue;
            }

            // Skip the first non-comment line (CSV header)
            if !found_header {
                found_header = true;
                continue;
            }

            count += 1;
        }

        Ok(count)
    }

    /// Load all three streams into a fresh snapshot
    pub fn load_all(&mut self) -> AppResult<IngestStats> {
        let mut stats = IngestStats::new();

        info!("Starting snapshot ingestion");
        self.database.reset_source_tables()?;

        self.load_transactions(&mut stats)?;
        self.load_outputs(&mut stats)?;
        self.load_inputs(&mut stats)?;

        stats.timing.finish();
        ProgressReporter::finish_progress_line();

        info!("Snapshot ingestion completed");
        info!("Transaction rows: {}", stats.transactions_loaded);
        info!("Output rows: {}", stats.outputs_loaded);
        info!("Input rows: {}", stats.inputs_loaded);
        info!("Malformed records: {}", stats.malformed_records);

        Ok(stats)
    }

    /// Load the transaction stream
    fn load_transactions(&mut self, stats: &mut IngestStats) -> AppResult<()> {
        let path = self.config.transactions_csv.clone();
        let total_records = Self::count_csv_records(&path)?;
        info!(
            "Loading {} transaction records from {}",
            total_records,
            path.display()
        );

        let file = File::open(&path).map_err(AppError::Io)?;
        let mut csv_reader = ReaderBuilder::new()
            .comment(Some(b'#')) // Skip lines starting with #
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut batch = Vec::with_capacity(self.config.batch_size);
        let mut processed = 0usize;

        let mut progress_tracker = StandardProgressTracker::new();
        progress_tracker.start();

        for (line_num, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
            let record = result.map_err(AppError::Csv)?;
            processed += 1;

            match record.to_source_transaction() {
                Ok(tx) => {
                    batch.push(tx);
                    stats.transactions_loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping transaction row at line {}: {}", line_num + 1, e);
                    stats.malformed_records += 1;
                    continue;
                }
            }

            if batch.len() >= self.config.batch_size {
                self.database.insert_transaction_batch(&batch)?;
                batch.clear();
                stats.batches_committed += 1;
            }

            // Timer-driven progress updates (~500ms) to keep output clean
            if progress_tracker.should_report() {
                ProgressReporter::report_progress_with_metrics(
                    stats,
                    processed,
                    Some(total_records as usize),
                    progress_tracker.elapsed_seconds(),
                )?;
            }
        }

        if !batch.is_empty() {
            self.database.insert_transaction_batch(&batch)?;
            stats.batches_committed += 1;
        }

        Ok(())
    }

    /// Load the output stream
    fn load_outputs(&mut self, stats: &mut IngestStats) -> AppResult<()> {
        let path = self.config.outputs_csv.clone();
        let total_records = Self::count_csv_records(&path)?;
        info!(
            "Loading {} output records from {}",
            total_records,
            path.display()
        );

        let file = File::open(&path).map_err(AppError::Io)?;
        let mut csv_reader = ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut batch = Vec::with_capacity(self.config.batch_size);
        let mut processed = 0usize;

        let mut progress_tracker = StandardProgressTracker::new();
        progress_tracker.start();

        for (line_num, result) in csv_reader.deserialize::<OutputRecord>().enumerate() {
            let record = result.map_err(AppError::Csv)?;
            processed += 1;

            match record.to_source_output() {
                Ok(output) => {
                    batch.push(output);
                    stats.outputs_loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping output row at line {}: {}", line_num + 1, e);
                    stats.malformed_records += 1;
                    continue;
                }
            }

            if batch.len() >= self.config.batch_size {
                self.database.insert_output_batch(&batch)?;
                batch.clear();
                stats.batches_committed += 1;
            }

            if progress_tracker.should_report() {
                ProgressReporter::report_progress_with_metrics(
                    stats,
                    processed,
                    Some(total_records as usize),
                    progress_tracker.elapsed_seconds(),
                )?;
            }
        }

        if !batch.is_empty() {
            self.database.insert_output_batch(&batch)?;
            stats.batches_committed += 1;
        }

        Ok(())
    }

    /// Load the input stream
    ///
    /// Input rows need no conversion: both columns are nullable (coinbase
    /// inputs reference no prior output) and stored as-is.
    fn load_inputs(&mut self, stats: &mut IngestStats) -> AppResult<()> {
        let path = self.config.inputs_csv.clone();
        let total_records = Self::count_csv_records(&path)?;
        info!(
            "Loading {} input records from {}",
            total_records,
            path.display()
        );

        let file = File::open(&path).map_err(AppError::Io)?;
        let mut csv_reader = ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut batch = Vec::with_capacity(self.config.batch_size);
        let mut processed = 0usize;

        let mut progress_tracker = StandardProgressTracker::new();
        progress_tracker.start();

        for result in csv_reader.deserialize::<InputRecord>() {
            let record = result.map_err(AppError::Csv)?;
            processed += 1;

            batch.push(record);
            stats.inputs_loaded += 1;

            if batch.len() >= self.config.batch_size {
                self.database.insert_input_batch(&batch)?;
                batch.clear();
                stats.batches_committed += 1;
            }

            if progress_tracker.should_report() {
                ProgressReporter::report_progress_with_metrics(
                    stats,
                    processed,
                    Some(total_records as usize),
                    progress_tracker.elapsed_seconds(),
                )?;
            }
        }

        if !batch.is_empty() {
            self.database.insert_input_batch(&batch)?;
            stats.batches_committed += 1;
        }

        Ok(())
    }
}
