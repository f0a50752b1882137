//! Consolidated statistics framework for the pipeline
//!
//! This module provides a unified statistics collection system with common
//! traits and implementations for ingestion and the transform pipeline.

use std::time::{Duration, Instant};

/// Common trait for all statistics collectors
pub trait StatisticsCollector {
    /// Reset all counters to zero
    fn reset(&mut self);

    /// Get the processing start time
    fn start_time(&self) -> Instant;

    /// Get the total processing duration
    fn duration(&self) -> Duration;

    /// Calculate the processing rate (items per second)
    fn processing_rate(&self) -> f64;

    /// Finalize statistics collection
    fn finish(&mut self);

    /// Get a summary of the statistics
    fn summary(&self) -> String;
}

/// Common timing information for all statistics
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub start_time: Instant,
    pub processing_duration: Duration,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            processing_duration: Duration::default(),
        }
    }
}

impl TimingInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&mut self) {
        self.processing_duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        if self.processing_duration.is_zero() {
            self.start_time.elapsed()
        } else {
            self.processing_duration
        }
    }
}

/// Snapshot ingestion statistics
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub transactions_loaded: usize,
    pub outputs_loaded: usize,
    pub inputs_loaded: usize,
    pub malformed_records: usize,
    pub batches_committed: usize,
    pub timing: TimingInfo,
}

impl Default for IngestStats {
    fn default() -> Self {
        Self {
            transactions_loaded: 0,
            outputs_loaded: 0,
            inputs_loaded: 0,
            malformed_records: 0,
            batches_committed: 0,
            timing: TimingInfo::new(),
        }
    }
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows loaded across the three streams
    pub fn total_loaded(&self) -> usize {
        self.transactions_loaded + self.outputs_loaded + self.inputs_loaded
    }

    pub fn error_rate(&self) -> f64 {
        let seen = self.total_loaded() + self.malformed_records;
        if seen > 0 {
            (self.malformed_records as f64 / seen as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl crate::processor::StageMetrics for IngestStats {
    fn format_custom_metrics(&self) -> String {
        format!(
            "Tx: {} | Outputs: {} | Inputs: {} | Malformed: {}",
            self.transactions_loaded,
            self.outputs_loaded,
            self.inputs_loaded,
            self.malformed_records
        )
    }
}

impl StatisticsCollector for IngestStats {
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn start_time(&self) -> Instant {
        self.timing.start_time
    }

    fn duration(&self) -> Duration {
        self.timing.elapsed()
    }

    fn processing_rate(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs > 0.0 {
            self.total_loaded() as f64 / secs
        } else {
            0.0
        }
    }

    fn finish(&mut self) {
        self.timing.finish();
    }

    fn summary(&self) -> String {
        format!(
            "{} rows loaded ({} transactions, {} outputs, {} inputs), {} malformed",
            self.total_loaded(),
            self.transactions_loaded,
            self.outputs_loaded,
            self.inputs_loaded,
            self.malformed_records
        )
    }
}

/// Result summary for one pipeline run
///
/// `staging_rows`/`mart_rows` are None for transforms the run skipped.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub staging_rows: Option<usize>,
    pub mart_rows: Option<usize>,
    pub max_block_timestamp: Option<i64>,
    pub window_start: Option<i64>,
    pub total_balance_sats: u64,
    pub timing: TimingInfo,
}

impl Default for PipelineSummary {
    fn default() -> Self {
        Self {
            staging_rows: None,
            mart_rows: None,
            max_block_timestamp: None,
            window_start: None,
            total_balance_sats: 0,
            timing: TimingInfo::new(),
        }
    }
}

impl PipelineSummary {
    pub fn new() -> Self {
        Self::default()
    }
}
