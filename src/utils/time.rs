//! Time utilities for windowing and day partitioning
//!
//! Shared helpers for the staging window arithmetic and the derived
//! day-partition column.

use chrono::{TimeZone, Utc};

/// Seconds in a day (24 × 60 × 60 = 86400)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Length of the staging window in days
pub const STAGING_WINDOW_DAYS: i64 = 90;

/// Inclusive lower bound of the staging window anchored at `max_ts`
///
/// # Examples
/// ```
/// use bch_balance_pipeline::utils::time::{window_start, SECONDS_PER_DAY};
/// assert_eq!(window_start(90 * SECONDS_PER_DAY), 0);
/// ```
pub fn window_start(max_ts: i64) -> i64 {
    max_ts - STAGING_WINDOW_DAYS * SECONDS_PER_DAY
}

/// Convert Unix timestamp to ISO 8601 date string (YYYY-MM-DD)
///
/// Returns "1970-01-01" for invalid timestamps.
///
/// # Examples
/// ```
/// use bch_balance_pipeline::utils::time::timestamp_to_iso;
/// assert_eq!(timestamp_to_iso(0), "1970-01-01");
/// assert_eq!(timestamp_to_iso(1704067200), "2024-01-01");
/// ```
pub fn timestamp_to_iso(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "1970-01-01".to_string())
}
