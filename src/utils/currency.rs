//! Currency conversion utilities for Bitcoin Cash and satoshi values
//!
//! This module provides the fixed satoshi-to-BCH conversion used by the
//! balance mart, plus display formatting for summaries.

/// Satoshis per Bitcoin Cash
pub const SATS_PER_BCH: f64 = 100_000_000.0;

/// Convert a satoshi amount to whole BCH units (fixed 1e8 divisor)
///
/// # Examples
/// ```
/// use bch_balance_pipeline::utils::currency::sats_to_bch;
///
/// assert!((sats_to_bch(500_000_000) - 5.0).abs() < f64::EPSILON);
/// assert!((sats_to_bch(1) - 0.00000001).abs() < f64::EPSILON);
/// ```
pub fn sats_to_bch(sats: u64) -> f64 {
    sats as f64 / SATS_PER_BCH
}

/// Format a satoshi amount as dual BCH + sats display
///
/// # Examples
/// ```
/// use bch_balance_pipeline::utils::currency::format_sats_as_bch;
///
/// assert_eq!(
///     format_sats_as_bch(28125351850),
///     "281.25351850 BCH (28125351850 sats)"
/// );
/// assert_eq!(
///     format_sats_as_bch(5471),
///     "0.00005471 BCH (5471 sats)"
/// );
/// ```
pub fn format_sats_as_bch(sats: u64) -> String {
    format!("{:.8} BCH ({} sats)", sats_to_bch(sats), sats)
}
