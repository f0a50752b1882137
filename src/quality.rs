//! Output-contract checks for the materialized tables.
//!
//! The staging and mart tables carry an externally-enforced quality contract
//! (uniqueness and not-null guarantees). The tables themselves are created
//! without storage-engine constraints; this module enforces the contract as
//! explicit count assertions, so a violation surfaces as a named check
//! failure and the pipeline can abort before swapping a bad build in.
//!
//! A non-zero violation count always signals a logic defect in a transform,
//! never an acceptable data condition.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use tracing::{info, warn};

/// Result of a single contract check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub check: String,
    pub violations: u64,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.violations == 0
    }
}

/// Contract check runner for staging and mart tables
pub struct QualityChecker;

impl QualityChecker {
    /// Staging contract: tx_hash not-null + unique, block_timestamp not-null
    pub fn run_staging_checks(conn: &Connection, table: &str) -> AppResult<Vec<CheckOutcome>> {
        Ok(vec![
            Self::count_check(
                conn,
                format!("{table}.tx_hash not_null"),
                &format!("SELECT COUNT(*) FROM {table} WHERE tx_hash IS NULL OR tx_hash = ''"),
            )?,
            Self::count_check(
                conn,
                format!("{table}.tx_hash unique"),
                &format!(
                    r#"SELECT COALESCE(SUM(n - 1), 0) FROM
                       (SELECT COUNT(*) AS n FROM {table}
                        GROUP BY tx_hash HAVING COUNT(*) > 1)"#
                ),
            )?,
            Self::count_check(
                conn,
                format!("{table}.block_timestamp not_null"),
                &format!("SELECT COUNT(*) FROM {table} WHERE block_timestamp IS NULL"),
            )?,
        ])
    }

    /// Mart contract: address not-null + unique, balance_bch not-null and
    /// non-negative
    pub fn run_mart_checks(conn: &Connection, table: &str) -> AppResult<Vec<CheckOutcome>> {
        Ok(vec![
            Self::count_check(
                conn,
                format!("{table}.address not_null"),
                &format!("SELECT COUNT(*) FROM {table} WHERE address IS NULL OR address = ''"),
            )?,
            Self::count_check(
                conn,
                format!("{table}.address unique"),
                &format!(
                    r#"SELECT COALESCE(SUM(n - 1), 0) FROM
                       (SELECT COUNT(*) AS n FROM {table}
                        GROUP BY address HAVING COUNT(*) > 1)"#
                ),
            )?,
            Self::count_check(
                conn,
                format!("{table}.balance_bch not_null"),
                &format!("SELECT COUNT(*) FROM {table} WHERE balance_bch IS NULL"),
            )?,
            Self::count_check(
                conn,
                format!("{table}.balance_bch non_negative"),
                &format!("SELECT COUNT(*) FROM {table} WHERE balance_bch < 0"),
            )?,
        ])
    }

    /// Fail on the first check with a non-zero violation count
    pub fn ensure_passed(outcomes: &[CheckOutcome]) -> AppResult<()> {
        for outcome in outcomes {
            if outcome.passed() {
                info!("Check passed: {}", outcome.check);
            } else {
                warn!(
                    "Check FAILED: {} ({} offending rows)",
                    outcome.check, outcome.violations
                );
            }
        }

        match outcomes.iter().find(|o| !o.passed()) {
            Some(failed) => Err(AppError::ContractViolation {
                check: failed.check.clone(),
                violations: failed.violations,
            }),
            None => Ok(()),
        }
    }

    fn count_check(conn: &Connection, check: String, sql: &str) -> AppResult<CheckOutcome> {
        let violations: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(CheckOutcome {
            check,
            violations: violations as u64,
        })
    }
}
