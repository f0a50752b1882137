//! Contract-check behaviour on live tables.

use crate::common::database::TestDatabase;
use bch_balance_pipeline::database::{MART_TABLE, STAGING_TABLE};
use bch_balance_pipeline::quality::QualityChecker;

#[test]
fn test_checks_pass_on_freshly_initialised_database() {
    let test_db = TestDatabase::new("quality_fresh").unwrap();
    let conn = test_db.database().connection();

    let mut outcomes = QualityChecker::run_staging_checks(conn, STAGING_TABLE).unwrap();
    outcomes.extend(QualityChecker::run_mart_checks(conn, MART_TABLE).unwrap());

    assert!(QualityChecker::ensure_passed(&outcomes).is_ok());
}

#[test]
fn test_corrupted_live_staging_table_fails_check() {
    let test_db = TestDatabase::new("quality_corrupt_staging").unwrap();
    let conn = test_db.database().connection();

    // Simulate a logic defect: duplicate hash and a NULL timestamp
    conn.execute_batch(&format!(
        r#"
        INSERT INTO {STAGING_TABLE} (tx_hash, block_timestamp, block_date)
            VALUES ('dup', 100, '1970-01-01');
        INSERT INTO {STAGING_TABLE} (tx_hash, block_timestamp, block_date)
            VALUES ('dup', NULL, '1970-01-01');
        "#
    ))
    .unwrap();

    let outcomes = QualityChecker::run_staging_checks(conn, STAGING_TABLE).unwrap();
    let err = QualityChecker::ensure_passed(&outcomes).unwrap_err();
    assert!(err.to_string().contains("Contract violation"));
}

#[test]
fn test_corrupted_live_mart_table_fails_check() {
    let test_db = TestDatabase::new("quality_corrupt_mart").unwrap();
    let conn = test_db.database().connection();

    conn.execute(
        &format!("INSERT INTO {MART_TABLE} (address, balance_sats, balance_bch) VALUES ('x', 100, NULL)"),
        [],
    )
    .unwrap();

    let outcomes = QualityChecker::run_mart_checks(conn, MART_TABLE).unwrap();
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.passed()).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].check.contains("balance_bch not_null"));
}
