//! End-to-end runs: CSV exports -> ingest -> transforms -> swapped tables.

use crate::common::create_unique_test_db_path;
use crate::common::fixtures::{write_inputs_csv, write_outputs_csv, write_transactions_csv};
use bch_balance_pipeline::database::traits::{MartOperations, StagingOperations};
use bch_balance_pipeline::database::{Database, MART_TABLE, STAGING_TABLE};
use bch_balance_pipeline::pipeline::{PipelineRunner, RunOptions};
use bch_balance_pipeline::processor::SnapshotLoader;
use bch_balance_pipeline::quality::QualityChecker;
use bch_balance_pipeline::types::IngestConfig;
use bch_balance_pipeline::utils::time::SECONDS_PER_DAY;
use tempfile::TempDir;

const ANCHOR: i64 = 2_000 * SECONDS_PER_DAY;

/// Seed a database file with a small chain covering the interesting cases:
/// duplicate hashes, an out-of-window transaction, a spent output, a
/// multi-sig output and a coinbase-tainted address with legitimate balance.
fn ingest_chain_fixture(db_path: &str) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let tx_csv = write_transactions_csv(
        temp_dir.path(),
        &[
            ("coinbase1", ANCHOR - 80 * SECONDS_PER_DAY, 799_000, 1, 0, 1, 1),
            ("dup", ANCHOR - 10 * SECONDS_PER_DAY, 799_500, 0, 250, 1, 1),
            ("dup", ANCHOR - 5 * SECONDS_PER_DAY, 799_600, 0, 250, 1, 1),
            ("simple", ANCHOR - 1 * SECONDS_PER_DAY, 799_900, 0, 250, 1, 1),
            ("spent_tx", ANCHOR - 2 * SECONDS_PER_DAY, 799_800, 0, 250, 1, 1),
            ("multisig", ANCHOR, 800_000, 0, 250, 1, 1),
            ("ancient", ANCHOR - 200 * SECONDS_PER_DAY, 780_000, 0, 250, 1, 1),
        ],
    );
    let out_csv = write_outputs_csv(
        temp_dir.path(),
        &[
            ("coinbase1", 0, 625_000_000, "miner"),
            ("simple", 0, 500_000_000, "A"),
            ("spent_tx", 0, 100_000_000, "B"),
            ("multisig", 0, 30_000, "M1|M2"),
            // miner's legitimate, unrelated balance - still excluded
            ("simple", 1, 200_000_000, "miner"),
            // ancient output outside the staging window still counts here
            ("ancient", 0, 70_000, "A"),
        ],
    );
    let in_csv = write_inputs_csv(
        temp_dir.path(),
        &[
            ("spent_tx", "0"),
            ("", ""), // coinbase back-reference, NULL key
        ],
    );

    let config = IngestConfig::builder()
        .transactions_csv(tx_csv)
        .outputs_csv(out_csv)
        .inputs_csv(in_csv)
        .database_path(db_path)
        .build()
        .unwrap();

    let mut loader = SnapshotLoader::new(config).expect("Failed to create loader");
    loader.load_all().expect("Ingest failed");
}

#[test]
fn test_full_pipeline_end_to_end() {
    let db_path = create_unique_test_db_path("full_pipeline");
    ingest_chain_fixture(&db_path);

    let mut runner = PipelineRunner::new(&db_path).expect("Failed to open runner");
    let summary = runner.run(&RunOptions::default()).expect("Run failed");

    // Staging: ancient falls outside the window, dup collapses to one row
    assert_eq!(summary.staging_rows, Some(5));
    assert_eq!(summary.max_block_timestamp, Some(ANCHOR));
    assert_eq!(summary.window_start, Some(ANCHOR - 90 * SECONDS_PER_DAY));

    let staging = runner.database().get_staging_rows().unwrap();
    assert!(staging.iter().all(|r| r.tx_hash != "ancient"));
    let dup = staging.iter().find(|r| r.tx_hash == "dup").unwrap();
    assert_eq!(dup.block_timestamp, ANCHOR - 5 * SECONDS_PER_DAY);

    // Mart scenarios:
    let mart = runner.database().get_mart_rows().unwrap();

    // simple spend: A holds 5 BCH plus the ancient 70k sats
    let a = runner.database().get_balance("A").unwrap().unwrap();
    assert_eq!(a.balance_sats, 500_070_000);

    // fully spent: B has no row
    assert!(runner.database().get_balance("B").unwrap().is_none());

    // coinbase taint: miner excluded despite 2 BCH of legitimate balance
    assert!(runner.database().get_balance("miner").unwrap().is_none());

    // multi-sig: full value attributed to each address
    let m1 = runner.database().get_balance("M1").unwrap().unwrap();
    let m2 = runner.database().get_balance("M2").unwrap().unwrap();
    assert_eq!(m1.balance_sats, 30_000);
    assert_eq!(m2.balance_sats, 30_000);

    assert_eq!(mart.len(), 3); // A, M1, M2

    // The live tables satisfy the output contract
    let conn = runner.database().connection();
    let mut outcomes = QualityChecker::run_staging_checks(conn, STAGING_TABLE).unwrap();
    outcomes.extend(QualityChecker::run_mart_checks(conn, MART_TABLE).unwrap());
    assert!(QualityChecker::ensure_passed(&outcomes).is_ok());

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn test_pipeline_rerun_after_reingest_is_stable() {
    let db_path = create_unique_test_db_path("pipeline_rerun");
    ingest_chain_fixture(&db_path);

    let mut runner = PipelineRunner::new(&db_path).expect("Failed to open runner");
    let first = runner.run(&RunOptions::default()).expect("First run failed");
    drop(runner);

    // Fresh ingest of the identical snapshot, then a second run
    ingest_chain_fixture(&db_path);
    let mut runner = PipelineRunner::new(&db_path).expect("Failed to reopen runner");
    let second = runner.run(&RunOptions::default()).expect("Second run failed");

    assert_eq!(first.staging_rows, second.staging_rows);
    assert_eq!(first.mart_rows, second.mart_rows);
    assert_eq!(first.total_balance_sats, second.total_balance_sats);

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn test_mart_only_run_keeps_existing_staging_table() {
    let db_path = create_unique_test_db_path("pipeline_mart_only");
    ingest_chain_fixture(&db_path);

    let mut runner = PipelineRunner::new(&db_path).expect("Failed to open runner");
    runner
        .run(&RunOptions {
            staging: true,
            mart: false,
        })
        .expect("Staging run failed");
    let staging_before = runner.database().staging_row_count().unwrap();

    let summary = runner
        .run(&RunOptions {
            staging: false,
            mart: true,
        })
        .expect("Mart run failed");

    assert_eq!(summary.staging_rows, None);
    assert!(summary.mart_rows.is_some());
    assert_eq!(runner.database().staging_row_count().unwrap(), staging_before);

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn test_empty_export_produces_empty_tables() {
    let db_path = create_unique_test_db_path("pipeline_empty");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let tx_csv = write_transactions_csv(temp_dir.path(), &[]);
    let out_csv = write_outputs_csv(temp_dir.path(), &[]);
    let in_csv = write_inputs_csv(temp_dir.path(), &[]);

    let config = IngestConfig::builder()
        .transactions_csv(tx_csv)
        .outputs_csv(out_csv)
        .inputs_csv(in_csv)
        .database_path(&db_path)
        .build()
        .unwrap();
    let mut loader = SnapshotLoader::new(config).expect("Failed to create loader");
    loader.load_all().expect("Ingest failed");
    drop(loader);

    let mut runner = PipelineRunner::new(&db_path).expect("Failed to open runner");
    let summary = runner.run(&RunOptions::default()).expect("Run failed");

    // Empty source: zero staging rows, zero mart rows, no error
    assert_eq!(summary.staging_rows, Some(0));
    assert_eq!(summary.mart_rows, Some(0));

    let db = Database::new(&db_path).unwrap();
    assert_eq!(db.staging_row_count().unwrap(), 0);
    assert_eq!(db.mart_row_count().unwrap(), 0);

    let _ = std::fs::remove_file(&db_path);
}
