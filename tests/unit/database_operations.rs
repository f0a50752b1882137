use crate::common::database::TestDatabase;
use crate::common::seeding::{output, spend, transaction};
use bch_balance_pipeline::database::traits::{
    MartOperations, SourceOperations, StagingOperations, StatisticsOperations,
};
use bch_balance_pipeline::types::{AddressBalance, CanonicalTransaction};

fn canonical(tx_hash: &str, ts: i64) -> CanonicalTransaction {
    CanonicalTransaction {
        tx_hash: tx_hash.to_string(),
        block_timestamp: ts,
        block_date: "2024-01-01".to_string(),
        block_number: 800_000,
        is_coinbase: false,
        fee: 250,
        input_count: 1,
        output_count: 2,
    }
}

#[test]
fn test_staging_build_and_swap_lifecycle() {
    let mut test_db = TestDatabase::new("staging_lifecycle").unwrap();
    let db = test_db.database_mut();

    db.create_staging_build().unwrap();
    db.insert_staging_batch(&[canonical("b", 200), canonical("a", 100)])
        .unwrap();

    // Live table is still empty until the swap
    assert_eq!(db.staging_row_count().unwrap(), 0);

    db.swap_staging().unwrap();
    assert_eq!(db.staging_row_count().unwrap(), 2);

    // Rows come back ordered by tx_hash
    let rows = db.get_staging_rows().unwrap();
    assert_eq!(rows[0].tx_hash, "a");
    assert_eq!(rows[1].tx_hash, "b");
    assert_eq!(rows[1].block_timestamp, 200);
}

#[test]
fn test_staging_swap_replaces_previous_content() {
    let mut test_db = TestDatabase::new("staging_replace").unwrap();
    let db = test_db.database_mut();

    db.create_staging_build().unwrap();
    db.insert_staging_batch(&[canonical("old", 1)]).unwrap();
    db.swap_staging().unwrap();

    db.create_staging_build().unwrap();
    db.insert_staging_batch(&[canonical("new1", 2), canonical("new2", 3)])
        .unwrap();
    db.swap_staging().unwrap();

    let rows = db.get_staging_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.tx_hash != "old"));
}

#[test]
fn test_dropping_build_leaves_live_table_untouched() {
    let mut test_db = TestDatabase::new("staging_abort").unwrap();
    let db = test_db.database_mut();

    db.create_staging_build().unwrap();
    db.insert_staging_batch(&[canonical("keep", 1)]).unwrap();
    db.swap_staging().unwrap();

    // A later build gets rejected and dropped
    db.create_staging_build().unwrap();
    db.insert_staging_batch(&[canonical("reject", 2)]).unwrap();
    db.drop_staging_build().unwrap();

    let rows = db.get_staging_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tx_hash, "keep");
}

#[test]
fn test_mart_operations() {
    let mut test_db = TestDatabase::new("mart_ops").unwrap();
    let db = test_db.database_mut();

    db.create_mart_build().unwrap();
    db.insert_mart_batch(&[
        AddressBalance::new("beta".to_string(), 200),
        AddressBalance::new("alpha".to_string(), 100),
    ])
    .unwrap();
    db.swap_mart().unwrap();

    assert_eq!(db.mart_row_count().unwrap(), 2);
    assert_eq!(db.total_balance_sats().unwrap(), 300);

    let rows = db.get_mart_rows().unwrap();
    assert_eq!(rows[0].address, "alpha");
    assert_eq!(rows[1].address, "beta");

    let alpha = db.get_balance("alpha").unwrap().unwrap();
    assert_eq!(alpha.balance_sats, 100);
    assert!(db.get_balance("missing").unwrap().is_none());
}

#[test]
fn test_database_stats_aggregation() {
    let mut test_db = TestDatabase::new("db_stats").unwrap();
    let db = test_db.database_mut();

    db.insert_transaction_batch(&[
        transaction("cb", 100, true),
        transaction("t1", 300, false),
        transaction("t1", 200, false),
    ])
    .unwrap();
    db.insert_output_batch(&[output("t1", 0, 1_000, &["addr"])])
        .unwrap();
    db.insert_input_batch(&[spend("t1", 0)]).unwrap();

    let stats = db.get_database_stats().unwrap();
    assert_eq!(stats.source_transactions, 3);
    assert_eq!(stats.coinbase_transactions, 1);
    assert_eq!(stats.source_outputs, 1);
    assert_eq!(stats.source_inputs, 1);
    assert_eq!(stats.min_block_timestamp, Some(100));
    assert_eq!(stats.max_block_timestamp, Some(300));
    assert_eq!(stats.staging_rows, 0);
    assert_eq!(stats.mart_rows, 0);
}
