use liquidmix::config::{LedgerBackend, LedgerConfig};
use liquidmix::core::ledger::{RatingCounts, SqliteLedger, Vote, create_ledger};
use liquidmix::core::ledger::ReputationLedger;
use liquidmix::core::mixing::{Component, Composition};
use tempfile::TempDir;

#[tokio::test]
async fn counts_survive_reopening_the_database() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let path = tmp.path().join("nested/dir/ratings.db");
    let hash = Composition::new(vec![Component::new("a", 100.0)]).hash();

    {
        let ledger = SqliteLedger::open(&path, 2).await.expect("ledger should open");
        assert_eq!(
            ledger.get_counts(&hash).await.unwrap(),
            RatingCounts::default()
        );
        assert_eq!(
            ledger.record_vote(&hash, Vote::Like).await.unwrap(),
            RatingCounts::new(1, 0)
        );
        ledger.pool().close().await;
    }

    let reopened = SqliteLedger::open(&path, 2).await.expect("ledger should reopen");
    assert_eq!(
        reopened.get_counts(&hash).await.unwrap(),
        RatingCounts::new(1, 0)
    );
    let top = reopened.top_rated(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].hash, hash);
}

#[tokio::test]
async fn factory_places_relative_db_in_workspace() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let config = LedgerConfig {
        backend: LedgerBackend::Sqlite,
        db_file: "ratings/blends.db".into(),
        ..LedgerConfig::default()
    };

    let ledger = create_ledger(&config, tmp.path()).await.unwrap();
    assert_eq!(ledger.name(), "sqlite");
    assert!(tmp.path().join("ratings/blends.db").exists());
}
