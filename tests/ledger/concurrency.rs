use liquidmix::core::ledger::{
    InMemoryLedger, RatingCounts, ReputationLedger, SqliteLedger, Vote,
};
use liquidmix::core::mixing::{Component, Composition, CompositionHash};
use std::sync::Arc;
use tempfile::TempDir;

fn blend_hash() -> CompositionHash {
    Composition::new(vec![
        Component::new("mango", 60.0),
        Component::new("ice", 40.0),
    ])
    .hash()
}

async fn hammer(ledger: Arc<dyn ReputationLedger>, votes: usize) {
    let hash = blend_hash();
    let mut handles = Vec::with_capacity(votes);
    for i in 0..votes {
        let ledger = Arc::clone(&ledger);
        let hash = hash.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .record_vote(&hash, Vote::from_like(i % 3 != 0))
                .await
                .expect("vote should be recorded");
        }));
    }
    for handle in handles {
        handle.await.expect("vote task should not panic");
    }
}

fn expected(votes: usize) -> RatingCounts {
    let dislikes = (0..votes).filter(|i| i % 3 == 0).count() as u64;
    RatingCounts::new(votes as u64 - dislikes, dislikes)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sqlite_loses_no_concurrent_votes() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let ledger: Arc<dyn ReputationLedger> = Arc::new(
        SqliteLedger::open(&tmp.path().join("ratings.db"), 4)
            .await
            .expect("ledger should open"),
    );

    hammer(Arc::clone(&ledger), 60).await;

    assert_eq!(
        ledger.get_counts(&blend_hash()).await.unwrap(),
        expected(60)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn memory_loses_no_concurrent_votes() {
    let ledger: Arc<dyn ReputationLedger> = Arc::new(InMemoryLedger::new());

    hammer(Arc::clone(&ledger), 200).await;

    assert_eq!(
        ledger.get_counts(&blend_hash()).await.unwrap(),
        expected(200)
    );
}
