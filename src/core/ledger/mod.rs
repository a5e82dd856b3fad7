//! Content-addressed like/dislike counters.
//!
//! Records are keyed only by [`CompositionHash`]; they are created lazily on
//! the first vote and never deleted.

pub mod memory;
pub mod sqlite;
pub mod types;

pub use memory::InMemoryLedger;
pub use sqlite::SqliteLedger;
pub use types::{RatedHash, RatingCounts, Vote};

use crate::config::{LedgerBackend, LedgerConfig};
use crate::core::mixing::CompositionHash;
use crate::error::StorageError;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[async_trait]
pub trait ReputationLedger: Send + Sync {
    fn name(&self) -> &str;

    /// Atomically increments one counter and returns the post-increment
    /// counts.
    async fn record_vote(
        &self,
        hash: &CompositionHash,
        vote: Vote,
    ) -> Result<RatingCounts, StorageError>;

    /// Zero counts for a hash nobody has voted on; never writes.
    async fn get_counts(&self, hash: &CompositionHash) -> Result<RatingCounts, StorageError>;

    async fn get_counts_many(
        &self,
        hashes: &[CompositionHash],
    ) -> Result<HashMap<CompositionHash, RatingCounts>, StorageError> {
        let mut out = HashMap::with_capacity(hashes.len());
        for hash in hashes {
            out.insert(hash.clone(), self.get_counts(hash).await?);
        }
        Ok(out)
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<RatedHash>, StorageError>;
}

/// Builds the configured ledger backend.
pub async fn create_ledger(
    config: &LedgerConfig,
    workspace_dir: &Path,
) -> anyhow::Result<Arc<dyn ReputationLedger>> {
    match config.backend {
        LedgerBackend::Sqlite => {
            let path = config.db_path(workspace_dir);
            let ledger = SqliteLedger::open(&path, config.max_connections)
                .await
                .with_context(|| format!("Failed to open ledger at {}", path.display()))?;
            Ok(Arc::new(ledger))
        }
        LedgerBackend::Memory => Ok(Arc::new(InMemoryLedger::new())),
    }
}
