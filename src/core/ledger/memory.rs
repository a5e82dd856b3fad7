use super::ReputationLedger;
use super::types::{RatedHash, RatingCounts, Vote, rank_order};
use crate::core::mixing::CompositionHash;
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local ledger; counts vanish on restart.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: Mutex<HashMap<CompositionHash, RatingCounts>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CompositionHash, RatingCounts>>, StorageError> {
        self.records
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("ledger lock poisoned: {e}")))
    }
}

#[async_trait]
impl ReputationLedger for InMemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    async fn record_vote(
        &self,
        hash: &CompositionHash,
        vote: Vote,
    ) -> Result<RatingCounts, StorageError> {
        let mut records = self.lock()?;
        let counts = records.entry(hash.clone()).or_default();
        counts.apply(vote);
        Ok(*counts)
    }

    async fn get_counts(&self, hash: &CompositionHash) -> Result<RatingCounts, StorageError> {
        Ok(self.lock()?.get(hash).copied().unwrap_or_default())
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<RatedHash>, StorageError> {
        let mut rated: Vec<RatedHash> = self
            .lock()?
            .iter()
            .map(|(hash, counts)| RatedHash {
                hash: hash.clone(),
                counts: *counts,
            })
            .collect();
        rated.sort_by(rank_order);
        rated.truncate(limit);
        Ok(rated)
    }
}
