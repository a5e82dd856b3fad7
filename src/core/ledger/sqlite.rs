use super::ReputationLedger;
use super::types::{RatedHash, RatingCounts, Vote};
use crate::core::mixing::CompositionHash;
use crate::error::StorageError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

/// SQLite-backed ledger using an sqlx async pool.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub async fn open(db_path: &Path, max_connections: u32) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create ledger dir: {}", parent.display()))?;
        }

        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(&url)
            .await
            .with_context(|| format!("Failed to open ledger DB: {}", db_path.display()))?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and creates the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await
        .context("Failed to enable WAL journal")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS mix_ratings (
            hash       TEXT PRIMARY KEY,
            likes      INTEGER NOT NULL DEFAULT 0,
            dislikes   INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create mix_ratings table")?;

    Ok(())
}

fn counter(value: i64, column: &str) -> Result<u64, StorageError> {
    u64::try_from(value)
        .map_err(|_| StorageError::Corrupt(format!("negative {column} counter: {value}")))
}

#[async_trait]
impl ReputationLedger for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn record_vote(
        &self,
        hash: &CompositionHash,
        vote: Vote,
    ) -> Result<RatingCounts, StorageError> {
        let (likes, dislikes) = vote.deltas();
        let now = Utc::now().to_rfc3339();

        // Single statement: the increment and the read-back happen under one
        // write lock, so concurrent votes cannot lose updates.
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            "INSERT INTO mix_ratings (hash, likes, dislikes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(hash) DO UPDATE SET
                likes      = likes + excluded.likes,
                dislikes   = dislikes + excluded.dislikes,
                updated_at = excluded.updated_at
             RETURNING likes, dislikes",
        )
        .bind(hash.as_str())
        .bind(i64::try_from(likes).unwrap_or(0))
        .bind(i64::try_from(dislikes).unwrap_or(0))
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        let counts = RatingCounts::new(counter(likes, "likes")?, counter(dislikes, "dislikes")?);
        debug!(hash = hash.short(), %vote, likes = counts.likes, dislikes = counts.dislikes, "vote recorded");
        Ok(counts)
    }

    async fn get_counts(&self, hash: &CompositionHash) -> Result<RatingCounts, StorageError> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT likes, dislikes FROM mix_ratings WHERE hash = ?")
                .bind(hash.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((likes, dislikes)) => Ok(RatingCounts::new(
                counter(likes, "likes")?,
                counter(dislikes, "dislikes")?,
            )),
            None => Ok(RatingCounts::default()),
        }
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<RatedHash>, StorageError> {
        let rows = sqlx::query(
            "SELECT hash, likes, dislikes
             FROM mix_ratings
             ORDER BY (likes - dislikes) DESC, likes DESC, hash ASC
             LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<RatedHash, StorageError> {
                let raw: String = row.try_get("hash")?;
                let hash = CompositionHash::parse(&raw)
                    .map_err(|e| StorageError::Corrupt(e.to_string()))?;
                Ok(RatedHash {
                    hash,
                    counts: RatingCounts::new(
                        counter(row.try_get("likes")?, "likes")?,
                        counter(row.try_get("dislikes")?, "dislikes")?,
                    ),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_ledger() -> SqliteLedger {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteLedger::from_pool(pool).await.unwrap()
    }

    fn hash(c: char) -> CompositionHash {
        CompositionHash::parse(&c.to_string().repeat(64)).unwrap()
    }

    #[tokio::test]
    async fn read_of_unknown_hash_does_not_insert() {
        let ledger = memory_ledger().await;
        assert_eq!(
            ledger.get_counts(&hash('a')).await.unwrap(),
            RatingCounts::default()
        );

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM mix_ratings")
            .fetch_one(ledger.pool())
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn first_like_creates_record() {
        let ledger = memory_ledger().await;
        let counts = ledger.record_vote(&hash('a'), Vote::Like).await.unwrap();
        assert_eq!(counts, RatingCounts::new(1, 0));
        assert_eq!(ledger.get_counts(&hash('a')).await.unwrap(), counts);
    }

    #[tokio::test]
    async fn upsert_returns_post_increment_counts() {
        let ledger = memory_ledger().await;
        ledger.record_vote(&hash('a'), Vote::Like).await.unwrap();
        ledger.record_vote(&hash('a'), Vote::Like).await.unwrap();
        let counts = ledger.record_vote(&hash('a'), Vote::Dislike).await.unwrap();
        assert_eq!(counts, RatingCounts::new(2, 1));
    }

    #[tokio::test]
    async fn top_rated_uses_net_then_likes_then_hash() {
        let ledger = memory_ledger().await;
        ledger.record_vote(&hash('c'), Vote::Like).await.unwrap();
        ledger.record_vote(&hash('a'), Vote::Like).await.unwrap();
        for vote in [Vote::Like, Vote::Like, Vote::Dislike] {
            ledger.record_vote(&hash('b'), vote).await.unwrap();
        }
        ledger.record_vote(&hash('d'), Vote::Dislike).await.unwrap();

        let top = ledger.top_rated(10).await.unwrap();
        let order: Vec<_> = top.iter().map(|r| r.hash.clone()).collect();
        assert_eq!(order, vec![hash('b'), hash('a'), hash('c'), hash('d')]);
        assert_eq!(top[0].counts, RatingCounts::new(2, 1));

        assert_eq!(ledger.top_rated(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn negative_counter_is_reported_corrupt() {
        let ledger = memory_ledger().await;
        sqlx::query(
            "INSERT INTO mix_ratings (hash, likes, dislikes, created_at, updated_at)
             VALUES (?, -1, 0, 'x', 'x')",
        )
        .bind(hash('f').as_str())
        .execute(ledger.pool())
        .await
        .unwrap();

        let err = ledger.get_counts(&hash('f')).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
