use super::{CatalogSnapshot, CatalogSource};
use crate::error::CatalogError;
use arc_swap::ArcSwapOption;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Keeps the last catalog snapshot and refreshes it once it is older than
/// the configured TTL. A zero TTL reads the source on every call.
///
/// Readers never block on each other; concurrent refreshes collapse into one
/// fetch.
#[derive(Clone)]
pub struct CachedCatalog {
    source: Arc<dyn CatalogSource>,
    ttl: Duration,
    current: Arc<ArcSwapOption<CatalogSnapshot>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl CachedCatalog {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            current: Arc::new(ArcSwapOption::empty()),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        if let Some(fresh) = self.fresh() {
            return Ok(fresh);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another task may have refreshed while we waited.
        if let Some(fresh) = self.fresh() {
            return Ok(fresh);
        }
        self.refresh_locked().await
    }

    /// Forces a fetch regardless of age.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    pub fn invalidate(&self) {
        self.current.store(None);
    }

    fn fresh(&self) -> Option<Arc<CatalogSnapshot>> {
        if self.ttl.is_zero() {
            return None;
        }
        let snapshot = self.current.load_full()?;
        let age = Utc::now()
            .signed_duration_since(snapshot.fetched_at())
            .to_std()
            .unwrap_or_default();
        (age < self.ttl).then_some(snapshot)
    }

    async fn refresh_locked(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let liquids = self.source.fetch_all().await?;
        let snapshot = Arc::new(CatalogSnapshot::new(liquids));
        if !self.ttl.is_zero() {
            info!(
                source = self.source.name(),
                liquids = snapshot.len(),
                "catalog snapshot refreshed"
            );
        }
        self.current.store(Some(Arc::clone(&snapshot)));
        Ok(snapshot)
    }
}

impl std::fmt::Debug for CachedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCatalog")
            .field("source", &self.source.name())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
