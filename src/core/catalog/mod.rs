//! Read-only view of the storefront's liquid catalog.

pub mod cache;
pub mod classifier;
pub mod file;
pub mod http;
pub mod record;

pub use cache::CachedCatalog;
pub use classifier::{Classification, classify};
pub use file::FileCatalog;
pub use http::HttpCatalog;
pub use record::parse_catalog;

use crate::config::{CatalogConfig, CatalogSourceKind};
use crate::core::mixing::{Liquid, LiquidLookup};
use crate::error::CatalogError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Where catalog records come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_all(&self) -> Result<Vec<Liquid>, CatalogError>;
}

/// Immutable catalog view shared by concurrent requests.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    liquids: Vec<Liquid>,
    by_id: HashMap<String, usize>,
    fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(liquids: Vec<Liquid>) -> Self {
        let by_id = liquids
            .iter()
            .enumerate()
            .map(|(idx, liquid)| (liquid.id.clone(), idx))
            .collect();
        Self {
            liquids,
            by_id,
            fetched_at: Utc::now(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Liquid> {
        self.by_id.get(id).map(|&idx| &self.liquids[idx])
    }

    pub fn liquids(&self) -> &[Liquid] {
        &self.liquids
    }

    pub fn in_stock(&self) -> impl Iterator<Item = &Liquid> {
        self.liquids.iter().filter(|l| l.in_stock())
    }

    pub fn len(&self) -> usize {
        self.liquids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liquids.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl LiquidLookup for CatalogSnapshot {
    fn liquid(&self, id: &str) -> Option<&Liquid> {
        self.get(id)
    }
}

/// Fixed in-process catalog, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    liquids: Vec<Liquid>,
}

impl StaticCatalog {
    pub fn new(liquids: Vec<Liquid>) -> Self {
        Self { liquids }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_all(&self) -> Result<Vec<Liquid>, CatalogError> {
        Ok(self.liquids.clone())
    }
}

/// Builds the configured source wrapped in its refresh cache.
pub fn create_catalog(config: &CatalogConfig) -> Result<CachedCatalog, CatalogError> {
    let source: Arc<dyn CatalogSource> = match config.source {
        CatalogSourceKind::File => Arc::new(FileCatalog::new(&config.path)),
        CatalogSourceKind::Http => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| CatalogError::NotConfigured("catalog.url is not set".into()))?;
            Arc::new(HttpCatalog::new(
                url,
                Duration::from_secs(config.request_timeout_secs),
            )?)
        }
    };
    Ok(CachedCatalog::new(
        source,
        Duration::from_secs(config.refresh_secs),
    ))
}
