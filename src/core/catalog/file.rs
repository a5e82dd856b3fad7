use super::CatalogSource;
use super::record::parse_catalog;
use crate::core::mixing::Liquid;
use crate::error::CatalogError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON catalog export on local disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// `~` in `path` is expanded to the user's home directory.
    pub fn new(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self {
            path: PathBuf::from(expanded.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self) -> Result<Vec<Liquid>, CatalogError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CatalogError::Read {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        let liquids = parse_catalog(&bytes)?;
        debug!(path = %self.path.display(), count = liquids.len(), "catalog file loaded");
        Ok(liquids)
    }
}
