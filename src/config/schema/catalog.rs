use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CatalogSourceKind {
    #[default]
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// "file" (default) | "http"
    #[serde(default)]
    pub source: CatalogSourceKind,
    /// JSON catalog file, `~` is expanded
    #[serde(default = "default_catalog_path")]
    pub path: String,
    /// Endpoint returning the catalog as a JSON array (http source)
    #[serde(default)]
    pub url: Option<String>,
    /// Snapshot lifetime in seconds; 0 re-reads the source on every request
    #[serde(default)]
    pub refresh_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_catalog_path() -> String {
    "~/.liquidmix/catalog.json".into()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSourceKind::default(),
            path: default_catalog_path(),
            url: None,
            refresh_secs: 0,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.source {
            CatalogSourceKind::File if self.path.trim().is_empty() => Err(
                ConfigError::Validation("catalog.path is required for the file source".into()),
            ),
            CatalogSourceKind::Http => {
                let raw = self.url.as_deref().unwrap_or_default();
                let parsed = url::Url::parse(raw).map_err(|e| {
                    ConfigError::Validation(format!("catalog.url is not a valid URL: {e}"))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::Validation(format!(
                        "catalog.url must use http or https (got {})",
                        parsed.scheme()
                    )));
                }
                Ok(())
            }
            CatalogSourceKind::File => Ok(()),
        }
    }
}
