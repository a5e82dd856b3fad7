use super::CatalogSource;
use super::record::parse_catalog;
use crate::core::mixing::Liquid;
use crate::error::CatalogError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Storefront endpoint that returns the catalog as JSON.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    url: url::Url,
}

impl HttpCatalog {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let url = url::Url::parse(url)
            .map_err(|e| CatalogError::NotConfigured(format!("invalid catalog url {url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CatalogError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client, url })
    }

    fn request_error(&self, err: &reqwest::Error) -> CatalogError {
        CatalogError::Request {
            url: self.url.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self) -> Result<Vec<Liquid>, CatalogError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(&e))?
            .error_for_status()
            .map_err(|e| self.request_error(&e))?;

        let bytes = response.bytes().await.map_err(|e| self.request_error(&e))?;
        let liquids = parse_catalog(&bytes)?;
        debug!(url = %self.url, count = liquids.len(), "catalog fetched");
        Ok(liquids)
    }
}
