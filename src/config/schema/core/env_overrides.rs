use super::Config;
use crate::config::schema::{CatalogSourceKind, LedgerBackend};
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(workspace) = std::env::var("LIQUIDMIX_WORKSPACE")
            && !workspace.is_empty()
        {
            self.workspace_dir = PathBuf::from(workspace);
        }

        if let Ok(path) = std::env::var("LIQUIDMIX_CATALOG_PATH")
            && !path.is_empty()
        {
            self.catalog.source = CatalogSourceKind::File;
            self.catalog.path = path;
        }

        if let Ok(url) = std::env::var("LIQUIDMIX_CATALOG_URL")
            && !url.is_empty()
        {
            self.catalog.source = CatalogSourceKind::Http;
            self.catalog.url = Some(url);
        }

        if let Ok(backend) = std::env::var("LIQUIDMIX_LEDGER_BACKEND")
            && let Ok(backend) = backend.trim().parse::<LedgerBackend>()
        {
            self.ledger.backend = backend;
        }

        if let Ok(port_str) =
            std::env::var("LIQUIDMIX_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("LIQUIDMIX_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(level) = std::env::var("LIQUIDMIX_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
