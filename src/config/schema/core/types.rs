use super::super::{
    CatalogConfig, GatewayConfig, LedgerConfig, MixingConfig, ObservabilityConfig,
};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(super) const APP_DIR_NAME: &str = ".liquidmix";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub mixing: MixingConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let app_dir = home.join(APP_DIR_NAME);

        Self {
            workspace_dir: app_dir.join("workspace"),
            config_path: app_dir.join("config.toml"),
            catalog: CatalogConfig::default(),
            mixing: MixingConfig::default(),
            ledger: LedgerConfig::default(),
            gateway: GatewayConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mixing.validate()?;
        self.catalog.validate()?;
        if self.ledger.max_connections == 0 {
            return Err(ConfigError::Validation(
                "ledger.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
