use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LedgerBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// "sqlite" (default) | "memory"
    #[serde(default)]
    pub backend: LedgerBackend,
    /// Database file, relative to the workspace unless absolute
    #[serde(default = "default_db_file")]
    pub db_file: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_file() -> String {
    "ledger/ratings.db".into()
}

fn default_max_connections() -> u32 {
    4
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            db_file: default_db_file(),
            max_connections: default_max_connections(),
        }
    }
}

impl LedgerConfig {
    pub fn db_path(&self, workspace_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&self.db_file);
        let path = PathBuf::from(expanded.as_ref());
        if path.is_absolute() {
            path
        } else {
            workspace_dir.join(path)
        }
    }
}
