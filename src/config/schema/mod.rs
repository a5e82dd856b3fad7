mod catalog;
mod core;
mod gateway;
mod ledger;
mod mixing;
mod observability;

pub use catalog::{CatalogConfig, CatalogSourceKind};
pub use self::core::Config;
pub use gateway::GatewayConfig;
pub use ledger::{LedgerBackend, LedgerConfig};
pub use mixing::{MAX_LIQUIDS_LIMIT, MixingConfig};
pub use observability::ObservabilityConfig;
