pub mod schema;

pub use schema::{
    CatalogConfig, CatalogSourceKind, Config, GatewayConfig, LedgerBackend, LedgerConfig,
    MAX_LIQUIDS_LIMIT, MixingConfig, ObservabilityConfig,
};
