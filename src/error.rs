use crate::core::mixing::Flavor;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `liquidmix`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the CLI and config loader continue to
/// use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum MixError {
    // ── Client input ────────────────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── Catalog source ──────────────────────────────────────────────────
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    // ── Reputation ledger ───────────────────────────────────────────────
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MixError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(err) => err.is_retryable(),
            Self::Catalog(err) => err.is_retryable(),
            _ => false,
        }
    }
}

// ─── Validation errors ───────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("composition must contain at least one liquid")]
    EmptyComposition,

    #[error("percentage for liquid {liquid_id} must be within 0..=100 (got {value})")]
    PercentageOutOfRange { liquid_id: String, value: f64 },

    #[error("percentages must sum to 100 ± {tolerance} (got {total})")]
    PercentageSum { total: f64, tolerance: f64 },

    #[error("liquid {0} appears more than once")]
    DuplicateLiquid(String),

    #[error("unknown liquid id: {0}")]
    UnknownLiquid(String),

    #[error("max_liquids must be within 1..=5 (got {0})")]
    MaxLiquidsOutOfRange(u16),

    #[error("{field} must be within 0..=10 (got {value})")]
    AttributeOutOfRange { field: &'static str, value: u16 },

    #[error("desired flavor must be one of the primary categories (got {0})")]
    UnsupportedFlavor(Flavor),

    #[error("invalid composition hash: {0}")]
    InvalidHash(String),
}

// ─── Catalog errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {message}")]
    Read { path: String, message: String },

    #[error("catalog request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("catalog payload is malformed: {0}")]
    Parse(String),

    #[error("catalog source not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request { .. })
    }
}

// ─── Storage errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("ledger backend unavailable: {0}")]
    Unavailable(String),

    #[error("ledger query failed: {0}")]
    Query(String),

    #[error("ledger record is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Ledger failures are scoped to one request; the ledger itself never
    /// retries, so every storage failure is reported as retryable.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Corrupt(err.to_string())
            }
            other => Self::Query(other.to_string()),
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, MixError>;
