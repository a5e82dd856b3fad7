use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Hard ceiling on blend size; search cost grows combinatorially past it.
pub const MAX_LIQUIDS_LIMIT: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixingConfig {
    /// Number of ranked suggestions returned per request
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Liquids kept for combination search after ranking by closeness
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
    /// Allowed deviation of a composition's total from 100
    #[serde(default = "default_percentage_tolerance")]
    pub percentage_tolerance: f64,
    /// Component count above which analysis warns
    #[serde(default = "default_max_components")]
    pub max_components: usize,
}

fn default_max_suggestions() -> usize {
    5
}

fn default_candidate_pool() -> usize {
    12
}

fn default_percentage_tolerance() -> f64 {
    0.1
}

fn default_max_components() -> usize {
    usize::from(MAX_LIQUIDS_LIMIT)
}

impl Default for MixingConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            candidate_pool: default_candidate_pool(),
            percentage_tolerance: default_percentage_tolerance(),
            max_components: default_max_components(),
        }
    }
}

impl MixingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_suggestions == 0 {
            return Err(ConfigError::Validation(
                "mixing.max_suggestions must be at least 1".into(),
            ));
        }
        if !(1..=32).contains(&self.candidate_pool) {
            return Err(ConfigError::Validation(format!(
                "mixing.candidate_pool must be within 1..=32 (got {})",
                self.candidate_pool
            )));
        }
        if !self.percentage_tolerance.is_finite() || !(0.0..=5.0).contains(&self.percentage_tolerance)
        {
            return Err(ConfigError::Validation(format!(
                "mixing.percentage_tolerance must be within 0..=5 (got {})",
                self.percentage_tolerance
            )));
        }
        if self.max_components == 0 {
            return Err(ConfigError::Validation(
                "mixing.max_components must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
