//! Export limits and worker-pool sizing.

use pheno_core::ids::{DEFAULT_PVALUE_THRESHOLD, MAX_GENES, MAX_PARAMETERS};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_max_genes() -> usize {
    MAX_GENES
}

const fn default_max_parameters() -> usize {
    MAX_PARAMETERS
}

const fn default_pvalue_threshold() -> f64 {
    DEFAULT_PVALUE_THRESHOLD
}

const fn default_workers() -> usize {
    4
}

const fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Maximum number of distinct genes processed by one export.
    #[serde(default = "default_max_genes")]
    pub max_genes: usize,

    /// Maximum number of distinct parameters processed by one export.
    #[serde(default = "default_max_parameters")]
    pub max_parameters: usize,

    /// Threshold substituted for a missing or out-of-range p-value threshold.
    #[serde(default = "default_pvalue_threshold")]
    pub default_pvalue_threshold: f64,

    /// Number of (gene, parameter) pairs fetched concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Whole-export timeout in seconds. `0` disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_genes: default_max_genes(),
            max_parameters: default_max_parameters(),
            default_pvalue_threshold: default_pvalue_threshold(),
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExportConfig {
    /// Reject settings the export orchestrator cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero cap, zero workers, or a
    /// default threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_genes == 0 {
            return Err(invalid("export.max_genes", "must be at least 1"));
        }
        if self.max_parameters == 0 {
            return Err(invalid("export.max_parameters", "must be at least 1"));
        }
        if self.workers == 0 {
            return Err(invalid("export.workers", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.default_pvalue_threshold) {
            return Err(invalid(
                "export.default_pvalue_threshold",
                "must lie within [0, 1]",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
