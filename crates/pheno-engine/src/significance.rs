//! Significance gateway: filters contexts or parameters by p-value.
//!
//! The comparison is strict; a p-value equal to the threshold is not
//! significant.

use std::collections::HashSet;
use std::hash::Hash;

use pheno_core::entities::MeasurementContext;

use crate::error::EngineError;
use crate::store::MeasurementStore;

/// Validate a caller-supplied threshold.
///
/// A missing value, or one outside `[0, 1]`, is replaced by `default` and a
/// note describing the substitution is returned alongside it.
#[must_use]
pub fn resolve_threshold(requested: Option<f64>, default: f64) -> (f64, Option<String>) {
    match requested {
        Some(t) if (0.0..=1.0).contains(&t) => (t, None),
        Some(t) => {
            tracing::warn!(requested = t, default, "invalid p-value threshold");
            (
                default,
                Some(format!(
                    "Supplied p-value threshold {t} is invalid. Choosing default value {default}."
                )),
            )
        }
        None => (
            default,
            Some(format!(
                "No p-value threshold supplied. Choosing default value {default}."
            )),
        ),
    }
}

/// Keep the first occurrence of each item, preserving order.
pub(crate) fn distinct<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Distinct contexts with a significant annotation for `parameter_key`.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if the store read fails.
pub async fn by_parameter<S: MeasurementStore>(
    store: &S,
    parameter_key: &str,
    threshold: f64,
) -> Result<Vec<MeasurementContext>, EngineError> {
    let contexts = store
        .significant_contexts_for_parameter(parameter_key, threshold)
        .await?;
    Ok(distinct(contexts))
}

/// Distinct parameter keys with a significant annotation for `gene_id`.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if the store read fails.
pub async fn by_context<S: MeasurementStore>(
    store: &S,
    gene_id: &str,
    threshold: f64,
) -> Result<Vec<String>, EngineError> {
    let keys = store.significant_parameters_for_gene(gene_id, threshold).await?;
    Ok(distinct(keys))
}
