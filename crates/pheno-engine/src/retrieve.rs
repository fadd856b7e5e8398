//! Single context+parameter retrieval: Locator, Fetchers, Deduplicator and
//! QC Classifier in sequence.

use pheno_core::entities::{MeasurementContext, MeasuredValue};
use pheno_core::responses::MeasurementsResponse;

use crate::dedup::dedupe_metadata_groups;
use crate::error::EngineError;
use crate::qc::classify;
use crate::store::MeasurementStore;

/// Retrieve measurements for one pair, or `None` when the context has no
/// protocol instance for the parameter.
///
/// Mutant measurements come from the first candidate's procedure only, with
/// no pipeline filter. Baseline measurements are fetched once per candidate,
/// matched exactly on procedure, metadata group and pipeline, and only for
/// non-reference contexts when `include_baseline` is set.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if any store read fails.
pub async fn locate_and_fetch<S: MeasurementStore>(
    store: &S,
    context: &MeasurementContext,
    parameter_key: &str,
    include_baseline: bool,
) -> Result<Option<MeasurementsResponse>, EngineError> {
    let candidates = store
        .procedure_metadata_groups(context, parameter_key)
        .await?;
    let Some(first) = candidates.first() else {
        tracing::debug!(
            centre_id = context.centre_id,
            genotype_id = context.genotype_id,
            strain_id = context.strain_id,
            parameter = parameter_key,
            "no protocol instance"
        );
        return Ok(None);
    };

    let mut merged: Vec<MeasuredValue> = store
        .mutant_measurements(
            context.centre_id,
            context.genotype_id,
            context.strain_id,
            first.procedure_id,
            parameter_key,
        )
        .await?;
    let mutant_count = merged.len();

    if include_baseline && !context.is_reference() {
        for candidate in &candidates {
            let baseline = store
                .baseline_measurements(context.centre_id, context.strain_id, parameter_key, candidate)
                .await?;
            merged.extend(baseline);
        }
    }

    tracing::debug!(
        centre_id = context.centre_id,
        genotype_id = context.genotype_id,
        strain_id = context.strain_id,
        parameter = parameter_key,
        candidates = candidates.len(),
        mutant = mutant_count,
        baseline = merged.len() - mutant_count,
        "fetched measurements"
    );

    let (metadata_groups, measurements) = dedupe_metadata_groups(store, merged).await?;
    let qc = store.qc_state(context, parameter_key).await?;
    let (qc_status, last_update) = classify(qc.as_ref());
    let associated_media = store.associated_media(context, parameter_key).await?;

    Ok(Some(MeasurementsResponse {
        success: true,
        total: measurements.len() as u64,
        measurements,
        metadata_groups,
        qc_status,
        last_update,
        associated_media,
    }))
}

/// Retrieve measurements for one pair, mapping "no protocol instance" to the
/// empty response.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if any store read fails.
pub async fn retrieve_measurements<S: MeasurementStore>(
    store: &S,
    context: &MeasurementContext,
    parameter_key: &str,
    include_baseline: bool,
) -> Result<MeasurementsResponse, EngineError> {
    Ok(locate_and_fetch(store, context, parameter_key, include_baseline)
        .await?
        .unwrap_or_else(MeasurementsResponse::empty))
}
