//! Service facade over the engine operations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pheno_config::ExportConfig;
use pheno_core::entities::{AnnotationDetail, MeasurementContext};
use pheno_core::ids::is_valid_key;
use pheno_core::responses::{
    AnnotationsResponse, AvailableParametersResponse, AvailableProceduresResponse,
    CentresResponse, ExpandResponse, ExportResponse, GeneStrainsResponse, MeasurementsResponse,
    ParametersResponse, ProceduresResponse,
};

use crate::cache::{CacheKey, LookasideCache, read_through};
use crate::error::EngineError;
use crate::expand::{ExpandRequest, expand};
use crate::export::{
    ExportPlan, plan_bulk, plan_significant_genes, plan_significant_parameters, run_pairs,
};
use crate::retrieve::retrieve_measurements;
use crate::significance::resolve_threshold;
use crate::store::MeasurementStore;

/// Entry point for every read operation.
///
/// Holds the store, the look-aside cache and the export limits. Each call
/// builds its response from scratch; nothing carries over between calls.
pub struct PhenoService<S> {
    store: Arc<S>,
    cache: Arc<dyn LookasideCache>,
    config: ExportConfig,
}

impl<S: MeasurementStore> PhenoService<S> {
    pub fn new(store: Arc<S>, cache: Arc<dyn LookasideCache>, config: ExportConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Measurements, metadata groups and QC status for one context+parameter.
    ///
    /// A blank parameter key, or a context with no protocol instance for the
    /// parameter, yields the empty response.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails.
    pub async fn query(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
        include_baseline: bool,
    ) -> Result<MeasurementsResponse, EngineError> {
        if !is_valid_key(parameter_key) {
            return Ok(MeasurementsResponse::empty());
        }
        retrieve_measurements(self.store.as_ref(), context, parameter_key.trim(), include_baseline)
            .await
    }

    /// Export every context of the given genes against the given parameters.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if context resolution fails, or
    /// `EngineError::Timeout` if the export exceeds the configured timeout.
    pub async fn bulk_export(
        &self,
        gene_ids: &[String],
        parameter_keys: &[String],
        include_baseline: bool,
    ) -> Result<ExportResponse, EngineError> {
        self.with_timeout(async {
            let plan = plan_bulk(self.store.as_ref(), gene_ids, parameter_keys, &self.config).await?;
            Ok(self.execute(plan, None, include_baseline).await)
        })
        .await
    }

    /// Export the contexts with a significant annotation for each parameter.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if a significance lookup fails,
    /// or `EngineError::Timeout` if the export exceeds the configured timeout.
    pub async fn export_by_significant_genes(
        &self,
        parameter_keys: &[String],
        pvalue_threshold: Option<f64>,
        include_baseline: bool,
    ) -> Result<ExportResponse, EngineError> {
        if !parameter_keys.iter().any(|k| is_valid_key(k)) {
            return Ok(ExportResponse::empty());
        }
        let (threshold, threshold_note) =
            resolve_threshold(pvalue_threshold, self.config.default_pvalue_threshold);

        self.with_timeout(async {
            let plan =
                plan_significant_genes(self.store.as_ref(), parameter_keys, threshold, &self.config)
                    .await?;
            Ok(self.execute(plan, threshold_note, include_baseline).await)
        })
        .await
    }

    /// Export each gene's contexts against the parameters it is significant for.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if context resolution or a
    /// significance lookup fails, or `EngineError::Timeout` if the export
    /// exceeds the configured timeout.
    pub async fn export_by_significant_parameters(
        &self,
        gene_ids: &[String],
        pvalue_threshold: Option<f64>,
        include_baseline: bool,
    ) -> Result<ExportResponse, EngineError> {
        if !gene_ids.iter().any(|g| is_valid_key(g)) {
            return Ok(ExportResponse::empty());
        }
        let (threshold, threshold_note) =
            resolve_threshold(pvalue_threshold, self.config.default_pvalue_threshold);

        self.with_timeout(async {
            let plan =
                plan_significant_parameters(self.store.as_ref(), gene_ids, threshold, &self.config)
                    .await?;
            Ok(self.execute(plan, threshold_note, include_baseline).await)
        })
        .await
    }

    /// Annotations for a genotype+parameter with resolved ontology terms and
    /// the time the statistics were last computed.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails.
    pub async fn annotations(
        &self,
        genotype_id: i64,
        parameter_key: &str,
    ) -> Result<AnnotationsResponse, EngineError> {
        if !is_valid_key(parameter_key) {
            return Ok(AnnotationsResponse::empty());
        }

        let records = self
            .store
            .annotations_for(genotype_id, parameter_key.trim())
            .await?;
        let mut annotations = Vec::with_capacity(records.len());
        for record in records {
            let mut terms = Vec::new();
            for term_id in &record.ontology_term_refs {
                match self.store.ontology_term(term_id).await? {
                    Some(term) => terms.push(term),
                    None => tracing::debug!(term_id = %term_id, "ontology term not found"),
                }
            }
            annotations.push(AnnotationDetail { record, terms });
        }

        let last_update = self.store.annotations_last_computed().await?;
        Ok(AnnotationsResponse::new(annotations, last_update))
    }

    /// The gene-strain index, read through the cache.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails on a miss.
    pub async fn gene_strains(&self) -> Result<GeneStrainsResponse, EngineError> {
        let gene_strains = read_through(self.cache.as_ref(), CacheKey::GeneStrainIndex, || async {
            self.store.gene_strains().await.map_err(EngineError::from)
        })
        .await?;
        Ok(GeneStrainsResponse {
            total: gene_strains.len() as u64,
            gene_strains,
        })
    }

    /// The procedure catalog, read through the cache.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails on a miss.
    pub async fn procedures(&self) -> Result<ProceduresResponse, EngineError> {
        let procedures = read_through(self.cache.as_ref(), CacheKey::ProcedureCatalog, || async {
            self.store.procedures().await.map_err(EngineError::from)
        })
        .await?;
        Ok(ProceduresResponse {
            total: procedures.len() as u64,
            procedures,
        })
    }

    /// The parameter catalog, read through the cache.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails on a miss.
    pub async fn parameters(&self) -> Result<ParametersResponse, EngineError> {
        let parameters = read_through(self.cache.as_ref(), CacheKey::ParameterCatalog, || async {
            self.store.parameters().await.map_err(EngineError::from)
        })
        .await?;
        Ok(ParametersResponse {
            total: parameters.len() as u64,
            parameters,
        })
    }

    /// Phenotyping centres, read through the cache.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails on a miss.
    pub async fn centres(&self) -> Result<CentresResponse, EngineError> {
        let centres = read_through(self.cache.as_ref(), CacheKey::CentreList, || async {
            self.store.centres().await.map_err(EngineError::from)
        })
        .await?;
        Ok(CentresResponse {
            total: centres.len() as u64,
            centres,
        })
    }

    /// Procedures with at least one measurement for a context.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails.
    pub async fn available_procedures(
        &self,
        context: &MeasurementContext,
    ) -> Result<AvailableProceduresResponse, EngineError> {
        let ids = self.store.procedures_with_data(context).await?;
        Ok(AvailableProceduresResponse::new(ids))
    }

    /// Parameters with at least one measurement for a context and procedure.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails.
    pub async fn available_parameters(
        &self,
        context: &MeasurementContext,
        procedure_id: i64,
    ) -> Result<AvailableParametersResponse, EngineError> {
        let keys = self.store.parameters_with_data(context, procedure_id).await?;
        Ok(AvailableParametersResponse::new(keys))
    }

    /// Procedures with at least one measurement at a centre.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails.
    pub async fn centre_procedures(
        &self,
        centre_id: i64,
    ) -> Result<AvailableProceduresResponse, EngineError> {
        let ids = self.store.procedures_with_data_for_centre(centre_id).await?;
        Ok(AvailableProceduresResponse::new(ids))
    }

    /// Expand genotype labels and type tokens into parameter keys.
    ///
    /// Unparseable genotypes and unrecognised tokens are dropped; when
    /// nothing usable remains the response is empty.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` if the store fails.
    pub async fn expand_parameters(
        &self,
        genotypes: &[String],
        types: &[String],
    ) -> Result<ExpandResponse, EngineError> {
        let request = ExpandRequest::parse(genotypes, types);
        if request.is_empty() {
            return Ok(ExpandResponse::empty());
        }
        let keys = expand(self.store.as_ref(), &request).await?;
        tracing::debug!(genotypes = request.genotype_ids.len(), keys = keys.len(), "expanded parameters");
        Ok(ExpandResponse::new(keys))
    }

    async fn execute(
        &self,
        plan: ExportPlan,
        threshold_note: Option<String>,
        include_baseline: bool,
    ) -> ExportResponse {
        let attempted = plan.pairs.len();
        let results = run_pairs(
            Arc::clone(&self.store),
            plan.pairs,
            include_baseline,
            self.config.workers,
        )
        .await;

        let notes: Vec<String> = threshold_note.into_iter().chain(plan.notes).collect();
        tracing::info!(
            attempted,
            returned = results.len(),
            notes = notes.len(),
            "export finished"
        );
        ExportResponse::new(results, notes)
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, EngineError>>,
    ) -> Result<T, EngineError> {
        let secs = self.config.timeout_secs;
        if secs == 0 {
            return fut.await;
        }
        tokio::time::timeout(Duration::from_secs(secs), fut)
            .await
            .map_err(|_| {
                tracing::warn!(timeout_secs = secs, "export timed out");
                EngineError::Timeout(secs)
            })?
    }
}
