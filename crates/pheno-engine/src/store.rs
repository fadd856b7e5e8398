//! The relational store seam.
//!
//! [`MeasurementStore`] lists every parameterized read the engine issues.
//! `PhenoDb` is the production implementation; tests substitute a recording
//! in-memory store.

use std::future::Future;

use chrono::{DateTime, Utc};
use pheno_core::entities::{
    AnnotationRecord, Centre, GeneStrain, MeasuredValue, MeasurementContext, OntologyTerm, ParameterData,
    ProcedureData, ProcedureMetadataGroup, QcState,
};
use pheno_db::PhenoDb;
use pheno_db::error::DatabaseError;

/// Read operations over the phenotyping overview data.
///
/// Single-row lookups return `Ok(None)` when nothing matches.
pub trait MeasurementStore: Send + Sync + 'static {
    fn contexts_for_genes(
        &self,
        gene_ids: &[String],
    ) -> impl Future<Output = Result<Vec<MeasurementContext>, DatabaseError>> + Send;

    fn procedure_metadata_groups(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> impl Future<Output = Result<Vec<ProcedureMetadataGroup>, DatabaseError>> + Send;

    fn mutant_measurements(
        &self,
        centre_id: i64,
        genotype_id: i64,
        strain_id: i64,
        procedure_id: i64,
        parameter_key: &str,
    ) -> impl Future<Output = Result<Vec<MeasuredValue>, DatabaseError>> + Send;

    fn baseline_measurements(
        &self,
        centre_id: i64,
        strain_id: i64,
        parameter_key: &str,
        candidate: &ProcedureMetadataGroup,
    ) -> impl Future<Output = Result<Vec<MeasuredValue>, DatabaseError>> + Send;

    fn metadata_group_values(
        &self,
        checksum: &str,
    ) -> impl Future<Output = Result<Option<String>, DatabaseError>> + Send;

    fn qc_state(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> impl Future<Output = Result<Option<QcState>, DatabaseError>> + Send;

    fn associated_media(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> impl Future<Output = Result<Option<String>, DatabaseError>> + Send;

    fn significant_contexts_for_parameter(
        &self,
        parameter_key: &str,
        threshold: f64,
    ) -> impl Future<Output = Result<Vec<MeasurementContext>, DatabaseError>> + Send;

    fn significant_parameters_for_gene(
        &self,
        gene_id: &str,
        threshold: f64,
    ) -> impl Future<Output = Result<Vec<String>, DatabaseError>> + Send;

    fn annotations_for(
        &self,
        genotype_id: i64,
        parameter_key: &str,
    ) -> impl Future<Output = Result<Vec<AnnotationRecord>, DatabaseError>> + Send;

    fn ontology_term(
        &self,
        term_id: &str,
    ) -> impl Future<Output = Result<Option<OntologyTerm>, DatabaseError>> + Send;

    fn annotations_last_computed(
        &self,
    ) -> impl Future<Output = Result<Option<DateTime<Utc>>, DatabaseError>> + Send;

    fn parameters_for_ontology_terms(
        &self,
        genotype_ids: &[i64],
        term_ids: &[String],
    ) -> impl Future<Output = Result<Vec<String>, DatabaseError>> + Send;

    fn parameters_for_procedure_types(
        &self,
        genotype_ids: &[i64],
        type_ids: &[i64],
    ) -> impl Future<Output = Result<Vec<String>, DatabaseError>> + Send;

    fn procedures_with_data(
        &self,
        context: &MeasurementContext,
    ) -> impl Future<Output = Result<Vec<i64>, DatabaseError>> + Send;

    fn parameters_with_data(
        &self,
        context: &MeasurementContext,
        procedure_id: i64,
    ) -> impl Future<Output = Result<Vec<String>, DatabaseError>> + Send;

    fn procedures_with_data_for_centre(
        &self,
        centre_id: i64,
    ) -> impl Future<Output = Result<Vec<i64>, DatabaseError>> + Send;

    fn centres(&self) -> impl Future<Output = Result<Vec<Centre>, DatabaseError>> + Send;

    fn gene_strains(&self) -> impl Future<Output = Result<Vec<GeneStrain>, DatabaseError>> + Send;

    fn procedures(&self)
    -> impl Future<Output = Result<Vec<ProcedureData>, DatabaseError>> + Send;

    fn parameters(&self)
    -> impl Future<Output = Result<Vec<ParameterData>, DatabaseError>> + Send;
}

impl MeasurementStore for PhenoDb {
    async fn contexts_for_genes(
        &self,
        gene_ids: &[String],
    ) -> Result<Vec<MeasurementContext>, DatabaseError> {
        Self::contexts_for_genes(self, gene_ids).await
    }

    async fn procedure_metadata_groups(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Vec<ProcedureMetadataGroup>, DatabaseError> {
        Self::procedure_metadata_groups(self, context, parameter_key).await
    }

    async fn mutant_measurements(
        &self,
        centre_id: i64,
        genotype_id: i64,
        strain_id: i64,
        procedure_id: i64,
        parameter_key: &str,
    ) -> Result<Vec<MeasuredValue>, DatabaseError> {
        Self::mutant_measurements(
            self,
            centre_id,
            genotype_id,
            strain_id,
            procedure_id,
            parameter_key,
        )
        .await
    }

    async fn baseline_measurements(
        &self,
        centre_id: i64,
        strain_id: i64,
        parameter_key: &str,
        candidate: &ProcedureMetadataGroup,
    ) -> Result<Vec<MeasuredValue>, DatabaseError> {
        Self::baseline_measurements(self, centre_id, strain_id, parameter_key, candidate).await
    }

    async fn metadata_group_values(&self, checksum: &str) -> Result<Option<String>, DatabaseError> {
        Self::metadata_group_values(self, checksum).await
    }

    async fn qc_state(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Option<QcState>, DatabaseError> {
        Self::qc_state(self, context, parameter_key).await
    }

    async fn associated_media(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Option<String>, DatabaseError> {
        Self::associated_media(self, context, parameter_key).await
    }

    async fn significant_contexts_for_parameter(
        &self,
        parameter_key: &str,
        threshold: f64,
    ) -> Result<Vec<MeasurementContext>, DatabaseError> {
        Self::significant_contexts_for_parameter(self, parameter_key, threshold).await
    }

    async fn significant_parameters_for_gene(
        &self,
        gene_id: &str,
        threshold: f64,
    ) -> Result<Vec<String>, DatabaseError> {
        Self::significant_parameters_for_gene(self, gene_id, threshold).await
    }

    async fn annotations_for(
        &self,
        genotype_id: i64,
        parameter_key: &str,
    ) -> Result<Vec<AnnotationRecord>, DatabaseError> {
        Self::annotations_for(self, genotype_id, parameter_key).await
    }

    async fn ontology_term(&self, term_id: &str) -> Result<Option<OntologyTerm>, DatabaseError> {
        Self::ontology_term(self, term_id).await
    }

    async fn annotations_last_computed(&self) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        Self::annotations_last_computed(self).await
    }

    async fn parameters_for_ontology_terms(
        &self,
        genotype_ids: &[i64],
        term_ids: &[String],
    ) -> Result<Vec<String>, DatabaseError> {
        Self::parameters_for_ontology_terms(self, genotype_ids, term_ids).await
    }

    async fn parameters_for_procedure_types(
        &self,
        genotype_ids: &[i64],
        type_ids: &[i64],
    ) -> Result<Vec<String>, DatabaseError> {
        Self::parameters_for_procedure_types(self, genotype_ids, type_ids).await
    }

    async fn procedures_with_data(
        &self,
        context: &MeasurementContext,
    ) -> Result<Vec<i64>, DatabaseError> {
        Self::procedures_with_data(self, context).await
    }

    async fn parameters_with_data(
        &self,
        context: &MeasurementContext,
        procedure_id: i64,
    ) -> Result<Vec<String>, DatabaseError> {
        Self::parameters_with_data(self, context, procedure_id).await
    }

    async fn procedures_with_data_for_centre(
        &self,
        centre_id: i64,
    ) -> Result<Vec<i64>, DatabaseError> {
        Self::procedures_with_data_for_centre(self, centre_id).await
    }

    async fn centres(&self) -> Result<Vec<Centre>, DatabaseError> {
        Self::centres(self).await
    }

    async fn gene_strains(&self) -> Result<Vec<GeneStrain>, DatabaseError> {
        Self::gene_strains(self).await
    }

    async fn procedures(&self) -> Result<Vec<ProcedureData>, DatabaseError> {
        Self::procedures(self).await
    }

    async fn parameters(&self) -> Result<Vec<ParameterData>, DatabaseError> {
        Self::parameters(self).await
    }
}
