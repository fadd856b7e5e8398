//! Recording in-memory store for engine tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use pheno_core::entities::{
    AnnotationRecord, Centre, GeneStrain, MeasuredValue, MeasurementContext, OntologyTerm, ParameterData,
    ProcedureData, ProcedureMetadataGroup, QcState,
};
use pheno_core::ids::{DONE_STATE_ID, REFERENCE_GENOTYPE_ID, UNRESOLVED_METADATA_INDEX};
use pheno_db::error::DatabaseError;

use crate::store::MeasurementStore;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Contexts(Vec<String>),
    Locate {
        genotype_id: i64,
        parameter_key: String,
    },
    Mutant {
        centre_id: i64,
        genotype_id: i64,
        strain_id: i64,
        procedure_id: i64,
        parameter_key: String,
    },
    Baseline {
        centre_id: i64,
        strain_id: i64,
        parameter_key: String,
        candidate: ProcedureMetadataGroup,
    },
    Metadata(String),
    SignificantContexts(String, f64),
    SignificantParameters(String, f64),
    Catalog(&'static str),
    Expand(Vec<i64>),
    Available(i64),
}

#[derive(Default)]
pub struct RecordingStore {
    contexts: Vec<MeasurementContext>,
    candidates: HashMap<(i64, String), Vec<ProcedureMetadataGroup>>,
    mutants: HashMap<i64, Vec<MeasuredValue>>,
    baseline: HashMap<String, Vec<MeasuredValue>>,
    metadata: HashMap<String, String>,
    qc: HashMap<(i64, String), QcState>,
    media: HashMap<(i64, String), String>,
    annotations: Vec<(MeasurementContext, AnnotationRecord)>,
    terms: HashMap<String, OntologyTerm>,
    last_computed: Option<DateTime<Utc>>,
    parameters: Vec<ParameterData>,
    centres: Vec<Centre>,
    procedure_types: HashMap<String, i64>,
    failing_key: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

pub fn context(gene_id: &str, genotype_id: i64) -> MeasurementContext {
    MeasurementContext {
        gene_id: gene_id.to_string(),
        gene_symbol: Some(format!("sym-{gene_id}")),
        centre_name: Some("MRC Harwell".to_string()),
        ..MeasurementContext::new(1, genotype_id, 7)
    }
}

pub fn candidate(procedure_id: i64, metadata_group: &str, pipeline_id: i64) -> ProcedureMetadataGroup {
    ProcedureMetadataGroup {
        procedure_id,
        metadata_group: metadata_group.to_string(),
        pipeline_id,
    }
}

pub fn measurement(id: i64, metadata_group: &str, is_baseline: bool) -> MeasuredValue {
    MeasuredValue {
        measurement_id: id,
        animal_id: 500 + id,
        centre_id: 1,
        genotype_id: if is_baseline { REFERENCE_GENOTYPE_ID } else { 42 },
        strain_id: 7,
        procedure_id: 9,
        parameter_key: "IMPC_VIA_001_001".to_string(),
        sex: Some("female".to_string()),
        value: Some("1.0".to_string()),
        date_of_experiment: None,
        metadata_group: metadata_group.to_string(),
        metadata_group_index: UNRESOLVED_METADATA_INDEX,
        is_baseline,
    }
}

pub fn qc_done(unresolved_issues: Option<i64>) -> QcState {
    QcState {
        state_id: DONE_STATE_ID,
        unresolved_issues,
        last_update: Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).single(),
    }
}

pub fn parameter(id: i64, key: &str) -> ParameterData {
    ParameterData {
        parameter_id: id,
        parameter_key: key.to_string(),
        name: format!("parameter {id}"),
        procedure_id: Some(9),
        value_type: Some("FLOAT".to_string()),
        unit: None,
    }
}

impl RecordingStore {
    pub fn with_contexts(mut self, contexts: Vec<MeasurementContext>) -> Self {
        for ctx in contexts {
            if !self.contexts.contains(&ctx) {
                self.contexts.push(ctx);
            }
        }
        self
    }

    pub fn with_candidates(
        mut self,
        genotype_id: i64,
        parameter_key: &str,
        candidates: Vec<ProcedureMetadataGroup>,
    ) -> Self {
        self.candidates
            .insert((genotype_id, parameter_key.to_string()), candidates);
        self
    }

    pub fn with_mutants(mut self, genotype_id: i64, values: Vec<MeasuredValue>) -> Self {
        self.mutants.insert(genotype_id, values);
        self
    }

    pub fn with_baseline(mut self, metadata_group: &str, values: Vec<MeasuredValue>) -> Self {
        self.baseline.insert(metadata_group.to_string(), values);
        self
    }

    pub fn with_metadata(mut self, checksum: &str, values: &str) -> Self {
        self.metadata.insert(checksum.to_string(), values.to_string());
        self
    }

    pub fn with_qc(mut self, genotype_id: i64, parameter_key: &str, state: QcState) -> Self {
        self.qc.insert((genotype_id, parameter_key.to_string()), state);
        self
    }

    pub fn with_media(mut self, genotype_id: i64, parameter_key: &str, media: &str) -> Self {
        self.media
            .insert((genotype_id, parameter_key.to_string()), media.to_string());
        self
    }

    pub fn with_annotation(
        mut self,
        ctx: MeasurementContext,
        parameter_key: &str,
        pvalue: Option<f64>,
    ) -> Self {
        let record = AnnotationRecord {
            annotation_id: i64::try_from(self.annotations.len()).unwrap() + 1,
            genotype_id: ctx.genotype_id,
            parameter_key: parameter_key.to_string(),
            pvalue,
            effect_size: Some(0.5),
            ontology_term_refs: vec!["MP:0001262".to_string(), "MP:9999999".to_string()],
        };
        self = self.with_contexts(vec![ctx.clone()]);
        self.annotations.push((ctx, record));
        self
    }

    pub fn with_term(mut self, term_id: &str, term: &str) -> Self {
        self.terms.insert(
            term_id.to_string(),
            OntologyTerm {
                term_id: term_id.to_string(),
                term: term.to_string(),
                selection_outcome: None,
            },
        );
        self
    }

    pub fn with_last_computed(mut self, at: DateTime<Utc>) -> Self {
        self.last_computed = Some(at);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterData>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_centre(mut self, centre_id: i64, short_name: &str) -> Self {
        self.centres.push(Centre {
            centre_id,
            short_name: short_name.to_string(),
            full_name: None,
        });
        self
    }

    /// Tag the procedure behind `parameter_key` with a procedure type.
    pub fn with_procedure_type(mut self, parameter_key: &str, type_id: i64) -> Self {
        self.procedure_types.insert(parameter_key.to_string(), type_id);
        self
    }

    fn annotated_keys(&self, genotype_ids: &[i64], keep: impl Fn(&AnnotationRecord) -> bool) -> Vec<String> {
        self.annotations
            .iter()
            .filter(|(_, a)| genotype_ids.contains(&a.genotype_id) && keep(a))
            .map(|(_, a)| a.parameter_key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn procedures_for_genotypes(&self, genotype_ids: &[i64]) -> Vec<i64> {
        self.candidates
            .iter()
            .filter(|((genotype_id, _), _)| genotype_ids.contains(genotype_id))
            .flat_map(|(_, groups)| groups.iter().map(|g| g.procedure_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Make every locator call for `parameter_key` fail.
    pub fn failing_on(mut self, parameter_key: &str) -> Self {
        self.failing_key = Some(parameter_key.to_string());
        self
    }

    /// Slow down every locator call.
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutant_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Mutant { .. }))
            .collect()
    }

    pub fn baseline_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Baseline { .. }))
            .collect()
    }

    pub fn locate_calls(&self) -> Vec<(i64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Locate {
                    genotype_id,
                    parameter_key,
                } => Some((genotype_id, parameter_key)),
                _ => None,
            })
            .collect()
    }

    pub fn metadata_lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Metadata(checksum) => Some(checksum),
                _ => None,
            })
            .collect()
    }

    pub fn catalog_loads(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Catalog(n) if *n == name))
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl MeasurementStore for RecordingStore {
    async fn contexts_for_genes(
        &self,
        gene_ids: &[String],
    ) -> Result<Vec<MeasurementContext>, DatabaseError> {
        self.record(Call::Contexts(gene_ids.to_vec()));
        Ok(self
            .contexts
            .iter()
            .filter(|c| gene_ids.contains(&c.gene_id))
            .cloned()
            .collect())
    }

    async fn procedure_metadata_groups(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Vec<ProcedureMetadataGroup>, DatabaseError> {
        self.record(Call::Locate {
            genotype_id: context.genotype_id,
            parameter_key: parameter_key.to_string(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_key.as_deref() == Some(parameter_key) {
            return Err(DatabaseError::Query("connection reset".to_string()));
        }
        Ok(self
            .candidates
            .get(&(context.genotype_id, parameter_key.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn mutant_measurements(
        &self,
        centre_id: i64,
        genotype_id: i64,
        strain_id: i64,
        procedure_id: i64,
        parameter_key: &str,
    ) -> Result<Vec<MeasuredValue>, DatabaseError> {
        self.record(Call::Mutant {
            centre_id,
            genotype_id,
            strain_id,
            procedure_id,
            parameter_key: parameter_key.to_string(),
        });
        Ok(self.mutants.get(&genotype_id).cloned().unwrap_or_default())
    }

    async fn baseline_measurements(
        &self,
        centre_id: i64,
        strain_id: i64,
        parameter_key: &str,
        candidate: &ProcedureMetadataGroup,
    ) -> Result<Vec<MeasuredValue>, DatabaseError> {
        self.record(Call::Baseline {
            centre_id,
            strain_id,
            parameter_key: parameter_key.to_string(),
            candidate: candidate.clone(),
        });
        Ok(self
            .baseline
            .get(&candidate.metadata_group)
            .cloned()
            .unwrap_or_default())
    }

    async fn metadata_group_values(&self, checksum: &str) -> Result<Option<String>, DatabaseError> {
        self.record(Call::Metadata(checksum.to_string()));
        Ok(self.metadata.get(checksum).cloned())
    }

    async fn qc_state(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Option<QcState>, DatabaseError> {
        Ok(self
            .qc
            .get(&(context.genotype_id, parameter_key.to_string()))
            .cloned())
    }

    async fn associated_media(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .media
            .get(&(context.genotype_id, parameter_key.to_string()))
            .cloned())
    }

    async fn significant_contexts_for_parameter(
        &self,
        parameter_key: &str,
        threshold: f64,
    ) -> Result<Vec<MeasurementContext>, DatabaseError> {
        self.record(Call::SignificantContexts(parameter_key.to_string(), threshold));
        Ok(self
            .annotations
            .iter()
            .filter(|(_, a)| a.parameter_key == parameter_key && a.pvalue.is_some_and(|p| p < threshold))
            .map(|(ctx, _)| ctx.clone())
            .collect())
    }

    async fn significant_parameters_for_gene(
        &self,
        gene_id: &str,
        threshold: f64,
    ) -> Result<Vec<String>, DatabaseError> {
        self.record(Call::SignificantParameters(gene_id.to_string(), threshold));
        Ok(self
            .annotations
            .iter()
            .filter(|(ctx, a)| ctx.gene_id == gene_id && a.pvalue.is_some_and(|p| p < threshold))
            .map(|(_, a)| a.parameter_key.clone())
            .collect())
    }

    async fn annotations_for(
        &self,
        genotype_id: i64,
        parameter_key: &str,
    ) -> Result<Vec<AnnotationRecord>, DatabaseError> {
        Ok(self
            .annotations
            .iter()
            .filter(|(_, a)| a.genotype_id == genotype_id && a.parameter_key == parameter_key)
            .map(|(_, a)| a.clone())
            .collect())
    }

    async fn ontology_term(&self, term_id: &str) -> Result<Option<OntologyTerm>, DatabaseError> {
        Ok(self.terms.get(term_id).cloned())
    }

    async fn annotations_last_computed(&self) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        Ok(self.last_computed)
    }

    async fn parameters_for_ontology_terms(
        &self,
        genotype_ids: &[i64],
        term_ids: &[String],
    ) -> Result<Vec<String>, DatabaseError> {
        self.record(Call::Expand(genotype_ids.to_vec()));
        Ok(self.annotated_keys(genotype_ids, |a| {
            a.ontology_term_refs.iter().any(|t| term_ids.contains(t))
        }))
    }

    async fn parameters_for_procedure_types(
        &self,
        genotype_ids: &[i64],
        type_ids: &[i64],
    ) -> Result<Vec<String>, DatabaseError> {
        self.record(Call::Expand(genotype_ids.to_vec()));
        Ok(self.annotated_keys(genotype_ids, |a| {
            self.procedure_types
                .get(&a.parameter_key)
                .is_some_and(|t| type_ids.contains(t))
        }))
    }

    async fn procedures_with_data(
        &self,
        context: &MeasurementContext,
    ) -> Result<Vec<i64>, DatabaseError> {
        self.record(Call::Available(context.genotype_id));
        Ok(self.procedures_for_genotypes(&[context.genotype_id]))
    }

    async fn parameters_with_data(
        &self,
        context: &MeasurementContext,
        procedure_id: i64,
    ) -> Result<Vec<String>, DatabaseError> {
        self.record(Call::Available(context.genotype_id));
        Ok(self
            .candidates
            .iter()
            .filter(|((genotype_id, _), groups)| {
                *genotype_id == context.genotype_id
                    && groups.iter().any(|g| g.procedure_id == procedure_id)
            })
            .map(|((_, key), _)| key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    async fn procedures_with_data_for_centre(
        &self,
        centre_id: i64,
    ) -> Result<Vec<i64>, DatabaseError> {
        let genotypes: Vec<i64> = self
            .contexts
            .iter()
            .filter(|c| c.centre_id == centre_id)
            .map(|c| c.genotype_id)
            .collect();
        Ok(self.procedures_for_genotypes(&genotypes))
    }

    async fn centres(&self) -> Result<Vec<Centre>, DatabaseError> {
        self.record(Call::Catalog("centres"));
        Ok(self.centres.clone())
    }

    async fn gene_strains(&self) -> Result<Vec<GeneStrain>, DatabaseError> {
        self.record(Call::Catalog("gene_strains"));
        Ok(self
            .contexts
            .iter()
            .map(|c| GeneStrain {
                genotype_id: c.genotype_id,
                strain_id: c.strain_id,
                centre_id: c.centre_id,
                gene_id: c.gene_id.clone(),
                gene_symbol: c.gene_symbol.clone(),
                allele_name: c.allele_name.clone(),
                strain_name: c.strain_name.clone(),
            })
            .collect())
    }

    async fn procedures(&self) -> Result<Vec<ProcedureData>, DatabaseError> {
        self.record(Call::Catalog("procedures"));
        Ok(vec![ProcedureData {
            procedure_id: 9,
            procedure_key: "IMPC_BWT_001".to_string(),
            name: "Body Weight".to_string(),
            major_version: 1,
            minor_version: 0,
            procedure_code: ProcedureData::code_from_key("IMPC_BWT_001"),
        }])
    }

    async fn parameters(&self) -> Result<Vec<ParameterData>, DatabaseError> {
        self.record(Call::Catalog("parameters"));
        Ok(self.parameters.clone())
    }
}
