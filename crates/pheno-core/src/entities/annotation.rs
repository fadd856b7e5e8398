use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A significance annotation produced by the external statistics pipeline.
///
/// Read-only here; the engine only filters on `pvalue`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnnotationRecord {
    pub annotation_id: i64,
    pub genotype_id: i64,
    pub parameter_key: String,
    pub pvalue: Option<f64>,
    pub effect_size: Option<f64>,
    pub ontology_term_refs: Vec<String>,
}

/// Ontology term details resolved for an annotation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OntologyTerm {
    pub term_id: String,
    pub term: String,
    pub selection_outcome: Option<String>,
}

/// An annotation together with the ontology terms that could be resolved.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnnotationDetail {
    #[serde(flatten)]
    pub record: AnnotationRecord,
    pub terms: Vec<OntologyTerm>,
}
