//! Response types returned by the engine operations.
//!
//! Each operation has its own statically defined struct. The `success` and
//! `total` fields keep the envelope shape existing visualisation clients
//! expect.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    AnnotationDetail, Centre, GeneStrain, MeasuredValue, MeasurementContext, MetadataGroupEntry,
    ParameterData, ProcedureData,
};
use crate::enums::QcStatus;

/// Response from a single context+parameter measurement query.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeasurementsResponse {
    pub success: bool,
    pub total: u64,
    pub measurements: Vec<MeasuredValue>,
    pub metadata_groups: Vec<MetadataGroupEntry>,
    pub qc_status: QcStatus,
    pub last_update: Option<DateTime<Utc>>,
    pub associated_media: Option<String>,
}

impl MeasurementsResponse {
    /// The "no data" response: used for missing identifiers and for contexts
    /// with no protocol instance for the parameter.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            success: true,
            total: 0,
            measurements: Vec::new(),
            metadata_groups: Vec::new(),
            qc_status: QcStatus::Pending,
            last_update: None,
            associated_media: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// One (gene, parameter) result inside an export.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PairResult {
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    pub allele_name: Option<String>,
    pub centre_name: Option<String>,
    pub genotype_id: i64,
    pub strain_name: Option<String>,
    pub parameter_key: String,
    #[serde(flatten)]
    pub data: MeasurementsResponse,
}

impl PairResult {
    /// Attach context identity to a measurements response.
    #[must_use]
    pub fn new(context: &MeasurementContext, parameter_key: &str, data: MeasurementsResponse) -> Self {
        Self {
            gene_id: context.gene_id.clone(),
            gene_symbol: context.gene_symbol.clone(),
            allele_name: context.allele_name.clone(),
            centre_name: context.centre_name.clone(),
            genotype_id: context.genotype_id,
            strain_name: context.strain_name.clone(),
            parameter_key: parameter_key.to_string(),
            data,
        }
    }
}

/// Response from the bulk and significance-driven exports.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportResponse {
    pub success: bool,
    pub total: u64,
    pub results: Vec<PairResult>,
    pub notes: Vec<String>,
}

impl ExportResponse {
    #[must_use]
    pub fn new(results: Vec<PairResult>, notes: Vec<String>) -> Self {
        Self {
            success: true,
            total: results.len() as u64,
            results,
            notes,
        }
    }

    /// An export that processed nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Response from the annotations lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnnotationsResponse {
    pub success: bool,
    pub total: u64,
    pub annotations: Vec<AnnotationDetail>,
    pub last_update: Option<DateTime<Utc>>,
}

impl AnnotationsResponse {
    #[must_use]
    pub fn new(annotations: Vec<AnnotationDetail>, last_update: Option<DateTime<Utc>>) -> Self {
        Self {
            success: true,
            total: annotations.len() as u64,
            annotations,
            last_update,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }
}

/// Response listing the gene-strain index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GeneStrainsResponse {
    pub total: u64,
    pub gene_strains: Vec<GeneStrain>,
}

/// Response listing the procedure catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProceduresResponse {
    pub total: u64,
    pub procedures: Vec<ProcedureData>,
}

/// Response listing the parameter catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ParametersResponse {
    pub total: u64,
    pub parameters: Vec<ParameterData>,
}

/// Response listing the phenotyping centres.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CentresResponse {
    pub total: u64,
    pub centres: Vec<Centre>,
}

/// Procedures that hold data for a context or a centre.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AvailableProceduresResponse {
    pub total: u64,
    pub procedure_ids: Vec<i64>,
}

impl AvailableProceduresResponse {
    #[must_use]
    pub fn new(procedure_ids: Vec<i64>) -> Self {
        Self {
            total: procedure_ids.len() as u64,
            procedure_ids,
        }
    }
}

/// Parameters of one procedure that hold data for a context.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AvailableParametersResponse {
    pub total: u64,
    pub parameter_keys: Vec<String>,
}

impl AvailableParametersResponse {
    #[must_use]
    pub fn new(parameter_keys: Vec<String>) -> Self {
        Self {
            total: parameter_keys.len() as u64,
            parameter_keys,
        }
    }
}

/// Parameter keys expanded from genotypes and ontology terms, parameter keys
/// or procedure types. Sorted and distinct.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExpandResponse {
    pub success: bool,
    pub total: u64,
    pub parameter_keys: Vec<String>,
}

impl ExpandResponse {
    #[must_use]
    pub fn new(parameter_keys: Vec<String>) -> Self {
        Self {
            success: true,
            total: parameter_keys.len() as u64,
            parameter_keys,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}
