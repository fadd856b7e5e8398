use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::REFERENCE_GENOTYPE_ID;

/// One biological comparison group: a (centre, genotype, strain) triple plus
/// the display names joined in from the centre, gene and strain tables.
///
/// Display names come from outer joins and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct MeasurementContext {
    pub gene_id: String,
    pub centre_id: i64,
    pub genotype_id: i64,
    pub strain_id: i64,
    pub centre_name: Option<String>,
    pub gene_symbol: Option<String>,
    pub allele_name: Option<String>,
    pub strain_name: Option<String>,
}

impl MeasurementContext {
    /// Build a bare context from its three identifiers.
    #[must_use]
    pub fn new(centre_id: i64, genotype_id: i64, strain_id: i64) -> Self {
        Self {
            gene_id: String::new(),
            centre_id,
            genotype_id,
            strain_id,
            centre_name: None,
            gene_symbol: None,
            allele_name: None,
            strain_name: None,
        }
    }

    /// Whether this context is the reference (wild-type) line.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.genotype_id == REFERENCE_GENOTYPE_ID
    }
}
