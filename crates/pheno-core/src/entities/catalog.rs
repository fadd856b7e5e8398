use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A phenotyping centre.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Centre {
    pub centre_id: i64,
    pub short_name: String,
    pub full_name: Option<String>,
}

/// Entry in the gene-strain index: one genotype bred on one strain.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GeneStrain {
    pub genotype_id: i64,
    pub strain_id: i64,
    pub centre_id: i64,
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    pub allele_name: Option<String>,
    pub strain_name: Option<String>,
}

/// Entry in the procedure catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProcedureData {
    pub procedure_id: i64,
    pub procedure_key: String,
    pub name: String,
    pub major_version: i64,
    pub minor_version: i64,
    pub procedure_code: Option<String>,
}

impl ProcedureData {
    /// Derive the short procedure code from a key such as `IMPC_BWT_001`.
    ///
    /// The code is the segment between the first and last underscore when the
    /// key has exactly three segments, the last one numeric.
    #[must_use]
    pub fn code_from_key(key: &str) -> Option<String> {
        let mut parts = key.split('_');
        let (prefix, code, number) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let upper = |s: &str| s.chars().all(|c| c.is_ascii_uppercase());
        if upper(prefix)
            && upper(code)
            && !code.is_empty()
            && !number.is_empty()
            && number.chars().all(|c| c.is_ascii_digit())
        {
            Some(code.to_string())
        } else {
            None
        }
    }
}

/// Entry in the parameter catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ParameterData {
    pub parameter_id: i64,
    pub parameter_key: String,
    pub name: String,
    pub procedure_id: Option<i64>,
    pub value_type: Option<String>,
    pub unit: Option<String>,
}
