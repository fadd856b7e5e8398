//! Expansion of genotypes and type tokens into parameter keys.
//!
//! A type token is one of: an MP term (`MP:0001262`), a parameter key
//! (`IMPC_BWT_008_001`) or a numeric procedure type. Anything else is
//! ignored. Parameter keys pass through unchanged; terms and procedure types
//! are resolved against the annotations of the requested genotypes.

use std::collections::BTreeSet;

use crate::error::EngineError;
use crate::store::MeasurementStore;

/// One classified type token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeToken {
    OntologyTerm(String),
    ParameterKey(String),
    ProcedureType(i64),
}

impl TypeToken {
    /// Classify a raw token, or `None` if it matches no known shape.
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if let Some(digits) = token.strip_prefix("MP:") {
            return (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .then(|| Self::OntologyTerm(token.to_string()));
        }
        if is_parameter_key(token) {
            return Some(Self::ParameterKey(token.to_string()));
        }
        token.parse::<i64>().ok().map(Self::ProcedureType)
    }
}

/// `AAA_BBB_000_000`: two upper-case segments then two numeric segments.
fn is_parameter_key(token: &str) -> bool {
    let parts: Vec<&str> = token.split('_').collect();
    let [a, b, c, d] = parts.as_slice() else {
        return false;
    };
    [a, b].iter().all(|s| s.bytes().all(|ch| ch.is_ascii_uppercase()))
        && [c, d].iter().all(|s| s.bytes().all(|ch| ch.is_ascii_digit()))
}

/// Genotype id from a `"42 - Akt2"` style label; the part before the dash.
#[must_use]
pub fn parse_genotype(raw: &str) -> Option<i64> {
    raw.split('-').next()?.trim().parse().ok()
}

/// Parsed expansion request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpandRequest {
    pub genotype_ids: Vec<i64>,
    pub term_ids: Vec<String>,
    pub parameter_keys: Vec<String>,
    pub procedure_types: Vec<i64>,
}

impl ExpandRequest {
    #[must_use]
    pub fn parse(genotypes: &[String], types: &[String]) -> Self {
        let mut request = Self {
            genotype_ids: genotypes.iter().filter_map(|g| parse_genotype(g)).collect(),
            ..Self::default()
        };
        for token in types {
            match TypeToken::classify(token) {
                Some(TypeToken::OntologyTerm(t)) => request.term_ids.push(t),
                Some(TypeToken::ParameterKey(k)) => request.parameter_keys.push(k),
                Some(TypeToken::ProcedureType(t)) => request.procedure_types.push(t),
                None => tracing::debug!(token = %token, "ignoring unrecognised type token"),
            }
        }
        request
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genotype_ids.is_empty()
            || (self.term_ids.is_empty()
                && self.parameter_keys.is_empty()
                && self.procedure_types.is_empty())
    }
}

/// Sorted, distinct parameter keys for an expansion request.
///
/// # Errors
///
/// Returns `EngineError::StoreUnavailable` if a store read fails.
pub async fn expand<S: MeasurementStore>(
    store: &S,
    request: &ExpandRequest,
) -> Result<Vec<String>, EngineError> {
    if request.is_empty() {
        return Ok(Vec::new());
    }

    let mut keys: BTreeSet<String> = request.parameter_keys.iter().cloned().collect();
    if !request.term_ids.is_empty() {
        keys.extend(
            store
                .parameters_for_ontology_terms(&request.genotype_ids, &request.term_ids)
                .await?,
        );
    }
    if !request.procedure_types.is_empty() {
        keys.extend(
            store
                .parameters_for_procedure_types(&request.genotype_ids, &request.procedure_types)
                .await?,
        );
    }
    Ok(keys.into_iter().collect())
}
