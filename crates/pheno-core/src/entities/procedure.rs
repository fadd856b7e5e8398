use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One experimental-protocol instance available for a context+parameter.
///
/// A context may have been measured under several pipelines or metadata
/// groups, so the locator returns zero, one, or many of these.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct ProcedureMetadataGroup {
    pub procedure_id: i64,
    pub metadata_group: String,
    pub pipeline_id: i64,
}
