use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::UNRESOLVED_METADATA_INDEX;

const fn unresolved_index() -> i64 {
    UNRESOLVED_METADATA_INDEX
}

/// A single observation for a context+parameter, mutant or baseline.
///
/// `metadata_group` is the checksum of the metadata blob the measurement was
/// recorded under. It is shared by many measurements and is not serialized;
/// clients receive `metadata_group_index` instead, which points into the
/// response's metadata group table (or is `-1` when the blob is unknown).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeasuredValue {
    pub measurement_id: i64,
    pub animal_id: i64,
    pub centre_id: i64,
    pub genotype_id: i64,
    pub strain_id: i64,
    pub procedure_id: i64,
    pub parameter_key: String,
    pub sex: Option<String>,
    pub value: Option<String>,
    pub date_of_experiment: Option<DateTime<Utc>>,
    #[serde(skip_serializing, default)]
    #[schemars(skip)]
    pub metadata_group: String,
    #[serde(default = "unresolved_index")]
    pub metadata_group_index: i64,
    pub is_baseline: bool,
}

/// A deduplicated metadata blob, registered once per response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MetadataGroupEntry {
    pub index: i64,
    pub checksum: String,
    pub values: String,
}
