use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregate QC record for a context+parameter.
///
/// `unresolved_issues` is `None` when the aggregate had no issue rows to count.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QcState {
    pub state_id: i64,
    pub unresolved_issues: Option<i64>,
    pub last_update: Option<DateTime<Utc>>,
}
