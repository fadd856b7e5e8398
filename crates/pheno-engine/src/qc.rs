//! QC status classification.

use chrono::{DateTime, Utc};
use pheno_core::entities::QcState;
use pheno_core::enums::QcStatus;
use pheno_core::ids::DONE_STATE_ID;

/// Derive the tri-state QC status from an aggregate record.
///
/// An absent record means QC has not run yet and yields `Pending` with no
/// timestamp. Open issues win over a completed review.
#[must_use]
pub fn classify(record: Option<&QcState>) -> (QcStatus, Option<DateTime<Utc>>) {
    let Some(record) = record else {
        return (QcStatus::Pending, None);
    };

    let mut status = QcStatus::Pending;
    if record.state_id == DONE_STATE_ID {
        status = QcStatus::Done;
    }
    if record.unresolved_issues.is_some_and(|n| n > 0) {
        status = QcStatus::Issues;
    }
    (status, record.last_update)
}
