//! QC aggregate per context+parameter.

use pheno_core::entities::{MeasurementContext, QcState};

use crate::PhenoDb;
use crate::error::DatabaseError;
use crate::helpers::get_opt_datetime;

fn row_to_qc_state(row: &libsql::Row) -> Result<QcState, DatabaseError> {
    Ok(QcState {
        state_id: row.get::<i64>(0)?,
        unresolved_issues: row.get::<Option<i64>>(1)?,
        last_update: get_opt_datetime(row, 2)?,
    })
}

impl PhenoDb {
    /// QC state and unresolved issue count for a context+parameter.
    ///
    /// The count is `None` when the data context has no issues at all, and
    /// `Some(0)` when every issue is resolved.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn qc_state(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Option<QcState>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT d.state_id,
                        SUM(CASE WHEN i.issue_id IS NULL THEN NULL
                                 WHEN i.is_resolved = 0 THEN 1
                                 ELSE 0 END),
                        d.last_update
                 FROM data_context d
                 LEFT JOIN qc_issue i ON i.data_context_id = d.data_context_id
                 WHERE d.centre_id = ?1 AND d.genotype_id = ?2 AND d.strain_id = ?3
                   AND d.parameter_key = ?4
                 GROUP BY d.data_context_id
                 ORDER BY d.data_context_id
                 LIMIT 1",
                libsql::params![
                    context.centre_id,
                    context.genotype_id,
                    context.strain_id,
                    parameter_key
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_qc_state(&row)?)),
            None => Ok(None),
        }
    }
}
