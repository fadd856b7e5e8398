//! Protocol-instance lookup for a context+parameter.

use pheno_core::entities::{MeasurementContext, ProcedureMetadataGroup};

use crate::PhenoDb;
use crate::error::DatabaseError;

fn row_to_candidate(row: &libsql::Row) -> Result<ProcedureMetadataGroup, DatabaseError> {
    Ok(ProcedureMetadataGroup {
        procedure_id: row.get::<i64>(0)?,
        metadata_group: row.get::<String>(1)?,
        pipeline_id: row.get::<i64>(2)?,
    })
}

impl PhenoDb {
    /// Distinct protocol instances a context was measured under for a parameter.
    ///
    /// Ordered by procedure, pipeline, then metadata group so the first
    /// candidate is stable across calls.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn procedure_metadata_groups(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Vec<ProcedureMetadataGroup>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT DISTINCT procedure_id, metadata_group, pipeline_id
                 FROM procedure_animal_overview
                 WHERE centre_id = ?1 AND genotype_id = ?2 AND strain_id = ?3 AND parameter_key = ?4
                 ORDER BY procedure_id, pipeline_id, metadata_group",
                libsql::params![
                    context.centre_id,
                    context.genotype_id,
                    context.strain_id,
                    parameter_key
                ],
            )
            .await?;

        let mut candidates = Vec::new();
        while let Some(row) = rows.next().await? {
            candidates.push(row_to_candidate(&row)?);
        }
        Ok(candidates)
    }
}
