//! Mutant and baseline measurement fetchers.

use pheno_core::entities::{MeasuredValue, ProcedureMetadataGroup};
use pheno_core::ids::{REFERENCE_GENOTYPE_ID, UNRESOLVED_METADATA_INDEX};

use crate::PhenoDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_datetime, get_opt_string};

const MEASUREMENT_COLUMNS: &str = "measurement_id, animal_id, centre_id, genotype_id, strain_id, \
     procedure_id, parameter_key, sex, value, date_of_experiment, metadata_group";

fn row_to_measurement(row: &libsql::Row, is_baseline: bool) -> Result<MeasuredValue, DatabaseError> {
    Ok(MeasuredValue {
        measurement_id: row.get::<i64>(0)?,
        animal_id: row.get::<i64>(1)?,
        centre_id: row.get::<i64>(2)?,
        genotype_id: row.get::<i64>(3)?,
        strain_id: row.get::<i64>(4)?,
        procedure_id: row.get::<i64>(5)?,
        parameter_key: row.get::<String>(6)?,
        sex: get_opt_string(row, 7)?,
        value: get_opt_string(row, 8)?,
        date_of_experiment: get_opt_datetime(row, 9)?,
        metadata_group: row.get::<String>(10)?,
        metadata_group_index: UNRESOLVED_METADATA_INDEX,
        is_baseline,
    })
}

async fn collect(mut rows: libsql::Rows, is_baseline: bool) -> Result<Vec<MeasuredValue>, DatabaseError> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_measurement(&row, is_baseline)?);
    }
    Ok(out)
}

impl PhenoDb {
    /// Mutant measurements for a context under one procedure.
    ///
    /// Not filtered by pipeline or metadata group.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be decoded.
    pub async fn mutant_measurements(
        &self,
        centre_id: i64,
        genotype_id: i64,
        strain_id: i64,
        procedure_id: i64,
        parameter_key: &str,
    ) -> Result<Vec<MeasuredValue>, DatabaseError> {
        let sql = format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM measurement
             WHERE centre_id = ?1 AND genotype_id = ?2 AND strain_id = ?3
               AND procedure_id = ?4 AND parameter_key = ?5
             ORDER BY measurement_id"
        );
        let rows = self
            .query(
                &sql,
                libsql::params![centre_id, genotype_id, strain_id, procedure_id, parameter_key],
            )
            .await?;
        collect(rows, false).await
    }

    /// Baseline measurements matching one protocol instance exactly.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be decoded.
    pub async fn baseline_measurements(
        &self,
        centre_id: i64,
        strain_id: i64,
        parameter_key: &str,
        candidate: &ProcedureMetadataGroup,
    ) -> Result<Vec<MeasuredValue>, DatabaseError> {
        let sql = format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM measurement
             WHERE centre_id = ?1 AND genotype_id = ?2 AND strain_id = ?3 AND parameter_key = ?4
               AND procedure_id = ?5 AND metadata_group = ?6 AND pipeline_id = ?7
             ORDER BY measurement_id"
        );
        let rows = self
            .query(
                &sql,
                libsql::params![
                    centre_id,
                    REFERENCE_GENOTYPE_ID,
                    strain_id,
                    parameter_key,
                    candidate.procedure_id,
                    candidate.metadata_group.as_str(),
                    candidate.pipeline_id
                ],
            )
            .await?;
        collect(rows, true).await
    }
}
