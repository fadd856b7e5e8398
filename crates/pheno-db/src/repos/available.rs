//! Which procedures and parameters hold data for a context or a centre.
//!
//! Answers come from the protocol-instance overview the locator reads, so a
//! procedure listed here always has at least one candidate for the locator.

use pheno_core::entities::MeasurementContext;

use crate::PhenoDb;
use crate::error::DatabaseError;

impl PhenoDb {
    /// Distinct procedures with data for a context.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn procedures_with_data(
        &self,
        context: &MeasurementContext,
    ) -> Result<Vec<i64>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT DISTINCT procedure_id
                 FROM procedure_animal_overview
                 WHERE centre_id = ?1 AND genotype_id = ?2 AND strain_id = ?3
                 ORDER BY procedure_id",
                libsql::params![context.centre_id, context.genotype_id, context.strain_id],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<i64>(0)?);
        }
        Ok(ids)
    }

    /// Distinct parameter keys of one procedure with data for a context.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn parameters_with_data(
        &self,
        context: &MeasurementContext,
        procedure_id: i64,
    ) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT DISTINCT parameter_key
                 FROM procedure_animal_overview
                 WHERE centre_id = ?1 AND genotype_id = ?2 AND strain_id = ?3
                   AND procedure_id = ?4
                 ORDER BY parameter_key",
                libsql::params![
                    context.centre_id,
                    context.genotype_id,
                    context.strain_id,
                    procedure_id
                ],
            )
            .await?;

        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }

    /// Distinct procedures with data for any context of a centre.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn procedures_with_data_for_centre(
        &self,
        centre_id: i64,
    ) -> Result<Vec<i64>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT DISTINCT procedure_id
                 FROM procedure_animal_overview
                 WHERE centre_id = ?1
                 ORDER BY procedure_id",
                [centre_id],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<i64>(0)?);
        }
        Ok(ids)
    }
}
