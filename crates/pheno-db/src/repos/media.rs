//! Associated media parameter lookup.

use pheno_core::entities::MeasurementContext;

use crate::PhenoDb;
use crate::error::DatabaseError;

impl PhenoDb {
    /// The media parameter linked to a context+parameter, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn associated_media(
        &self,
        context: &MeasurementContext,
        parameter_key: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT media_parameter_key FROM associated_media
                 WHERE centre_id = ?1 AND genotype_id = ?2 AND strain_id = ?3 AND parameter_key = ?4
                 ORDER BY media_parameter_key
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
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
