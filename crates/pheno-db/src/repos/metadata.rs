//! Metadata blob lookup by checksum.

use crate::PhenoDb;
use crate::error::DatabaseError;

impl PhenoDb {
    /// Serialized metadata for a metadata-group checksum, if known.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn metadata_group_values(
        &self,
        checksum: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT metadata_values FROM metadata_group_values
                 WHERE metadata_group = ?1
                 ORDER BY metadata_group_values_id
                 LIMIT 1",
                [checksum],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
