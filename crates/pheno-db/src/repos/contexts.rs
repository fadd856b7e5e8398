//! Context resolution: gene ids to (centre, genotype, strain) triples.

use pheno_core::entities::MeasurementContext;

use crate::PhenoDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, in_placeholders};

/// Column order shared with the significance join in `annotations.rs`.
pub(crate) const CONTEXT_COLUMNS: &str = "g.gene_id, g.centre_id, g.genotype_id, g.strain_id, \
     c.full_name, g.gene_symbol, g.allele_name, s.strain";

pub(crate) fn row_to_context(row: &libsql::Row) -> Result<MeasurementContext, DatabaseError> {
    Ok(MeasurementContext {
        gene_id: row.get::<String>(0)?,
        centre_id: row.get::<i64>(1)?,
        genotype_id: row.get::<i64>(2)?,
        strain_id: row.get::<i64>(3)?,
        centre_name: get_opt_string(row, 4)?,
        gene_symbol: get_opt_string(row, 5)?,
        allele_name: get_opt_string(row, 6)?,
        strain_name: get_opt_string(row, 7)?,
    })
}

impl PhenoDb {
    /// Resolve gene ids to every context bred for them.
    ///
    /// Rows are ordered by gene id, then centre, genotype and strain. Unknown
    /// gene ids contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn contexts_for_genes(
        &self,
        gene_ids: &[String],
    ) -> Result<Vec<MeasurementContext>, DatabaseError> {
        if gene_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {CONTEXT_COLUMNS}
             FROM genotype g
             LEFT JOIN centre c ON c.centre_id = g.centre_id
             LEFT JOIN strain s ON s.strain_id = g.strain_id
             WHERE g.gene_id IN ({})
             ORDER BY g.gene_id, g.centre_id, g.genotype_id, g.strain_id",
            in_placeholders(1, gene_ids.len())
        );
        let params: Vec<libsql::Value> = gene_ids.iter().map(|id| id.as_str().into()).collect();

        let mut rows = self.query(&sql, libsql::params_from_iter(params)).await?;
        let mut contexts = Vec::new();
        while let Some(row) = rows.next().await? {
            contexts.push(row_to_context(&row)?);
        }
        Ok(contexts)
    }
}
