//! Whole-collection catalogs: centres, gene-strain index, procedures, parameters.

use pheno_core::entities::{Centre, GeneStrain, ParameterData, ProcedureData};
use pheno_core::ids::REFERENCE_GENOTYPE_ID;

use crate::PhenoDb;
use crate::error::DatabaseError;
use crate::helpers::get_opt_string;

fn row_to_centre(row: &libsql::Row) -> Result<Centre, DatabaseError> {
    Ok(Centre {
        centre_id: row.get::<i64>(0)?,
        short_name: row.get::<String>(1)?,
        full_name: get_opt_string(row, 2)?,
    })
}

fn row_to_gene_strain(row: &libsql::Row) -> Result<GeneStrain, DatabaseError> {
    Ok(GeneStrain {
        genotype_id: row.get::<i64>(0)?,
        strain_id: row.get::<i64>(1)?,
        centre_id: row.get::<i64>(2)?,
        gene_id: row.get::<String>(3)?,
        gene_symbol: get_opt_string(row, 4)?,
        allele_name: get_opt_string(row, 5)?,
        strain_name: get_opt_string(row, 6)?,
    })
}

fn row_to_procedure(row: &libsql::Row) -> Result<ProcedureData, DatabaseError> {
    let procedure_key = row.get::<String>(1)?;
    Ok(ProcedureData {
        procedure_id: row.get::<i64>(0)?,
        procedure_code: ProcedureData::code_from_key(&procedure_key),
        procedure_key,
        name: row.get::<String>(2)?,
        major_version: row.get::<i64>(3)?,
        minor_version: row.get::<i64>(4)?,
    })
}

fn row_to_parameter(row: &libsql::Row) -> Result<ParameterData, DatabaseError> {
    Ok(ParameterData {
        parameter_id: row.get::<i64>(0)?,
        parameter_key: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        procedure_id: row.get::<Option<i64>>(3)?,
        value_type: get_opt_string(row, 4)?,
        unit: get_opt_string(row, 5)?,
    })
}

impl PhenoDb {
    /// Every phenotyping centre, by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn centres(&self) -> Result<Vec<Centre>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT centre_id, short_name, full_name FROM centre ORDER BY centre_id",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_centre(&row)?);
        }
        Ok(out)
    }

    /// Every mutant genotype with its strain.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn gene_strains(&self) -> Result<Vec<GeneStrain>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT g.genotype_id, g.strain_id, g.centre_id, g.gene_id,
                        g.gene_symbol, g.allele_name, s.strain
                 FROM genotype g
                 LEFT JOIN strain s ON s.strain_id = g.strain_id
                 WHERE g.genotype_id <> ?1
                 ORDER BY g.gene_id, g.genotype_id",
                [REFERENCE_GENOTYPE_ID],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_gene_strain(&row)?);
        }
        Ok(out)
    }

    /// IMPC procedures, each with its derived short code.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn procedures(&self) -> Result<Vec<ProcedureData>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT procedure_id, procedure_key, name, major_version, minor_version
                 FROM procedure
                 WHERE is_impc = 1
                 ORDER BY procedure_key, major_version, minor_version",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_procedure(&row)?);
        }
        Ok(out)
    }

    /// Every parameter in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn parameters(&self) -> Result<Vec<ParameterData>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT parameter_id, parameter_key, name, procedure_id, value_type, unit
                 FROM parameter
                 ORDER BY parameter_key",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_parameter(&row)?);
        }
        Ok(out)
    }
}
