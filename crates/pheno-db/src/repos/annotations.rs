//! Significance annotations written by the statistics pipeline.
//!
//! All significance filters use a strict `pvalue < threshold`; a NULL p-value
//! never passes.

use chrono::{DateTime, Utc};
use pheno_core::entities::{AnnotationRecord, MeasurementContext, OntologyTerm};

use crate::PhenoDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_datetime, get_opt_string, in_placeholders};
use crate::repos::contexts::{CONTEXT_COLUMNS, row_to_context};

fn row_to_annotation(row: &libsql::Row) -> Result<AnnotationRecord, DatabaseError> {
    let ontology_term_refs = [get_opt_string(row, 5)?, get_opt_string(row, 6)?]
        .into_iter()
        .flatten()
        .collect();
    Ok(AnnotationRecord {
        annotation_id: row.get::<i64>(0)?,
        genotype_id: row.get::<i64>(1)?,
        parameter_key: row.get::<String>(2)?,
        pvalue: row.get::<Option<f64>>(3)?,
        effect_size: row.get::<Option<f64>>(4)?,
        ontology_term_refs,
    })
}

fn row_to_term(row: &libsql::Row) -> Result<OntologyTerm, DatabaseError> {
    Ok(OntologyTerm {
        term_id: row.get::<String>(0)?,
        term: row.get::<String>(1)?,
        selection_outcome: get_opt_string(row, 2)?,
    })
}

impl PhenoDb {
    /// Distinct contexts with a significant annotation for a parameter.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn significant_contexts_for_parameter(
        &self,
        parameter_key: &str,
        threshold: f64,
    ) -> Result<Vec<MeasurementContext>, DatabaseError> {
        let sql = format!(
            "SELECT DISTINCT {CONTEXT_COLUMNS}
             FROM annotation a
             JOIN genotype g ON g.genotype_id = a.genotype_id
             LEFT JOIN centre c ON c.centre_id = g.centre_id
             LEFT JOIN strain s ON s.strain_id = g.strain_id
             WHERE a.parameter_key = ?1 AND a.pvalue < ?2
             ORDER BY g.gene_id, g.centre_id, g.genotype_id, g.strain_id"
        );
        let mut rows = self
            .query(&sql, libsql::params![parameter_key, threshold])
            .await?;

        let mut contexts = Vec::new();
        while let Some(row) = rows.next().await? {
            contexts.push(row_to_context(&row)?);
        }
        Ok(contexts)
    }

    /// Distinct parameter keys with a significant annotation for any genotype
    /// of a gene.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn significant_parameters_for_gene(
        &self,
        gene_id: &str,
        threshold: f64,
    ) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT DISTINCT a.parameter_key
                 FROM annotation a
                 JOIN genotype g ON g.genotype_id = a.genotype_id
                 WHERE g.gene_id = ?1 AND a.pvalue < ?2
                 ORDER BY a.parameter_key",
                libsql::params![gene_id, threshold],
            )
            .await?;

        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }

    /// All annotations for a genotype+parameter, most significant first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn annotations_for(
        &self,
        genotype_id: i64,
        parameter_key: &str,
    ) -> Result<Vec<AnnotationRecord>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT annotation_id, genotype_id, parameter_key, pvalue, effect_size,
                        mp_term_1, mp_term_2
                 FROM annotation
                 WHERE genotype_id = ?1 AND parameter_key = ?2
                 ORDER BY pvalue IS NULL, pvalue, annotation_id",
                libsql::params![genotype_id, parameter_key],
            )
            .await?;

        let mut annotations = Vec::new();
        while let Some(row) = rows.next().await? {
            annotations.push(row_to_annotation(&row)?);
        }
        Ok(annotations)
    }

    /// Ontology term details for a term id, if the term is known.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn ontology_term(&self, term_id: &str) -> Result<Option<OntologyTerm>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT mp_id, mp_term, selection_outcome FROM mp_term WHERE mp_id = ?1",
                [term_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_term(&row)?)),
            None => Ok(None),
        }
    }

    /// Distinct parameter keys annotated with any of `term_ids` for any of
    /// `genotype_ids`, in key order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn parameters_for_ontology_terms(
        &self,
        genotype_ids: &[i64],
        term_ids: &[String],
    ) -> Result<Vec<String>, DatabaseError> {
        if genotype_ids.is_empty() || term_ids.is_empty() {
            return Ok(Vec::new());
        }

        let terms = in_placeholders(1, term_ids.len());
        let sql = format!(
            "SELECT DISTINCT parameter_key
             FROM annotation
             WHERE (mp_term_1 IN ({terms}) OR mp_term_2 IN ({terms}))
               AND genotype_id IN ({})
             ORDER BY parameter_key",
            in_placeholders(term_ids.len() + 1, genotype_ids.len())
        );
        let params: Vec<libsql::Value> = term_ids
            .iter()
            .map(|t| libsql::Value::from(t.as_str()))
            .chain(genotype_ids.iter().map(|g| libsql::Value::from(*g)))
            .collect();

        let mut rows = self.query(&sql, libsql::params_from_iter(params)).await?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }

    /// Distinct annotated parameter keys of procedures with any of the given
    /// super-types, restricted to `genotype_ids`, in key order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn parameters_for_procedure_types(
        &self,
        genotype_ids: &[i64],
        type_ids: &[i64],
    ) -> Result<Vec<String>, DatabaseError> {
        if genotype_ids.is_empty() || type_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT p.parameter_key
             FROM parameter p
             JOIN procedure_super_type t ON t.procedure_id = p.procedure_id
             JOIN annotation a ON a.parameter_key = p.parameter_key
             WHERE t.type_id IN ({})
               AND a.genotype_id IN ({})
             ORDER BY p.parameter_key",
            in_placeholders(1, type_ids.len()),
            in_placeholders(type_ids.len() + 1, genotype_ids.len())
        );
        let params: Vec<libsql::Value> = type_ids
            .iter()
            .chain(genotype_ids)
            .map(|id| libsql::Value::from(*id))
            .collect();

        let mut rows = self.query(&sql, libsql::params_from_iter(params)).await?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }

    /// Start time of the most recent annotation session.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the timestamp is malformed.
    pub async fn annotations_last_computed(&self) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        let mut rows = self
            .query("SELECT MAX(started) FROM annotation_session", ())
            .await?;
        match rows.next().await? {
            Some(row) => get_opt_datetime(&row, 0),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{seeded_db, test_db};

    #[tokio::test]
    async fn threshold_is_strict_for_contexts() {
        let db = seeded_db().await;

        // Annotation 2 sits exactly on 1e-4.
        let at_boundary = db
            .significant_contexts_for_parameter("IMPC_VIA_001_001", 1e-4)
            .await
            .unwrap();
        assert!(at_boundary.is_empty());

        let above = db
            .significant_contexts_for_parameter("IMPC_VIA_001_001", 2e-4)
            .await
            .unwrap();
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].genotype_id, 42);
    }

    #[tokio::test]
    async fn significant_contexts_are_distinct() {
        let db = seeded_db().await;
        let contexts = db
            .significant_contexts_for_parameter("IMPC_BWT_008_001", 1e-4)
            .await
            .unwrap();
        let genotypes: Vec<i64> = contexts.iter().map(|c| c.genotype_id).collect();
        // Genotype 42 has two qualifying annotations; 43 is above threshold.
        assert_eq!(genotypes, vec![42, 44]);
        assert_eq!(contexts[1].gene_symbol.as_deref(), Some("Foxo1"));
    }

    #[tokio::test]
    async fn threshold_is_strict_for_parameters() {
        let db = seeded_db().await;
        let keys = db
            .significant_parameters_for_gene("MGI:104874", 1e-4)
            .await
            .unwrap();
        assert_eq!(keys, vec!["IMPC_BWT_008_001".to_string()]);

        let keys = db
            .significant_parameters_for_gene("MGI:104874", 0.05)
            .await
            .unwrap();
        assert_eq!(
            keys,
            vec!["IMPC_BWT_008_001".to_string(), "IMPC_VIA_001_001".to_string()]
        );
    }

    #[tokio::test]
    async fn null_pvalues_never_qualify() {
        let db = seeded_db().await;
        let contexts = db
            .significant_contexts_for_parameter("IMPC_VIA_001_001", 1.0)
            .await
            .unwrap();
        assert!(contexts.iter().all(|c| c.genotype_id != 44));
    }

    #[tokio::test]
    async fn annotations_collect_term_refs() {
        let db = seeded_db().await;
        let records = db.annotations_for(44, "IMPC_BWT_008_001").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].ontology_term_refs,
            vec!["MP:0001262".to_string(), "MP:9999999".to_string()]
        );

        let records = db.annotations_for(42, "IMPC_BWT_008_001").await.unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.annotation_id).collect();
        assert_eq!(ids, vec![1, 6]);
    }

    #[tokio::test]
    async fn ontology_term_lookup() {
        let db = seeded_db().await;
        let term = db.ontology_term("MP:0001262").await.unwrap().unwrap();
        assert_eq!(term.term, "decreased body weight");
        assert_eq!(term.selection_outcome.as_deref(), Some("significant"));
        assert!(db.ontology_term("MP:9999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn parameters_expand_from_ontology_terms() {
        let db = seeded_db().await;
        let terms = vec!["MP:0001262".to_string(), "MP:0011100".to_string()];

        assert_eq!(
            db.parameters_for_ontology_terms(&[42], &terms).await.unwrap(),
            vec!["IMPC_BWT_008_001".to_string(), "IMPC_VIA_001_001".to_string()]
        );
        // MP:9999999 only appears as the second term of genotype 44.
        assert_eq!(
            db.parameters_for_ontology_terms(&[44], &["MP:9999999".to_string()])
                .await
                .unwrap(),
            vec!["IMPC_BWT_008_001".to_string()]
        );
        assert!(
            db.parameters_for_ontology_terms(&[43], &terms)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn parameters_expand_from_procedure_types() {
        let db = seeded_db().await;

        assert_eq!(
            db.parameters_for_procedure_types(&[42], &[2]).await.unwrap(),
            vec!["IMPC_VIA_001_001".to_string()]
        );
        assert_eq!(
            db.parameters_for_procedure_types(&[43, 44], &[1, 2]).await.unwrap(),
            vec!["IMPC_BWT_008_001".to_string(), "IMPC_VIA_001_001".to_string()]
        );
        assert!(
            db.parameters_for_procedure_types(&[43], &[2])
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn empty_expansion_inputs_skip_the_query() {
        let db = test_db().await;
        assert!(db.parameters_for_procedure_types(&[], &[1]).await.unwrap().is_empty());
        assert!(
            db.parameters_for_ontology_terms(&[42], &[])
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn last_computed_is_latest_session() {
        let db = seeded_db().await;
        let started = db.annotations_last_computed().await.unwrap().unwrap();
        assert_eq!((started.day(), started.hour()), (2, 12));
    }

    #[tokio::test]
    async fn last_computed_without_sessions_is_none() {
        let db = test_db().await;
        assert!(db.annotations_last_computed().await.unwrap().is_none());
    }
}
