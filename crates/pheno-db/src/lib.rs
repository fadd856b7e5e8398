//! # pheno-db
//!
//! libSQL read operations over the phenotyping overview database.
//!
//! Exposes every join the measurement engine needs as a parameterized read:
//! context resolution, protocol-instance lookup, mutant and baseline
//! measurements, metadata blobs, QC aggregates, significance annotations,
//! associated media and the gene/procedure/parameter catalogs.
//!
//! Nothing in this crate writes to the database outside of schema creation
//! for local files. Single-row lookups return `Option` so that "no row" is an
//! ordinary outcome rather than an error.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;

/// Central database handle for all phenoview read operations.
///
/// Wraps a libSQL database and connection. The connection is cheap to share
/// across tasks; concurrent readers are bounded by the caller.
pub struct PhenoDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl PhenoDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Creates the read-side schema if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let pheno_db = Self { db, conn };
        pheno_db.run_migrations().await?;
        tracing::debug!(path, "opened local phenotyping database");
        Ok(pheno_db)
    }

    /// Open a remote libSQL database.
    ///
    /// The remote schema is owned by the loading pipeline, so no migrations run.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        tracing::debug!(url, "opened remote phenotyping database");
        Ok(Self { db, conn })
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Run a read query on the shared connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the statement fails to prepare or run.
    pub async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        Ok(self.conn.query(sql, params).await?)
    }
}
