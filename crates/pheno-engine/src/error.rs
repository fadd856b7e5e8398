//! Engine error types.

use pheno_db::error::DatabaseError;
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Missing rows never reach this type; they are replaced by defaults where
/// they occur.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The backing store failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),

    /// The look-aside cache could not encode or decode an entry.
    #[error("cache error: {0}")]
    Cache(String),

    /// The export did not finish within the configured timeout.
    #[error("export timed out after {0}s")]
    Timeout(u64),
}
