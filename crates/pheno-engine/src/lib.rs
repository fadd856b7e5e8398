//! # pheno-engine
//!
//! Read-only measurement aggregation over a [`MeasurementStore`].
//!
//! A single query runs Locator, Fetchers, Metadata Deduplicator and QC
//! Classifier for one context+parameter. Exports fan that pipeline out over a
//! gene × parameter cross-product, bounded by the configured caps and worker
//! pool, and return results in enumeration order.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use pheno_config::PhenoConfig;
//! use pheno_db::PhenoDb;
//! use pheno_engine::{MemoryCache, PhenoService};
//!
//! let db = PhenoDb::open_local("phenoview.db").await?;
//! let service = PhenoService::new(Arc::new(db), Arc::new(MemoryCache::default()), PhenoConfig::default().export);
//! let export = service
//!     .bulk_export(&["MGI:104874".into()], &["IMPC_BWT_008_001".into()], true)
//!     .await?;
//! println!("{} pairs", export.total);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod dedup;
pub mod error;
pub mod expand;
pub mod export;
pub mod qc;
pub mod retrieve;
pub mod service;
pub mod significance;
pub mod store;

#[cfg(test)]
mod test_support;

pub use cache::{CacheKey, LookasideCache, MemoryCache, NoCache};
pub use error::EngineError;
pub use service::PhenoService;
pub use store::MeasurementStore;
