//! Look-aside cache for whole-collection lookups.
//!
//! Entries are stored as JSON under a fixed logical key. The engine reads
//! through the cache and populates it on a miss; invalidation belongs to
//! whoever owns the cache. A cache that never holds anything ([`NoCache`]) is
//! always valid.

use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::EngineError;

/// Logical names of the cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    CentreList,
    GeneStrainIndex,
    ParameterCatalog,
    ProcedureCatalog,
}

impl CacheKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CentreList => "centre-list",
            Self::GeneStrainIndex => "gene-strain-index",
            Self::ParameterCatalog => "parameter-catalog",
            Self::ProcedureCatalog => "procedure-catalog",
        }
    }
}

/// Outcome of a cache read.
#[derive(Debug)]
pub enum CacheLookup {
    Miss,
    Hit(serde_json::Value),
}

pub trait LookasideCache: Send + Sync {
    /// Fetch a previously stored collection.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Cache` if the backend cannot be read.
    fn get(&self, key: CacheKey) -> Result<CacheLookup, EngineError>;

    /// Store a collection, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Cache` if the backend cannot be written.
    fn put(&self, key: CacheKey, value: serde_json::Value) -> Result<(), EngineError>;
}

/// A cache that never holds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl LookasideCache for NoCache {
    fn get(&self, _key: CacheKey) -> Result<CacheLookup, EngineError> {
        Ok(CacheLookup::Miss)
    }

    fn put(&self, _key: CacheKey, _value: serde_json::Value) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Process-local cache backed by a map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, serde_json::Value>>,
}

impl MemoryCache {
    /// Drop every cached collection.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl LookasideCache for MemoryCache {
    fn get(&self, key: CacheKey) -> Result<CacheLookup, EngineError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| EngineError::Cache(format!("read lock poisoned: {e}")))?;
        Ok(entries
            .get(&key)
            .cloned()
            .map_or(CacheLookup::Miss, CacheLookup::Hit))
    }

    fn put(&self, key: CacheKey, value: serde_json::Value) -> Result<(), EngineError> {
        self.entries
            .write()
            .map_err(|e| EngineError::Cache(format!("write lock poisoned: {e}")))?
            .insert(key, value);
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: CacheKey, lookup: CacheLookup) -> Result<Option<T>, EngineError> {
    match lookup {
        CacheLookup::Miss => Ok(None),
        CacheLookup::Hit(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| EngineError::Cache(format!("{}: {e}", key.as_str()))),
    }
}

/// Read a collection through the cache, loading and storing it on a miss.
///
/// Cache failures are logged and treated as a miss; only `load` errors are
/// returned.
///
/// # Errors
///
/// Returns whatever `load` returns.
pub async fn read_through<T, F, Fut>(
    cache: &dyn LookasideCache,
    key: CacheKey,
    load: F,
) -> Result<T, EngineError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    match cache.get(key).and_then(|lookup| decode::<T>(key, lookup)) {
        Ok(Some(hit)) => {
            tracing::debug!(key = key.as_str(), "cache hit");
            return Ok(hit);
        }
        Ok(None) => tracing::debug!(key = key.as_str(), "cache miss"),
        Err(e) => tracing::warn!(key = key.as_str(), error = %e, "cache read failed; loading from store"),
    }

    let value = load().await?;
    match serde_json::to_value(&value) {
        Ok(json) => {
            if let Err(e) = cache.put(key, json) {
                tracing::warn!(key = key.as_str(), error = %e, "cache write failed");
            }
        }
        Err(e) => tracing::warn!(key = key.as_str(), error = %e, "cache encode failed"),
    }
    Ok(value)
}
