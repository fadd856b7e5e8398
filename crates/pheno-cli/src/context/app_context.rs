use std::sync::Arc;

use anyhow::Context;
use pheno_config::PhenoConfig;
use pheno_db::PhenoDb;
use pheno_engine::{LookasideCache, MemoryCache, NoCache, PhenoService};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: PhenoService<PhenoDb>,
}

impl AppContext {
    /// Open the configured database and build the service on top of it.
    pub async fn init(config: PhenoConfig) -> anyhow::Result<Self> {
        let db = if config.database.is_remote() {
            PhenoDb::open_remote(&config.database.url, &config.database.auth_token)
                .await
                .with_context(|| {
                    format!("failed to open remote database at {}", config.database.url)
                })?
        } else {
            PhenoDb::open_local(&config.database.path)
                .await
                .with_context(|| {
                    format!("failed to open local database at {}", config.database.path)
                })?
        };

        let cache: Arc<dyn LookasideCache> = if config.cache.enabled {
            Arc::new(MemoryCache::default())
        } else {
            Arc::new(NoCache)
        };

        tracing::debug!(
            remote = config.database.is_remote(),
            cache = config.cache.enabled,
            workers = config.export.workers,
            "application context ready"
        );
        let service = PhenoService::new(Arc::new(db), cache, config.export);
        Ok(Self { service })
    }
}
