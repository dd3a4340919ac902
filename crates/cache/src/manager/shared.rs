//! Process-wide shared cache manager

use super::CacheManager;
use crate::config::CacheConfig;
use once_cell::sync::Lazy;

static SHARED: Lazy<CacheManager> = Lazy::new(|| {
    let config = CacheConfig::from_env();
    tracing::debug!(source = ?config.source, base_dir = ?config.base_dir, "initializing shared cache manager");
    CacheManager::open(config)
});

impl CacheManager {
    /// The process-wide cache manager
    ///
    /// Constructed exactly once, on first access, from
    /// [`CacheConfig::from_env`]. Concurrent first callers block until
    /// construction (including loading the persisted index) has finished.
    pub fn shared() -> &'static CacheManager {
        &SHARED
    }
}
