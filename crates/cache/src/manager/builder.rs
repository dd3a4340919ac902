//! Cache manager builder and initialization

use super::CacheManager;
use crate::codec::Codec;
use crate::config::CacheConfig;
use crate::index::minted_id;
use crate::locator::{is_valid_storage_name, FixedDir, XdgDataDir};
use crate::storage::{FileStore, ObjectStore};
use keepsake_core::INDEX_NAME;
use std::sync::Arc;

/// Builder for [`CacheManager`]
#[derive(Default)]
pub struct CacheManagerBuilder {
    config: Option<CacheConfig>,
    store: Option<Arc<dyn ObjectStore>>,
    codec: Option<Codec>,
}

impl CacheManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use `store` instead of a [`FileStore`] derived from the configuration
    pub fn with_store(mut self, store: impl ObjectStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn with_shared_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Build the manager, loading the persisted index or starting fresh
    pub fn build(self) -> CacheManager {
        let config = self.config.unwrap_or_default();
        let store = self.store.unwrap_or_else(|| default_store(&config));
        let codec = self.codec.unwrap_or(config.codec);

        CacheManager::from_parts(store, codec, checked_index_name(config.index_name))
    }
}

/// `name` if it can hold the index without sharing a file with a cached value
fn checked_index_name(name: String) -> String {
    if is_valid_storage_name(&name) && minted_id(&name).is_none() {
        return name;
    }
    tracing::warn!(
        index_name = %name,
        fallback = INDEX_NAME,
        "index name is not usable, using the default"
    );
    INDEX_NAME.to_string()
}

/// File store for a configuration: fixed directory if set, XDG data directory otherwise
fn default_store(config: &CacheConfig) -> Arc<dyn ObjectStore> {
    match &config.base_dir {
        Some(dir) => Arc::new(FileStore::new(FixedDir(dir.clone()), config.compression)),
        None => Arc::new(FileStore::new(XdgDataDir, config.compression)),
    }
}
