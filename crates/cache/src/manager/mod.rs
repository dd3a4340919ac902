//! Cache manager: the public face of the cache
//!
//! Ties the [`CacheIndex`] to an [`ObjectStore`]. Every `save` resolves or
//! mints a storage key, writes the value, and re-persists the whole index.

mod builder;
mod operations;
mod shared;
mod statistics;

pub use builder::CacheManagerBuilder;
pub use statistics::CacheStatistics;

use crate::codec::Codec;
use crate::config::CacheConfig;
use crate::errors::Result;
use crate::index::{CacheIndex, IndexSnapshot, StorageKey};
use crate::storage::ObjectStore;
use parking_lot::Mutex;
use statistics::StatCounters;
use std::sync::Arc;

/// Persistent identifier-keyed object cache
pub struct CacheManager {
    store: Arc<dyn ObjectStore>,
    index: CacheIndex,
    codec: Codec,
    index_name: String,
    /// Serializes index persistence so the newest snapshot is written last
    persist_lock: Mutex<()>,
    stats: StatCounters,
}

impl CacheManager {
    /// Open a cache as described by `config`
    pub fn open(config: CacheConfig) -> Self {
        CacheManagerBuilder::new().with_config(config).build()
    }

    /// Open a cache on top of an existing store with default settings
    pub fn with_store(store: impl ObjectStore + 'static) -> Self {
        CacheManagerBuilder::new().with_store(store).build()
    }

    pub fn builder() -> CacheManagerBuilder {
        CacheManagerBuilder::new()
    }

    pub(crate) fn from_parts(store: Arc<dyn ObjectStore>, codec: Codec, index_name: String) -> Self {
        let index = load_index(store.as_ref(), &index_name);
        tracing::debug!(
            index_name = %index_name,
            entries = index.len(),
            max_assigned_id = index.max_assigned_id(),
            "cache index ready"
        );
        Self {
            store,
            index,
            codec,
            index_name,
            persist_lock: Mutex::new(()),
            stats: StatCounters::default(),
        }
    }

    /// Whether `identifier` has been assigned a storage key
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains(identifier)
    }

    /// Storage key assigned to `identifier`
    pub fn storage_key(&self, identifier: &str) -> Option<StorageKey> {
        self.index.lookup(identifier)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn max_assigned_id(&self) -> u64 {
        self.index.max_assigned_id()
    }

    /// Mapped identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        self.index.identifiers()
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn statistics(&self) -> CacheStatistics {
        self.stats.snapshot(self.index.len(), self.index.max_assigned_id())
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("index", &self.index)
            .field("codec", &self.codec)
            .field("index_name", &self.index_name)
            .finish_non_exhaustive()
    }
}

/// Load the persisted index, falling back to an empty one on any failure
fn load_index(store: &dyn ObjectStore, index_name: &str) -> CacheIndex {
    match read_snapshot(store, index_name) {
        Ok(Some(snapshot)) => CacheIndex::from_snapshot(snapshot),
        Ok(None) => {
            tracing::debug!(index_name, "no persisted cache index, starting fresh");
            CacheIndex::new()
        }
        Err(e) => {
            tracing::warn!(index_name, error = %e, "unreadable cache index, starting fresh");
            CacheIndex::new()
        }
    }
}

fn read_snapshot(store: &dyn ObjectStore, index_name: &str) -> Result<Option<IndexSnapshot>> {
    match store.read(index_name)? {
        Some(bytes) => IndexSnapshot::from_json(index_name, &bytes).map(Some),
        None => Ok(None),
    }
}
