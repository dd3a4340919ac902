//! In-memory object store for ephemeral caches and tests

use super::ObjectStore;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::locator::is_valid_storage_name;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Keeps every object in a map; contents vanish with the store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects, the index included
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Replace raw stored bytes, bypassing all validation
    pub fn insert_raw(&self, name: &str, bytes: Vec<u8>) {
        self.objects.write().insert(name.to_string(), bytes);
    }
}

impl ObjectStore for MemoryStore {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        is_valid_storage_name(name).then(|| PathBuf::from(name))
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        if !is_valid_storage_name(name) {
            return Err(CacheError::InvalidKey {
                key: name.to_string(),
                reason: "storage names must be a single non-empty file name".to_string(),
                recovery_hint: RecoveryHint::Ignore,
            });
        }
        self.objects.write().insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.read().get(name).cloned())
    }
}
