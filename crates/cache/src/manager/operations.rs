//! Save, load and index persistence

use super::CacheManager;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::index::StorageKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

impl CacheManager {
    /// Store `value` under `identifier`, replacing any previous value
    ///
    /// Returns `false` for an empty identifier (without touching the index)
    /// or when the value could not be written. The index is persisted
    /// whether or not the value write succeeded.
    pub fn save<V: Serialize + ?Sized>(&self, identifier: &str, value: &V) -> bool {
        match self.try_save(identifier, value) {
            Ok(_) => true,
            Err(CacheError::InvalidKey { reason, .. }) => {
                tracing::debug!(identifier, reason = %reason, "rejected save");
                false
            }
            Err(e) => {
                tracing::warn!(identifier, error = %e, "failed to save cached value");
                false
            }
        }
    }

    /// [`CacheManager::save`] with the failure cause
    pub fn try_save<V: Serialize + ?Sized>(
        &self,
        identifier: &str,
        value: &V,
    ) -> Result<StorageKey> {
        let resolution = match self.index.resolve_or_mint(identifier) {
            Ok(r) => r,
            Err(e) => {
                self.stats.record_save(false);
                return Err(e);
            }
        };
        let key = resolution.key;
        if resolution.minted {
            tracing::debug!(identifier, key = %key, "minted storage key");
        }

        let written = self
            .codec
            .encode(key.as_str(), value)
            .and_then(|bytes| self.store.write(key.as_str(), &bytes));

        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to persist cache index");
        }

        self.stats.record_save(written.is_ok());
        written.map(|()| key)
    }

    /// Value stored under `identifier`, or `None` if absent or unreadable
    pub fn load<V: DeserializeOwned>(&self, identifier: &str) -> Option<V> {
        match self.try_load(identifier) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(identifier, error = %e, "failed to load cached value");
                None
            }
        }
    }

    /// [`CacheManager::load`] with the failure cause
    ///
    /// `Ok(None)` means the identifier was never saved. A mapped identifier
    /// whose object is missing or unreadable is an error.
    pub fn try_load<V: DeserializeOwned>(&self, identifier: &str) -> Result<Option<V>> {
        let result = self.read_value(identifier);
        self.stats.record_load(matches!(result, Ok(Some(_))));
        result
    }

    fn read_value<V: DeserializeOwned>(&self, identifier: &str) -> Result<Option<V>> {
        let Some(key) = self.index.lookup(identifier) else {
            return Ok(None);
        };

        let bytes = match self.store.read(key.as_str())? {
            Some(bytes) => bytes,
            None => {
                return Err(CacheError::Corruption {
                    key: key.to_string(),
                    reason: format!("object for identifier '{identifier}' is missing from storage"),
                    recovery_hint: RecoveryHint::ClearAndRetry,
                });
            }
        };

        self.codec.decode(key.as_str(), &bytes).map(Some)
    }

    /// Persist the whole index under its fixed storage name
    ///
    /// Runs automatically after every save; calling it again retries a
    /// persistence that failed earlier.
    pub fn flush(&self) -> Result<()> {
        let _guard = self.persist_lock.lock();
        let snapshot = self.index.snapshot();
        let bytes = snapshot.to_json(&self.index_name)?;
        self.store.write(&self.index_name, &bytes)?;
        tracing::trace!(
            entries = snapshot.location_by_identifier.len(),
            max_assigned_id = snapshot.max_assigned_id,
            "persisted cache index"
        );
        Ok(())
    }
}
