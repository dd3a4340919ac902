//! The cache index: identifier → storage key, plus the id counter
//!
//! The index is the single authority for whether an identifier already has a
//! location and, if not, which location it gets. Minting is the only critical
//! section in the cache: a `parking_lot::Mutex` makes check-then-increment
//! atomic, and the lock is released before any storage I/O happens.

mod key;
mod snapshot;

pub(crate) use key::minted_id;
pub use key::StorageKey;
pub use snapshot::IndexSnapshot;

use crate::errors::{CacheError, RecoveryHint, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Outcome of [`CacheIndex::resolve_or_mint`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub key: StorageKey,
    /// `true` if the key was allocated by this call
    pub minted: bool,
}

#[derive(Debug, Default)]
struct IndexState {
    max_assigned_id: u64,
    location_by_identifier: HashMap<String, StorageKey>,
}

/// Identifier → storage key mapping with a monotonic id counter
#[derive(Debug, Default)]
pub struct CacheIndex {
    state: Mutex<IndexState>,
}

impl CacheIndex {
    /// An empty index; the first minted key is `object.1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from its persisted form
    ///
    /// Entries that would break the index invariants (empty identifiers,
    /// keys outside the `object.<n>` namespace, a storage key shared by two
    /// identifiers) are dropped, and the counter is raised to cover every
    /// minted key present.
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Self {
        let mut max_assigned_id = snapshot.max_assigned_id;
        let mut seen = HashSet::new();
        let mut location_by_identifier =
            HashMap::with_capacity(snapshot.location_by_identifier.len());

        for (identifier, key) in snapshot.location_by_identifier {
            let Some(id) = key.id().filter(|_| !identifier.is_empty()) else {
                tracing::warn!(identifier = %identifier, key = %key, "dropping invalid index entry");
                continue;
            };
            if !seen.insert(key.clone()) {
                tracing::warn!(
                    identifier = %identifier,
                    key = %key,
                    "dropping index entry with a shared storage key"
                );
                continue;
            }
            max_assigned_id = max_assigned_id.max(id);
            location_by_identifier.insert(identifier, key);
        }

        if max_assigned_id != snapshot.max_assigned_id {
            tracing::warn!(
                stored = snapshot.max_assigned_id,
                repaired = max_assigned_id,
                "index counter was behind its minted keys"
            );
        }

        Self {
            state: Mutex::new(IndexState {
                max_assigned_id,
                location_by_identifier,
            }),
        }
    }

    /// Existing storage key for `identifier`, or a freshly minted one
    pub fn resolve_or_mint(&self, identifier: &str) -> Result<Resolution> {
        if identifier.is_empty() {
            return Err(CacheError::InvalidKey {
                key: String::new(),
                reason: "identifier must not be empty".to_string(),
                recovery_hint: RecoveryHint::Ignore,
            });
        }

        let mut state = self.state.lock();
        if let Some(key) = state.location_by_identifier.get(identifier) {
            return Ok(Resolution {
                key: key.clone(),
                minted: false,
            });
        }

        let Some(next_id) = state.max_assigned_id.checked_add(1) else {
            return Err(CacheError::InvalidKey {
                key: identifier.to_string(),
                reason: "storage id space exhausted".to_string(),
                recovery_hint: RecoveryHint::RebuildIndex,
            });
        };
        state.max_assigned_id = next_id;
        let key = StorageKey::from_id(next_id);
        state
            .location_by_identifier
            .insert(identifier.to_string(), key.clone());

        Ok(Resolution { key, minted: true })
    }

    pub fn lookup(&self, identifier: &str) -> Option<StorageKey> {
        self.state.lock().location_by_identifier.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.state.lock().location_by_identifier.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.state.lock().location_by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().location_by_identifier.is_empty()
    }

    pub fn max_assigned_id(&self) -> u64 {
        self.state.lock().max_assigned_id
    }

    /// All mapped identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self
            .state
            .lock()
            .location_by_identifier
            .keys()
            .cloned()
            .collect();
        identifiers.sort();
        identifiers
    }

    /// Consistent copy of the mapping and counter
    pub fn snapshot(&self) -> IndexSnapshot {
        let state = self.state.lock();
        IndexSnapshot {
            max_assigned_id: state.max_assigned_id,
            location_by_identifier: state
                .location_by_identifier
                .iter()
                .map(|(identifier, key)| (identifier.clone(), key.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_mint_and_reuse() {
        let index = CacheIndex::new();

        let first = index.resolve_or_mint("user:42").unwrap();
        assert!(first.minted);
        assert_eq!(first.key.as_str(), "object.1");

        let again = index.resolve_or_mint("user:42").unwrap();
        assert!(!again.minted);
        assert_eq!(again.key, first.key);
        assert_eq!(index.max_assigned_id(), 1);

        let second = index.resolve_or_mint("user:7").unwrap();
        assert_eq!(second.key.as_str(), "object.2");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_identifier_has_no_side_effects() {
        let index = CacheIndex::new();
        index.resolve_or_mint("a").unwrap();

        let err = index.resolve_or_mint("").unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey { .. }));
        assert_eq!(index.len(), 1);
        assert_eq!(index.max_assigned_id(), 1);
        assert!(!index.contains(""));
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_counter() {
        let index = CacheIndex::new();
        for identifier in ["a", "b", "c"] {
            index.resolve_or_mint(identifier).unwrap();
        }

        let restored = CacheIndex::from_snapshot(index.snapshot());
        assert_eq!(restored.max_assigned_id(), 3);
        assert_eq!(restored.lookup("b").unwrap().as_str(), "object.2");
        assert_eq!(restored.resolve_or_mint("d").unwrap().key.as_str(), "object.4");
    }

    #[test]
    fn test_from_snapshot_repairs_inconsistent_blob() {
        let mut snapshot = IndexSnapshot {
            max_assigned_id: 1,
            ..Default::default()
        };
        let map = &mut snapshot.location_by_identifier;
        map.insert("a".to_string(), StorageKey::from_id(5));
        map.insert("b".to_string(), StorageKey::from_id(5));
        map.insert(String::new(), StorageKey::from_id(9));
        for (identifier, raw) in [
            ("evil", "../../etc/passwd"),
            ("index", "cachemanager"),
            ("legacy", "legacy-file"),
            ("padded", "object.+7"),
        ] {
            map.insert(identifier.to_string(), serde_json::from_value(raw.into()).unwrap());
        }

        let index = CacheIndex::from_snapshot(snapshot);
        assert_eq!(index.identifiers(), vec!["a".to_string()]);
        assert_eq!(index.max_assigned_id(), 5);
        assert_eq!(index.resolve_or_mint("c").unwrap().key.as_str(), "object.6");
    }

    #[test]
    fn test_concurrent_minting_yields_distinct_keys() {
        let index = Arc::new(CacheIndex::new());
        let threads = 8;
        let per_thread = 50;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let index = Arc::clone(&index);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    (0..per_thread)
                        .map(|i| index.resolve_or_mint(&format!("t{t}-{i}")).unwrap().key)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut keys = HashSet::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                assert!(keys.insert(key), "storage key minted twice");
            }
        }

        assert_eq!(keys.len(), threads * per_thread);
        assert_eq!(index.max_assigned_id(), (threads * per_thread) as u64);
    }

    #[test]
    fn test_concurrent_same_identifier_mints_once() {
        let index = Arc::new(CacheIndex::new());
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = Arc::clone(&index);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    index.resolve_or_mint("shared").unwrap()
                })
            })
            .collect();

        let resolutions: Vec<Resolution> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(resolutions.iter().filter(|r| r.minted).count(), 1);
        assert!(resolutions.iter().all(|r| r.key.as_str() == "object.1"));
        assert_eq!(index.max_assigned_id(), 1);
    }
}
