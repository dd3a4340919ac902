//! Property tests for storage key allocation

use keepsake_cache::{CacheManager, MemoryStore};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_distinct_identifiers_get_distinct_keys(
        identifiers in prop::collection::btree_set("[a-z0-9:/._-]{1,24}", 1..40)
    ) {
        let cache = CacheManager::with_store(MemoryStore::new());
        for identifier in &identifiers {
            prop_assert!(cache.save(identifier, identifier));
        }

        let keys: HashSet<String> = identifiers
            .iter()
            .map(|id| cache.storage_key(id).unwrap().to_string())
            .collect();
        prop_assert_eq!(keys.len(), identifiers.len());
        prop_assert_eq!(cache.max_assigned_id(), identifiers.len() as u64);
    }

    #[test]
    fn prop_resaving_never_grows_the_index(
        identifiers in prop::collection::vec("[a-c]{1,2}", 1..60)
    ) {
        let cache = CacheManager::with_store(MemoryStore::new());
        for (i, identifier) in identifiers.iter().enumerate() {
            prop_assert!(cache.save(identifier, &i));
        }

        let distinct: BTreeSet<&String> = identifiers.iter().collect();
        prop_assert_eq!(cache.len(), distinct.len());
        prop_assert_eq!(cache.max_assigned_id(), distinct.len() as u64);

        // Each identifier holds the value of its last save
        for identifier in distinct {
            let last = identifiers.iter().rposition(|id| id == identifier).unwrap();
            prop_assert_eq!(cache.load::<usize>(identifier), Some(last));
        }
    }

    #[test]
    fn prop_save_then_load_roundtrips(
        identifier in "[^\\x00]{1,32}",
        value in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)
    ) {
        let cache = CacheManager::with_store(MemoryStore::new());
        prop_assert!(cache.save(&identifier, &value));
        prop_assert_eq!(cache.load::<BTreeMap<String, i64>>(&identifier), Some(value));
    }
}
