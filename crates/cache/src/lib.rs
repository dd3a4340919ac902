//! Persistent identifier-keyed object cache
//!
//! Callers store any `serde` value under a string identifier and read it
//! back later, across process restarts:
//!
//! ```no_run
//! use keepsake_cache::CacheManager;
//! use serde_json::json;
//!
//! let cache = CacheManager::shared();
//! assert!(cache.save("user:42", &json!({"name": "a"})));
//! let user: Option<serde_json::Value> = cache.load("user:42");
//! ```
//!
//! Each identifier is mapped once to a never-reused storage key
//! (`object.<n>`). The mapping and its id counter form the cache index,
//! which is persisted under the fixed name `cachemanager` after every save.
//! There is no eviction, expiry or deletion.

pub mod codec;
pub mod config;
pub mod errors;
pub mod index;
pub mod locator;
pub mod manager;
pub mod storage;

pub use codec::Codec;
pub use config::{CacheConfig, CacheConfigBuilder, ConfigSource};
pub use errors::{CacheError, Error, RecoveryHint, Result};
pub use index::{CacheIndex, IndexSnapshot, Resolution, StorageKey};
pub use locator::{DirectoryResolver, FixedDir, XdgDataDir};
pub use manager::{CacheManager, CacheManagerBuilder, CacheStatistics};
pub use storage::{CompressionConfig, FileStore, MemoryStore, ObjectStore};
