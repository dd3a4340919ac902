#![allow(dead_code)]
//! Shared helpers for cache integration tests

use keepsake_cache::{CacheConfigBuilder, CacheManager, CompressionConfig};
use std::path::Path;

/// Route library logs to the test harness; repeated calls are harmless
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("keepsake_cache=debug")
        .try_init();
}

/// Open a cache rooted at `dir`, as a fresh process would
pub fn open_in(dir: &Path) -> CacheManager {
    init_tracing();
    CacheManager::open(CacheConfigBuilder::new().with_base_dir(dir).build())
}

/// Open a cache rooted at `dir` that compresses every payload
pub fn open_compressed_in(dir: &Path) -> CacheManager {
    init_tracing();
    CacheManager::open(
        CacheConfigBuilder::new()
            .with_base_dir(dir)
            .with_compression(CompressionConfig {
                enabled: true,
                level: 3,
                min_size: 0,
            })
            .build(),
    )
}
