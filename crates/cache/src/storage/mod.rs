//! Storage backend for cached objects and the cache index
//!
//! The backend is byte-oriented: callers hand it an already encoded payload
//! under a storage name and get the same bytes back. [`FileStore`] persists
//! each name as one file with a checksummed header and optional zstd
//! compression; [`MemoryStore`] keeps everything in memory.

mod compression;
mod file;
mod format;
mod memory;
mod reader;
mod writer;

pub use compression::CompressionConfig;
pub use file::FileStore;
pub use format::{StorageHeader, DEFAULT_COMPRESSION_LEVEL, STORAGE_MAGIC, STORAGE_VERSION};
pub use memory::MemoryStore;

use crate::errors::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Durable byte storage addressed by storage name
pub trait ObjectStore: Send + Sync {
    /// Resolve `name` to its current location, or `None` if no storage area is available
    ///
    /// Only computes the location; the storage area is created by the first write.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Durably replace the bytes stored under `name`
    fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Bytes previously written under `name`; `Ok(None)` if nothing was written
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for Arc<S> {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        (**self).locate(name)
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        (**self).write(name, data)
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(name)
    }
}
