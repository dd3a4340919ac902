//! Filesystem-backed object store

use super::{reader, writer, CompressionConfig, ObjectStore};
use crate::errors::{CacheError, RecoveryHint, Result, StoreType};
use crate::locator::{is_valid_storage_name, DirectoryResolver, FixedDir};
use keepsake_utils::atomic_file::write_atomic;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

/// Stores each object as one file inside the resolved storage directory
pub struct FileStore {
    resolver: Box<dyn DirectoryResolver>,
    compression: CompressionConfig,
}

impl FileStore {
    /// Create a store whose directory is resolved by `resolver` on every access
    pub fn new(resolver: impl DirectoryResolver + 'static, compression: CompressionConfig) -> Self {
        Self {
            resolver: Box::new(resolver),
            compression,
        }
    }

    /// Create a store rooted at a fixed directory with default compression
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FixedDir(dir.into()), CompressionConfig::default())
    }

    pub fn compression(&self) -> &CompressionConfig {
        &self.compression
    }

    fn require_path(&self, name: &str) -> Result<PathBuf> {
        if !is_valid_storage_name(name) {
            return Err(CacheError::InvalidKey {
                key: name.to_string(),
                reason: "storage names must be a single non-empty file name".to_string(),
                recovery_hint: RecoveryHint::Ignore,
            });
        }
        match self.locate(name) {
            Some(path) => Ok(path),
            None => Err(CacheError::StoreUnavailable {
                store_type: StoreType::FileSystem,
                reason: format!("no storage directory available for '{name}'"),
                recovery_hint: RecoveryHint::Retry {
                    after: Duration::from_millis(100),
                },
            }),
        }
    }
}

impl ObjectStore for FileStore {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        if !is_valid_storage_name(name) {
            return None;
        }
        self.resolver.resolve().map(|dir| dir.join(name))
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.require_path(name)?;
        let framed = writer::frame(name, data, &self.compression)?;
        write_atomic(&path, &framed)?;
        tracing::trace!(name, path = %path.display(), bytes = framed.len(), "wrote object");
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.require_path(name)?;
        let file_data = match fs::read(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Io {
                    recovery_hint: RecoveryHint::CheckPermissions { path: path.clone() },
                    path,
                    operation: "read cache file".to_string(),
                    source: e,
                });
            }
        };
        reader::unframe(name, &file_data).map(Some)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}
