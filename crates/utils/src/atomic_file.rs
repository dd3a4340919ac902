//! Crash-safe replacement of cache files
//!
//! A write is staged in a hidden sibling file, flushed, renamed over the
//! target and then made durable by syncing the containing directory. Readers
//! see either the previous file or the new one, never a partial write.

use keepsake_core::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Replace the contents of `path` with `content` atomically and durably
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if dir.as_os_str().is_empty() && path.file_name().is_some() => Path::new("."),
        Some(dir) if path.file_name().is_some() => dir,
        _ => {
            return Err(Error::configuration(format!(
                "'{}' does not name a file inside a directory",
                path.display()
            )))
        }
    };

    fs::create_dir_all(dir).map_err(|e| Error::file_system(dir, "create storage directory", e))?;

    let staged = StagedFile::create(dir)?;
    staged.fill(content)?;
    staged.commit(path)?;
    sync_dir(dir)
}

/// Hidden `.{uuid}.tmp` file removed on drop unless it was committed
struct StagedFile {
    path: PathBuf,
    file: File,
    committed: bool,
}

impl StagedFile {
    fn create(dir: &Path) -> Result<Self> {
        let path = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::file_system(&path, "create staging file", e))?;
        Ok(Self {
            path,
            file,
            committed: false,
        })
    }

    fn fill(&self, content: &[u8]) -> Result<()> {
        let mut file = &self.file;
        file.write_all(content)
            .map_err(|e| Error::file_system(&self.path, "write staging file", e))?;
        file.sync_all()
            .map_err(|e| Error::file_system(&self.path, "sync staging file", e))
    }

    fn commit(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target)
            .map_err(|e| Error::file_system(target, "rename staging file into place", e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| Error::file_system(dir, "sync storage directory", e))
}

// Directory handles cannot be synced on this platform; the rename is final.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn staging_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("cachemanager");

        write_atomic(&file_path, b"{}").unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), b"{}");
    }

    #[test]
    fn test_overwrite_leaves_no_staging_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("object.2");

        fs::write(&file_path, "old").unwrap();
        write_atomic(&file_path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
        assert!(staging_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_failed_rename_reports_target_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("object.3");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupant"), "x").unwrap();

        let err = write_atomic(&target, b"value").unwrap_err();
        match err {
            Error::FileSystem {
                path, operation, ..
            } => {
                assert_eq!(path, target);
                assert!(operation.contains("rename"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(staging_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let err = write_atomic(Path::new("/"), b"data").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
