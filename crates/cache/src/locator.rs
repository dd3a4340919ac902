//! Storage directory resolution
//!
//! The directory holding cached objects is resolved again on every access.
//! Hosts whose private storage prefix can change while the process runs plug
//! in their own [`DirectoryResolver`].

use keepsake_utils::xdg::XdgPaths;
use std::path::{Component, Path, PathBuf};

/// Resolves the directory that holds the index and the cached objects
pub trait DirectoryResolver: Send + Sync {
    /// Current storage directory, or `None` if no storage area is available
    fn resolve(&self) -> Option<PathBuf>;
}

/// `$XDG_DATA_HOME/keepsake`, falling back to the platform data directory
#[derive(Debug, Clone, Copy, Default)]
pub struct XdgDataDir;

impl DirectoryResolver for XdgDataDir {
    fn resolve(&self) -> Option<PathBuf> {
        XdgPaths::try_data_dir()
    }
}

/// A fixed, caller-chosen directory
#[derive(Debug, Clone)]
pub struct FixedDir(pub PathBuf);

impl DirectoryResolver for FixedDir {
    fn resolve(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

impl<F> DirectoryResolver for F
where
    F: Fn() -> Option<PathBuf> + Send + Sync,
{
    fn resolve(&self) -> Option<PathBuf> {
        self()
    }
}

/// Whether `name` can be used as a single file name inside the storage directory
pub fn is_valid_storage_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_storage_name_validation() {
        assert!(is_valid_storage_name("object.1"));
        assert!(is_valid_storage_name("cachemanager"));
        assert!(!is_valid_storage_name(""));
        assert!(!is_valid_storage_name("."));
        assert!(!is_valid_storage_name(".."));
        assert!(!is_valid_storage_name("a/b"));
        assert!(!is_valid_storage_name("a\\b"));
        assert!(!is_valid_storage_name("/etc/passwd"));
        assert!(!is_valid_storage_name("nul\0byte"));
    }

    #[test]
    fn test_closure_resolver_is_called_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resolver = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Some(PathBuf::from(format!("/data/build-{n}")))
        };

        assert_eq!(resolver.resolve(), Some(PathBuf::from("/data/build-0")));
        assert_eq!(resolver.resolve(), Some(PathBuf::from("/data/build-1")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fixed_dir() {
        let resolver = FixedDir(PathBuf::from("/var/lib/keepsake"));
        assert_eq!(resolver.resolve(), Some(PathBuf::from("/var/lib/keepsake")));
    }
}
