use keepsake_core::APP_DIR_NAME;
use std::env;
use std::path::PathBuf;

/// XDG Base Directory paths for keepsake
pub struct XdgPaths;

impl XdgPaths {
    /// `$XDG_DATA_HOME/keepsake`, else the platform data directory
    ///
    /// `None` when no base location can be determined; never falls back to a
    /// path relative to the working directory.
    pub fn try_data_dir() -> Option<PathBuf> {
        match env::var_os("XDG_DATA_HOME") {
            Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir).join(APP_DIR_NAME)),
            _ => dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_var<F: FnOnce()>(key: &str, value: Option<&str>, f: F) {
        let original = env::var_os(key);
        match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
        f();
        match original {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    #[test]
    #[serial]
    fn test_data_dir_from_env() {
        with_var("XDG_DATA_HOME", Some("/tmp/data"), || {
            assert_eq!(
                XdgPaths::try_data_dir(),
                Some(PathBuf::from("/tmp/data/keepsake"))
            );
        });
    }

    #[test]
    #[serial]
    fn test_data_dir_fallback() {
        with_var("XDG_DATA_HOME", None, || {
            assert_eq!(
                XdgPaths::try_data_dir(),
                dirs::data_dir().map(|dir| dir.join("keepsake"))
            );
        });
    }

    #[test]
    #[serial]
    fn test_empty_xdg_data_home_is_ignored() {
        with_var("XDG_DATA_HOME", Some(""), || {
            if let Some(path) = XdgPaths::try_data_dir() {
                assert!(path.is_absolute());
                assert!(path.ends_with("keepsake"));
            }
        });
    }
}
