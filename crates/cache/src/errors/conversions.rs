//! Error conversion utilities

use super::types::{CacheError, RecoveryHint, SerializationOp};
use std::path::Path;
use std::time::Duration;

impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            key: String::new(),
            operation: SerializationOp::Decode,
            source: Box::new(error),
            recovery_hint: RecoveryHint::ClearAndRetry,
        }
    }
}

impl From<bincode::Error> for CacheError {
    fn from(error: bincode::Error) -> Self {
        Self::Serialization {
            key: String::new(),
            operation: SerializationOp::Decode,
            source: error,
            recovery_hint: RecoveryHint::ClearAndRetry,
        }
    }
}

impl From<keepsake_core::Error> for CacheError {
    fn from(error: keepsake_core::Error) -> Self {
        match error {
            keepsake_core::Error::FileSystem {
                path,
                operation,
                source,
            } => Self::Io {
                recovery_hint: io_recovery_hint(&path, &source),
                path,
                operation,
                source,
            },
            other => Self::Configuration {
                message: other.to_string(),
                recovery_hint: RecoveryHint::UpdateConfiguration,
            },
        }
    }
}

fn io_recovery_hint(path: &Path, error: &std::io::Error) -> RecoveryHint {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::NotFound => RecoveryHint::Recreate,
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            RecoveryHint::Retry {
                after: Duration::from_millis(100),
            }
        }
        _ => RecoveryHint::CheckPermissions {
            path: path.to_path_buf(),
        },
    }
}

impl CacheError {
    /// Attach the storage key an error refers to, where the variant carries one
    #[must_use]
    pub fn with_key(mut self, name: &str) -> Self {
        match &mut self {
            Self::Serialization { key, .. }
            | Self::Corruption { key, .. }
            | Self::InvalidKey { key, .. } => {
                if key.is_empty() {
                    *key = name.to_string();
                }
            }
            _ => {}
        }
        self
    }
}
