use keepsake_core::OBJECT_KEY_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the physical location holding one cached value (`object.<n>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key for a freshly minted id
    pub(crate) fn from_id(id: u64) -> Self {
        Self(format!("{OBJECT_KEY_PREFIX}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of a minted key, `None` for keys of any other shape
    pub fn id(&self) -> Option<u64> {
        minted_id(&self.0)
    }
}

/// Id encoded in `name` if it lies in the `object.<n>` namespace
pub(crate) fn minted_id(name: &str) -> Option<u64> {
    let suffix = name.strip_prefix(OBJECT_KEY_PREFIX)?;
    if suffix.starts_with('+') {
        return None;
    }
    suffix.parse().ok()
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
