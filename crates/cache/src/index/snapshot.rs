use super::key::StorageKey;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted form of the cache index
///
/// Both fields default when absent so that an index written without a
/// mapping still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    #[serde(default)]
    pub max_assigned_id: u64,
    #[serde(default)]
    pub location_by_identifier: BTreeMap<String, StorageKey>,
}

impl IndexSnapshot {
    pub fn to_json(&self, name: &str) -> Result<Vec<u8>> {
        crate::codec::Codec::Json.encode(name, self)
    }

    pub fn from_json(name: &str, bytes: &[u8]) -> Result<Self> {
        crate::codec::Codec::Json.decode(name, bytes)
    }
}
