//! Value encoding for cached objects
//!
//! Any `serde` type can be cached. JSON is the default because it is
//! self-describing and round-trips dynamic values such as
//! `serde_json::Value`; bincode is compact but requires the reader to know
//! the exact type that was written.

use crate::errors::{CacheError, RecoveryHint, Result, SerializationOp};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoding applied to cached values before they reach the storage backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Json,
    Bincode,
}

impl Codec {
    /// Encode a value
    pub fn encode<V: Serialize + ?Sized>(self, key: &str, value: &V) -> Result<Vec<u8>> {
        match self {
            Self::Json => serde_json::to_vec(value).map_err(|e| encode_error(key, e)),
            Self::Bincode => bincode::serialize(value).map_err(|e| encode_error(key, e)),
        }
    }

    /// Decode a value previously produced by [`Codec::encode`]
    pub fn decode<V: DeserializeOwned>(self, key: &str, bytes: &[u8]) -> Result<V> {
        match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| decode_error(key, e)),
            Self::Bincode => bincode::deserialize(bytes).map_err(|e| decode_error(key, e)),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Bincode => f.write_str("bincode"),
        }
    }
}

impl FromStr for Codec {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "bincode" => Ok(Self::Bincode),
            other => Err(CacheError::Configuration {
                message: format!("unknown codec '{other}', expected 'json' or 'bincode'"),
                recovery_hint: RecoveryHint::UpdateConfiguration,
            }),
        }
    }
}

fn encode_error<E>(key: &str, source: E) -> CacheError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    CacheError::Serialization {
        key: key.to_string(),
        operation: SerializationOp::Encode,
        source: source.into(),
        recovery_hint: RecoveryHint::Manual {
            instructions: "Check that the value type is serializable".to_string(),
        },
    }
}

fn decode_error<E>(key: &str, source: E) -> CacheError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    CacheError::Serialization {
        key: key.to_string(),
        operation: SerializationOp::Decode,
        source: source.into(),
        recovery_hint: RecoveryHint::ClearAndRetry,
    }
}
