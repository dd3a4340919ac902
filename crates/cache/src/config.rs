//! Cache configuration with environment overrides
use crate::codec::Codec;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::storage::CompressionConfig;
use keepsake_core::{
    INDEX_NAME, KEEPSAKE_CACHE_DIR_VAR, KEEPSAKE_CODEC_VAR, KEEPSAKE_COMPRESSION_VAR,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Configuration of a [`CacheManager`](crate::CacheManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Storage directory; `None` resolves the XDG data directory on every access
    pub base_dir: Option<PathBuf>,
    /// Compression applied to stored payloads
    pub compression: CompressionConfig,
    /// Encoding of cached values
    pub codec: Codec,
    /// Storage name of the persisted index
    pub index_name: String,
    /// Where the configuration came from
    #[serde(skip, default)]
    pub source: ConfigSource,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            compression: CompressionConfig::default(),
            codec: Codec::default(),
            index_name: INDEX_NAME.to_string(),
            source: ConfigSource::Default,
        }
    }
}

/// Source of configuration for debugging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    #[default]
    Default,
    /// Environment variables that overrode a default, in the order applied
    EnvironmentVariables(Vec<String>),
    /// Built in code
    Builder,
}

impl CacheConfig {
    /// Defaults with environment overrides; invalid values are logged and ignored
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let mut applied = Vec::new();
        for (var, apply) in OVERRIDES {
            let Ok(raw) = env::var(var) else {
                continue;
            };
            match apply(&mut config, &raw) {
                Ok(()) => applied.push(var.to_string()),
                Err(e) => {
                    tracing::warn!(variable = var, error = %e, "ignoring invalid cache setting");
                }
            }
        }
        config.record_env_source(applied);
        config
    }

    /// Defaults with environment overrides; the first invalid value is an error
    pub fn try_from_env() -> Result<Self> {
        let mut config = Self::default();
        let mut applied = Vec::new();
        for (var, apply) in OVERRIDES {
            let Ok(raw) = env::var(var) else {
                continue;
            };
            apply(&mut config, &raw)?;
            applied.push(var.to_string());
        }
        config.record_env_source(applied);
        Ok(config)
    }

    fn record_env_source(&mut self, applied: Vec<String>) {
        if !applied.is_empty() {
            self.source = ConfigSource::EnvironmentVariables(applied);
        }
    }
}

type Override = fn(&mut CacheConfig, &str) -> Result<()>;

const OVERRIDES: [(&str, Override); 3] = [
    (KEEPSAKE_CACHE_DIR_VAR, apply_cache_dir),
    (KEEPSAKE_COMPRESSION_VAR, apply_compression),
    (KEEPSAKE_CODEC_VAR, apply_codec),
];

fn apply_cache_dir(config: &mut CacheConfig, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(invalid(KEEPSAKE_CACHE_DIR_VAR, raw, "must not be empty"));
    }
    config.base_dir = Some(PathBuf::from(raw));
    Ok(())
}

fn apply_compression(config: &mut CacheConfig, raw: &str) -> Result<()> {
    config.compression.enabled = parse_bool(raw).ok_or_else(|| {
        invalid(KEEPSAKE_COMPRESSION_VAR, raw, "expected on/off, true/false or 1/0")
    })?;
    Ok(())
}

fn apply_codec(config: &mut CacheConfig, raw: &str) -> Result<()> {
    config.codec = raw.parse()?;
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn invalid(var: &str, raw: &str, reason: &str) -> CacheError {
    CacheError::Configuration {
        message: format!("{var}='{raw}': {reason}"),
        recovery_hint: RecoveryHint::UpdateConfiguration,
    }
}

/// Builder for creating cache configurations
#[derive(Debug)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CacheConfig {
                source: ConfigSource::Builder,
                ..CacheConfig::default()
            },
        }
    }

    /// Set storage directory
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(base_dir.into());
        self
    }

    /// Set compression settings
    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.config.compression = compression;
        self
    }

    /// Set value codec
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.config.codec = codec;
        self
    }

    /// Set the storage name of the persisted index
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_name = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
