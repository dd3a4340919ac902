/// Constants used throughout the keepsake codebase
// Application directory name under the XDG base directories
pub const APP_DIR_NAME: &str = "keepsake";

// Fixed storage name of the persisted cache index
pub const INDEX_NAME: &str = "cachemanager";

// Prefix of every minted storage key ("object.<n>")
pub const OBJECT_KEY_PREFIX: &str = "object.";

// Environment variable names
pub const KEEPSAKE_CACHE_DIR_VAR: &str = "KEEPSAKE_CACHE_DIR";
pub const KEEPSAKE_COMPRESSION_VAR: &str = "KEEPSAKE_COMPRESSION";
pub const KEEPSAKE_CODEC_VAR: &str = "KEEPSAKE_CODEC";
pub const KEEPSAKE_LOG_VAR: &str = "KEEPSAKE_LOG";
