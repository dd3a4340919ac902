//! On-disk format for stored objects
//!
//! Every file written by the [`FileStore`](super::FileStore) starts with a
//! bincode-encoded [`StorageHeader`] followed by the (optionally
//! zstd-compressed) payload.

use crate::errors::{CacheError, RecoveryHint, Result, SerializationOp};
use crc32c::crc32c;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Magic number for stored objects: "KSKP"
pub const STORAGE_MAGIC: u32 = 0x4B53_4B50;

/// Current storage format version
pub const STORAGE_VERSION: u16 = 1;

/// Default zstd compression level (3 = fast with good compression)
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Binary header written in front of every stored payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct StorageHeader {
    /// Magic number for validation
    magic: u32,
    /// Storage format version
    version: u16,
    /// Flags (bit 0: compressed)
    flags: u16,
    /// CRC32C of the header (computed with this field zeroed)
    header_crc: u32,
    /// Seconds since the Unix epoch when written
    timestamp: u64,
    /// Payload size before compression
    uncompressed_size: u64,
    /// Payload size as stored
    stored_size: u64,
    /// CRC32C of the stored payload
    data_crc: u32,
}

impl StorageHeader {
    const FLAG_COMPRESSED: u16 = 1 << 0;

    pub fn new(uncompressed_size: u64, stored_size: u64, data_crc: u32, compressed: bool) -> Self {
        let mut header = Self {
            magic: STORAGE_MAGIC,
            version: STORAGE_VERSION,
            flags: if compressed { Self::FLAG_COMPRESSED } else { 0 },
            header_crc: 0,
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            uncompressed_size,
            stored_size,
            data_crc,
        };

        header.header_crc = header.calculate_crc();
        header
    }

    /// Serialized size of a header
    pub fn encoded_len() -> usize {
        // Fixed-width fields only, so any header has the same length
        bincode::serialized_size(&Self::new(0, 0, 0, false)).unwrap_or(0) as usize
    }

    fn calculate_crc(&self) -> u32 {
        let mut temp = *self;
        temp.header_crc = 0;

        match bincode::serialize(&temp) {
            Ok(bytes) => crc32c(&bytes),
            Err(_) => 0,
        }
    }

    pub fn encode(&self, key: &str) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| CacheError::Serialization {
            key: key.to_string(),
            operation: SerializationOp::Encode,
            source: e,
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check header serialization".to_string(),
            },
        })
    }

    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self> {
        let header: Self = bincode::deserialize(bytes).map_err(|e| CacheError::Serialization {
            key: key.to_string(),
            operation: SerializationOp::Decode,
            source: e,
            recovery_hint: RecoveryHint::ClearAndRetry,
        })?;
        header.validate().map_err(|e| e.with_key(key))?;
        Ok(header)
    }

    pub fn validate(&self) -> Result<()> {
        if self.magic != STORAGE_MAGIC {
            return Err(CacheError::Corruption {
                key: String::new(),
                reason: format!(
                    "Invalid magic number: expected {:08x}, got {:08x}",
                    STORAGE_MAGIC, self.magic
                ),
                recovery_hint: RecoveryHint::ClearAndRetry,
            });
        }

        if self.version > STORAGE_VERSION {
            return Err(CacheError::Corruption {
                key: String::new(),
                reason: format!("Unsupported storage version: {}", self.version),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Upgrade keepsake to read this cache".to_string(),
                },
            });
        }

        let expected_crc = self.calculate_crc();
        if self.header_crc != expected_crc {
            return Err(CacheError::Corruption {
                key: String::new(),
                reason: format!(
                    "Header CRC mismatch: expected {:08x}, got {:08x}",
                    expected_crc, self.header_crc
                ),
                recovery_hint: RecoveryHint::ClearAndRetry,
            });
        }

        Ok(())
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & Self::FLAG_COMPRESSED != 0
    }

    pub fn data_crc(&self) -> u32 {
        self.data_crc
    }

    pub fn stored_size(&self) -> u64 {
        self.stored_size
    }

    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip_validates() {
        let header = StorageHeader::new(100, 40, 0xdead_beef, true);
        let bytes = header.encode("object.1").unwrap();
        assert_eq!(bytes.len(), StorageHeader::encoded_len());

        let decoded = StorageHeader::decode("object.1", &bytes).unwrap();
        assert_eq!(decoded, header);
        assert!(decoded.is_compressed());
        assert_eq!(decoded.stored_size(), 40);
    }

    #[test]
    fn test_tampered_header_is_rejected() {
        let header = StorageHeader::new(10, 10, 1, false);
        let mut bytes = header.encode("object.1").unwrap();
        // Flip a bit inside the uncompressed size field
        bytes[20] ^= 0x01;

        match StorageHeader::decode("object.1", &bytes) {
            Err(CacheError::Corruption { key, reason, .. }) => {
                assert_eq!(key, "object.1");
                assert!(reason.contains("Header CRC mismatch"));
            }
            other => panic!("expected corruption, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let bytes = vec![0u8; StorageHeader::encoded_len()];
        let err = StorageHeader::decode("cachemanager", &bytes).unwrap_err();
        assert!(err.is_corruption());
        assert!(err.to_string().contains("Invalid magic number"));
    }

    #[test]
    fn test_truncated_header_is_a_decode_error() {
        let err = StorageHeader::decode("object.9", &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            CacheError::Serialization {
                operation: SerializationOp::Decode,
                ..
            }
        ));
    }
}
