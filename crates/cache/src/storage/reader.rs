//! Unframing of payloads read from disk
//!
//! Verifies checksums and decompresses.

use super::format::StorageHeader;
use crate::errors::{CacheError, RecoveryHint, Result};
use crc32c::crc32c;
use zstd::stream::decode_all as zstd_decode;

/// Recover the original payload from bytes produced by [`super::writer::frame`]
pub fn unframe(key: &str, file_data: &[u8]) -> Result<Vec<u8>> {
    let header = StorageHeader::decode(key, file_data)?;
    let header_size = StorageHeader::encoded_len();

    if file_data.len() < header_size {
        return Err(CacheError::Corruption {
            key: key.to_string(),
            reason: "File too small for header".to_string(),
            recovery_hint: RecoveryHint::ClearAndRetry,
        });
    }
    let data = &file_data[header_size..];

    if data.len() as u64 != header.stored_size() {
        return Err(CacheError::Corruption {
            key: key.to_string(),
            reason: format!(
                "Payload length mismatch: expected {}, got {}",
                header.stored_size(),
                data.len()
            ),
            recovery_hint: RecoveryHint::ClearAndRetry,
        });
    }

    let actual_crc = crc32c(data);
    if actual_crc != header.data_crc() {
        return Err(CacheError::Corruption {
            key: key.to_string(),
            reason: format!(
                "Data CRC mismatch: expected {:08x}, got {:08x}",
                header.data_crc(),
                actual_crc
            ),
            recovery_hint: RecoveryHint::ClearAndRetry,
        });
    }

    if !header.is_compressed() {
        return Ok(data.to_vec());
    }

    let decompressed = zstd_decode(data).map_err(|e| CacheError::Compression {
        operation: "decompress",
        source: Box::new(e),
        recovery_hint: RecoveryHint::ClearAndRetry,
    })?;

    if decompressed.len() as u64 != header.uncompressed_size() {
        return Err(CacheError::Corruption {
            key: key.to_string(),
            reason: format!(
                "Decompressed length mismatch: expected {}, got {}",
                header.uncompressed_size(),
                decompressed.len()
            ),
            recovery_hint: RecoveryHint::ClearAndRetry,
        });
    }

    Ok(decompressed)
}
