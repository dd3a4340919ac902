//! Framing of payloads before they reach disk
//!
//! Handles compression and checksum generation.

use super::compression::CompressionConfig;
use super::format::StorageHeader;
use crate::errors::{CacheError, RecoveryHint, Result};
use crc32c::crc32c;
use zstd::stream::encode_all as zstd_encode;

/// Build the on-disk representation of `data`: header followed by payload
pub fn frame(key: &str, data: &[u8], compression: &CompressionConfig) -> Result<Vec<u8>> {
    let should_compress = compression.should_compress(data.len());

    let payload = if should_compress {
        match zstd_encode(data, compression.level) {
            Ok(compressed) => {
                tracing::trace!(
                    key,
                    original = data.len(),
                    compressed = compressed.len(),
                    "compressed payload"
                );
                compressed
            }
            Err(e) => {
                return Err(CacheError::Compression {
                    operation: "compress",
                    source: Box::new(e),
                    recovery_hint: RecoveryHint::Manual {
                        instructions: "Check compression settings".to_string(),
                    },
                });
            }
        }
    } else {
        data.to_vec()
    };

    let header = StorageHeader::new(
        data.len() as u64,
        payload.len() as u64,
        crc32c(&payload),
        should_compress,
    );
    let header_bytes = header.encode(key)?;

    let mut output = Vec::with_capacity(header_bytes.len() + payload.len());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}
