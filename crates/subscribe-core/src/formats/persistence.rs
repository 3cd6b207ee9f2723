//! # Persistence Format
//!
//! Binary encoding for catalog snapshots.
//!
//! Format: Header (5 bytes) + postcard-serialized `CatalogSnapshot`.
//! - 4 bytes: Magic ("SUBS")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded.

use super::CatalogSnapshot;
use crate::{SubscribeError, primitives};

/// Maximum accepted size of an encoded snapshot.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 256 * 1024 * 1024; // 256 MB

const HEADER_LEN: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// Header that precedes every encoded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Check magic bytes and version.
    pub fn validate(&self) -> Result<(), SubscribeError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(SubscribeError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(SubscribeError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Encode as magic bytes followed by the version.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Decode the header from the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SubscribeError> {
        let Some((magic, rest)) = bytes.split_first_chunk::<4>() else {
            return Err(SubscribeError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        let Some(&version) = rest.first() else {
            return Err(SubscribeError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        Ok(Self {
            magic: *magic,
            version,
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Encode a snapshot as header + payload.
pub fn snapshot_to_bytes(snapshot: &CatalogSnapshot) -> Result<Vec<u8>, SubscribeError> {
    let payload = postcard::to_stdvec(snapshot)
        .map_err(|e| SubscribeError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_LEN + payload.len());
    result.extend_from_slice(&PersistenceHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Decode a snapshot produced by [`snapshot_to_bytes`].
///
/// Rejects oversized input and foreign or future headers before touching
/// the payload.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<CatalogSnapshot, SubscribeError> {
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(SubscribeError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = bytes.get(HEADER_LEN..).unwrap_or_default();
    postcard::from_bytes(payload).map_err(|e| {
        SubscribeError::DeserializationError(format!("Failed to decode snapshot: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
