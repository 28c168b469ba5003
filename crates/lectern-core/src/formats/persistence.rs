//! # Record Format
//!
//! Binary encoding for every value the deck store writes.
//!
//! Format: Header (5 bytes) + postcard-serialized payload.
//! - 4 bytes: Magic ("LECT")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded, so a
//! corrupted or foreign value surfaces as `InvalidRecord` instead of a
//! giant allocation or a garbage slide.

use crate::{LecternError, primitives};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Header length in bytes.
const HEADER_LEN: usize = 5;

// =============================================================================
// RECORD HEADER
// =============================================================================

/// The header that precedes every stored payload.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl RecordHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), LecternError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(LecternError::InvalidRecord("Invalid magic bytes".to_string()));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(LecternError::InvalidRecord(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LecternError> {
        if bytes.len() < HEADER_LEN {
            return Err(LecternError::InvalidRecord("Header too short".to_string()));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for RecordHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a value as header + postcard payload.
pub fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>, LecternError> {
    let payload = postcard::to_stdvec(value)
        .map_err(|e| LecternError::SerializationError(e.to_string()))?;

    if payload.len() > primitives::MAX_RECORD_SIZE {
        return Err(LecternError::SerializationError(format!(
            "Record of {} bytes exceeds maximum {} bytes",
            payload.len(),
            primitives::MAX_RECORD_SIZE
        )));
    }

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&RecordHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a value written by [`encode_record`].
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LecternError> {
    if bytes.len() < HEADER_LEN {
        return Err(LecternError::InvalidRecord(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > primitives::MAX_RECORD_SIZE + HEADER_LEN {
        return Err(LecternError::InvalidRecord(format!(
            "Record size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            primitives::MAX_RECORD_SIZE
        )));
    }

    let header = RecordHeader::from_bytes(bytes)?;
    header.validate()?;

    postcard::from_bytes(&bytes[HEADER_LEN..])
        .map_err(|e| LecternError::SerializationError(format!("Failed to decode record: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
