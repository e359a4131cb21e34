use chrono::{DateTime, Utc};
use medchain_types::BlockHash;
use serde::Serialize;

/// Domain-separated BLAKE3 block hasher.
///
/// A block digest covers `(position, timestamp, payload, previous_hash)`.
/// Each field is written with a fixed width or a length prefix, so no two
/// distinct field tuples share an encoding:
///
/// ```text
/// domain ":" position:u64le secs:i64le nanos:u32le len:u64le payload previous:[u8; 32]
/// ```
///
/// The domain tag keeps block digests apart from any other BLAKE3 use in
/// the system.
pub struct HashCodec {
    domain: &'static str,
}

impl HashCodec {
    /// Codec for ledger blocks.
    pub const BLOCK: Self = Self {
        domain: "medchain-block-v1",
    };

    /// Create a codec with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Canonical encoding of a payload.
    ///
    /// The value is lowered to a JSON tree first, which sorts object keys, so
    /// two logically equal payloads encode identically regardless of field
    /// declaration or map insertion order.
    pub fn serialize<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, CodecError> {
        let value =
            serde_json::to_value(payload).map_err(|e| CodecError::Serialization(e.to_string()))?;
        serde_json::to_vec(&value).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Digest over a block's canonical fields.
    pub fn digest(
        &self,
        position: u64,
        timestamp: &DateTime<Utc>,
        payload: &[u8],
        previous_hash: &BlockHash,
    ) -> BlockHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(&position.to_le_bytes());
        hasher.update(&timestamp.timestamp().to_le_bytes());
        hasher.update(&timestamp.timestamp_subsec_nanos().to_le_bytes());
        hasher.update(&(payload.len() as u64).to_le_bytes());
        hasher.update(payload);
        hasher.update(previous_hash.as_bytes());
        BlockHash::from_bytes(*hasher.finalize().as_bytes())
    }

    /// Serialize `payload` and digest it together with the other fields.
    pub fn hash_block<T: Serialize + ?Sized>(
        &self,
        position: u64,
        timestamp: &DateTime<Utc>,
        payload: &T,
        previous_hash: &BlockHash,
    ) -> Result<BlockHash, CodecError> {
        let bytes = Self::serialize(payload)?;
        Ok(self.digest(position, timestamp, &bytes, previous_hash))
    }

    /// The domain tag used by this codec.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from encoding operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload cannot be canonically serialized: {0}")]
    Serialization(String),
}
