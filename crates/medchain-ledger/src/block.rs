use chrono::{DateTime, Utc};
use medchain_crypto::{ChainLink, CodecError, HashCodec};
use medchain_types::BlockHash;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::ValidationError;

/// An immutable, hash-linked ledger entry.
///
/// `hash` is the [`HashCodec::BLOCK`] digest of
/// `(position, timestamp, payload, previous_hash)` and is fixed at
/// construction. There are no mutators; a block that was altered after
/// construction (for example by editing an exported copy) fails
/// [`Block::verify_self`].
///
/// Exported shape: `{ position, data, timestamp, hash, previousHash }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block<P> {
    position: u64,
    #[serde(rename = "data")]
    payload: P,
    timestamp: DateTime<Utc>,
    hash: BlockHash,
    previous_hash: BlockHash,
}

impl<P: Serialize> Block<P> {
    /// Build the genesis block: position 0, anchored on [`BlockHash::ZERO`].
    pub fn genesis(payload: P, clock: &dyn Clock) -> Result<Self, ValidationError> {
        Self::seal(0, payload, clock.now(), BlockHash::ZERO)
    }

    /// Build the block that directly follows `predecessor`.
    pub fn next(
        predecessor: &Block<P>,
        payload: P,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        let position = predecessor.position.checked_add(1).ok_or(
            ValidationError::PositionExhausted {
                position: predecessor.position,
            },
        )?;
        Self::seal(position, payload, clock.now(), predecessor.hash)
    }

    pub(crate) fn seal(
        position: u64,
        payload: P,
        timestamp: DateTime<Utc>,
        previous_hash: BlockHash,
    ) -> Result<Self, ValidationError> {
        let hash = HashCodec::BLOCK.hash_block(position, &timestamp, &payload, &previous_hash)?;
        Ok(Self {
            position,
            payload,
            timestamp,
            hash,
            previous_hash,
        })
    }

    /// Recompute the digest from the stored fields.
    pub fn recompute_hash(&self) -> Result<BlockHash, CodecError> {
        HashCodec::BLOCK.hash_block(
            self.position,
            &self.timestamp,
            &self.payload,
            &self.previous_hash,
        )
    }

    /// Returns `true` if the stored hash matches the block's contents.
    pub fn verify_self(&self) -> bool {
        self.verify().is_ok()
    }

    /// Like [`verify_self`](Self::verify_self), reporting why it failed.
    pub fn verify(&self) -> Result<(), ValidationError> {
        if self.recompute_hash()? == self.hash {
            Ok(())
        } else {
            Err(ValidationError::HashMismatch {
                position: self.position,
            })
        }
    }
}

impl<P> Block<P> {
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }

    pub fn is_genesis(&self) -> bool {
        self.position == 0
    }
}

impl<P: Serialize> ChainLink for Block<P> {
    fn position(&self) -> u64 {
        self.position
    }
    fn block_hash(&self) -> BlockHash {
        self.hash
    }
    fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }
    fn recompute_hash(&self) -> Result<BlockHash, CodecError> {
        Block::recompute_hash(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use medchain_types::Transaction;
    use serde_json::Value;

    use super::*;
    use crate::clock::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap())
    }

    #[test]
    fn genesis_is_anchored_on_sentinel() {
        let g = Block::genesis(Transaction::genesis(), &clock()).unwrap();
        assert_eq!(g.position(), 0);
        assert_eq!(g.previous_hash(), BlockHash::ZERO);
        assert!(g.is_genesis());
        assert!(g.payload().is_genesis);
        assert!(g.verify_self());
    }

    #[test]
    fn next_links_to_predecessor() {
        let g = Block::genesis(Transaction::genesis(), &clock()).unwrap();
        let b = Block::next(&g, Transaction::update("w1", "k", "v"), &clock()).unwrap();
        assert_eq!(b.position(), 1);
        assert_eq!(b.previous_hash(), g.hash());
        assert_ne!(b.hash(), g.hash());
        assert!(!b.is_genesis());
        assert!(b.verify_self());
    }

    #[test]
    fn hashing_is_deterministic() {
        let g = Block::genesis(Transaction::genesis(), &clock()).unwrap();
        let a = Block::next(&g, Transaction::update("w1", "k", "v"), &clock()).unwrap();
        let b = Block::next(&g, Transaction::update("w1", "k", "v"), &clock()).unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.recompute_hash().unwrap(), a.hash());
    }

    #[test]
    fn field_tampering_is_detected() {
        let g = Block::genesis(Transaction::genesis(), &clock()).unwrap();
        let b = Block::next(&g, Transaction::update("w1", "k", "v"), &clock()).unwrap();

        let mut payload = b.clone();
        payload.payload.updated_value = "forged".into();
        assert_eq!(
            payload.verify(),
            Err(ValidationError::HashMismatch { position: 1 })
        );

        let mut position = b.clone();
        position.position = 7;
        assert!(!position.verify_self());

        let mut timestamp = b.clone();
        timestamp.timestamp = Utc.timestamp_opt(0, 0).unwrap();
        assert!(!timestamp.verify_self());

        let mut previous = b.clone();
        previous.previous_hash = BlockHash::from_bytes([7; 32]);
        assert!(!previous.verify_self());
    }

    #[test]
    fn exported_shape_uses_wire_names() {
        let g = Block::genesis(Transaction::genesis(), &clock()).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["position"], 0);
        assert_eq!(json["data"]["is_genesis"], true);
        assert_eq!(json["hash"], Value::String(g.hash().to_hex()));
        assert_eq!(json["previousHash"], Value::String("0".repeat(64)));
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn byte_level_tampering_of_export_is_detected() {
        let g = Block::genesis(Transaction::genesis(), &clock()).unwrap();
        let b = Block::next(&g, Transaction::update("w1", "allergies", "none"), &clock()).unwrap();

        let exported = serde_json::to_string(&b).unwrap();
        let intact: Block<Transaction> = serde_json::from_str(&exported).unwrap();
        assert!(intact.verify_self());
        assert_eq!(intact, b);

        let forged = exported.replace("none", "nuts");
        let forged: Block<Transaction> = serde_json::from_str(&forged).unwrap();
        assert!(!forged.verify_self());
    }

    #[test]
    fn next_after_last_position_is_rejected() {
        let last =
            Block::seal(u64::MAX, Transaction::genesis(), clock().0, BlockHash::ZERO).unwrap();
        let err = Block::next(&last, Transaction::update("w1", "k", "v"), &clock()).unwrap_err();
        assert_eq!(err, ValidationError::PositionExhausted { position: u64::MAX });
    }

    #[test]
    fn unserializable_payload_is_reported() {
        use std::collections::BTreeMap;

        let mut bad = BTreeMap::new();
        bad.insert((1u8, 2u8), "v");
        let err = Block::genesis(bad, &clock()).unwrap_err();
        assert!(matches!(err, ValidationError::SerializationFailure(_)));
    }
}
