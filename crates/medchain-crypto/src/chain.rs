use std::sync::Arc;

use medchain_types::BlockHash;

use crate::codec::CodecError;

/// Trait for objects that participate in a hash chain.
pub trait ChainLink {
    /// Logical position in the chain (genesis is 0).
    fn position(&self) -> u64;
    /// The link's own stored hash.
    fn block_hash(&self) -> BlockHash;
    /// The stored hash of the predecessor ([`BlockHash::ZERO`] for genesis).
    fn previous_hash(&self) -> BlockHash;
    /// Recompute the hash from the link's stored fields.
    fn recompute_hash(&self) -> Result<BlockHash, CodecError>;
}

impl<L: ChainLink + ?Sized> ChainLink for Arc<L> {
    fn position(&self) -> u64 {
        (**self).position()
    }
    fn block_hash(&self) -> BlockHash {
        (**self).block_hash()
    }
    fn previous_hash(&self) -> BlockHash {
        (**self).previous_hash()
    }
    fn recompute_hash(&self) -> Result<BlockHash, CodecError> {
        (**self).recompute_hash()
    }
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of blocks forms a valid hash chain:
/// the first block is anchored on the genesis sentinel, each block's
/// previous hash matches its predecessor's hash, positions advance by
/// exactly one, and each block's hash is correctly computed from its fields.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, stopping at the first violation.
    ///
    /// For each block the checks run in order: linkage, position, hash.
    pub fn verify_chain<L: ChainLink>(links: &[L]) -> Result<(), ChainError> {
        match Self::check(links, true).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Verify a chain and collect every violation.
    pub fn report<L: ChainLink>(links: &[L]) -> Vec<ChainError> {
        Self::check(links, false)
    }

    fn check<L: ChainLink>(links: &[L], stop_at_first: bool) -> Vec<ChainError> {
        let mut violations = Vec::new();

        for (index, link) in links.iter().enumerate() {
            let before = violations.len();

            match index.checked_sub(1).map(|i| &links[i]) {
                None => {
                    if link.position() != 0 || !link.previous_hash().is_zero() {
                        violations.push(ChainError::GenesisNotAnchored {
                            position: link.position(),
                        });
                    }
                }
                Some(prev) => {
                    if link.previous_hash() != prev.block_hash() {
                        violations.push(ChainError::BrokenLink {
                            position: link.position(),
                        });
                    }
                    match prev.position().checked_add(1) {
                        Some(expected) if link.position() == expected => {}
                        Some(expected) => violations.push(ChainError::PositionGap {
                            expected,
                            found: link.position(),
                        }),
                        None => violations.push(ChainError::PositionOverflow {
                            position: link.position(),
                        }),
                    }
                }
            }

            match link.recompute_hash() {
                Ok(computed) if computed == link.block_hash() => {}
                Ok(_) => violations.push(ChainError::HashMismatch {
                    position: link.position(),
                }),
                Err(e) => violations.push(ChainError::Codec {
                    position: link.position(),
                    reason: e.to_string(),
                }),
            }

            if stop_at_first && violations.len() > before {
                violations.truncate(before + 1);
                break;
            }
        }

        violations
    }
}

/// Errors from chain verification.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("first block at position {position} is not anchored on the genesis sentinel")]
    GenesisNotAnchored { position: u64 },

    #[error("broken link at position {position}: previous hash does not match predecessor")]
    BrokenLink { position: u64 },

    #[error("position gap: expected {expected}, found {found}")]
    PositionGap { expected: u64, found: u64 },

    #[error("block at position {position} follows a predecessor at the last representable position")]
    PositionOverflow { position: u64 },

    #[error("hash mismatch at position {position}: computed hash differs from stored")]
    HashMismatch { position: u64 },

    #[error("cannot re-encode block at position {position}: {reason}")]
    Codec { position: u64, reason: String },
}

impl ChainError {
    /// Position of the block the violation was found at.
    pub fn position(&self) -> u64 {
        match self {
            Self::GenesisNotAnchored { position }
            | Self::BrokenLink { position }
            | Self::PositionOverflow { position }
            | Self::HashMismatch { position }
            | Self::Codec { position, .. } => *position,
            Self::PositionGap { found, .. } => *found,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::codec::HashCodec;

    /// Test link for chain verification.
    struct TestBlock {
        position: u64,
        hash: BlockHash,
        prev: BlockHash,
        payload: Vec<u8>,
    }

    impl TestBlock {
        fn compute(position: u64, payload: &[u8], prev: BlockHash) -> BlockHash {
            let t = Utc.timestamp_opt(1_000, 0).unwrap();
            HashCodec::BLOCK.digest(position, &t, payload, &prev)
        }
    }

    impl ChainLink for TestBlock {
        fn position(&self) -> u64 {
            self.position
        }
        fn block_hash(&self) -> BlockHash {
            self.hash
        }
        fn previous_hash(&self) -> BlockHash {
            self.prev
        }
        fn recompute_hash(&self) -> Result<BlockHash, CodecError> {
            Ok(Self::compute(self.position, &self.payload, self.prev))
        }
    }

    fn build_chain(count: u64) -> Vec<TestBlock> {
        let mut chain = Vec::new();
        let mut prev = BlockHash::ZERO;

        for position in 0..count {
            let payload = format!("block-{position}").into_bytes();
            let hash = TestBlock::compute(position, &payload, prev);
            chain.push(TestBlock {
                position,
                hash,
                prev,
                payload,
            });
            prev = hash;
        }

        chain
    }

    #[test]
    fn empty_chain_is_valid() {
        let chain: Vec<TestBlock> = vec![];
        assert!(HashChainVerifier::verify_chain(&chain).is_ok());
    }

    #[test]
    fn multi_block_chain() {
        let chain = build_chain(10);
        assert!(HashChainVerifier::verify_chain(&chain).is_ok());
        assert!(HashChainVerifier::report(&chain).is_empty());
    }

    #[test]
    fn genesis_must_use_sentinel() {
        let mut chain = build_chain(1);
        chain[0].prev = BlockHash::from_bytes([1; 32]);
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::GenesisNotAnchored { position: 0 });
    }

    #[test]
    fn broken_link_detected() {
        let mut chain = build_chain(3);
        chain[2].prev = BlockHash::from_bytes([99; 32]);
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::BrokenLink { position: 2 });
    }

    #[test]
    fn position_gap_detected() {
        let mut chain = build_chain(3);
        chain.remove(1);
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        // Removing a block breaks the link first.
        assert_eq!(err, ChainError::BrokenLink { position: 2 });

        let report = HashChainVerifier::report(&chain);
        assert!(report.contains(&ChainError::PositionGap {
            expected: 1,
            found: 2
        }));
    }

    #[test]
    fn successor_of_max_position_is_reported() {
        let mut chain = build_chain(2);
        chain[0].position = u64::MAX;
        let report = HashChainVerifier::report(&chain);
        assert!(report.contains(&ChainError::GenesisNotAnchored { position: u64::MAX }));
        assert!(report.contains(&ChainError::PositionOverflow { position: 1 }));

        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::GenesisNotAnchored { position: u64::MAX });
    }

    #[test]
    fn tampered_payload_detected() {
        let mut chain = build_chain(3);
        chain[1].payload = b"tampered".to_vec();
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::HashMismatch { position: 1 });
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn report_collects_every_violation() {
        let mut chain = build_chain(4);
        chain[1].payload = b"x".to_vec();
        chain[3].payload = b"y".to_vec();
        let report = HashChainVerifier::report(&chain);
        assert_eq!(
            report,
            vec![
                ChainError::HashMismatch { position: 1 },
                ChainError::HashMismatch { position: 3 },
            ]
        );
    }

    #[test]
    fn arc_links_verify() {
        let chain: Vec<Arc<TestBlock>> = build_chain(3).into_iter().map(Arc::new).collect();
        assert!(HashChainVerifier::verify_chain(&chain).is_ok());
    }
}
