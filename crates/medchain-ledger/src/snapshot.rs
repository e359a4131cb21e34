use std::sync::Arc;

use medchain_crypto::{ChainError, HashChainVerifier};
use serde::{Serialize, Serializer};

use crate::block::Block;

/// A frozen, consistent view of the ledger at one point in time.
///
/// Blocks are shared with the live ledger, which never mutates a committed
/// block, so a snapshot costs one pointer per block. Serializes as a JSON
/// array of exported blocks, genesis first.
#[derive(Debug)]
pub struct Snapshot<P> {
    blocks: Vec<Arc<Block<P>>>,
}

impl<P> Clone for Snapshot<P> {
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks.clone(),
        }
    }
}

impl<P> Snapshot<P> {
    pub(crate) fn new(blocks: Vec<Arc<Block<P>>>) -> Self {
        Self { blocks }
    }

    /// Wrap blocks obtained elsewhere (e.g. an imported dump) for checking.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block<P>>) -> Self {
        Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Arc<Block<P>>] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block<P>> {
        self.blocks.iter().map(AsRef::as_ref)
    }

    /// Block at `position`, if the snapshot reaches that far.
    pub fn get(&self, position: u64) -> Option<&Arc<Block<P>>> {
        usize::try_from(position)
            .ok()
            .and_then(|i| self.blocks.get(i))
    }

    pub fn genesis(&self) -> Option<&Arc<Block<P>>> {
        self.blocks.first()
    }

    pub fn tail(&self) -> Option<&Arc<Block<P>>> {
        self.blocks.last()
    }
}

impl<P: Serialize> Snapshot<P> {
    /// Check the whole chain and stop at the first violation.
    pub fn verify(&self) -> Result<(), ChainError> {
        HashChainVerifier::verify_chain(&self.blocks)
    }

    /// Check the whole chain and collect every violation.
    pub fn report(&self) -> IntegrityReport {
        IntegrityReport {
            height: self.blocks.len() as u64,
            violations: HashChainVerifier::report(&self.blocks),
        }
    }
}

impl<P: Serialize> Serialize for Snapshot<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Result of a full-chain integrity check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrityReport {
    pub height: u64,
    pub violations: Vec<ChainError>,
}

impl IntegrityReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn hash_chain_valid(&self) -> bool {
        !self.violations.iter().any(|v| {
            matches!(
                v,
                ChainError::BrokenLink { .. } | ChainError::GenesisNotAnchored { .. }
            )
        })
    }

    pub fn positions_contiguous(&self) -> bool {
        !self
            .violations
            .iter()
            .any(|v| {
                matches!(
                    v,
                    ChainError::PositionGap { .. } | ChainError::PositionOverflow { .. }
                )
            })
    }

    pub fn hashes_consistent(&self) -> bool {
        !self.violations.iter().any(|v| {
            matches!(
                v,
                ChainError::HashMismatch { .. } | ChainError::Codec { .. }
            )
        })
    }
}
