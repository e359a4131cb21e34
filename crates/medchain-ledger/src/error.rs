use medchain_crypto::{ChainError, CodecError};
use medchain_types::BlockHash;

use crate::guard::LockPoisoned;

/// Reasons a candidate block may not extend the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("linkage mismatch: candidate links to {found:?}, tail is {expected:?}")]
    LinkageMismatch {
        expected: BlockHash,
        found: BlockHash,
    },

    #[error("position gap: expected {expected}, found {found}")]
    PositionGap { expected: u64, found: u64 },

    #[error("no position follows {position}")]
    PositionExhausted { position: u64 },

    #[error("hash mismatch at position {position}: stored hash does not match block contents")]
    HashMismatch { position: u64 },

    #[error("authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("serialization failure: {0}")]
    SerializationFailure(String),
}

impl ValidationError {
    /// Linkage and position errors come from a stale tail and clear up when
    /// the append is retried against the current one.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LinkageMismatch { .. } | Self::PositionGap { .. })
    }
}

impl From<CodecError> for ValidationError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Serialization(reason) => Self::SerializationFailure(reason),
        }
    }
}

/// Errors returned by [`Ledger::append`](crate::Ledger::append) and
/// [`Ledger::commit`](crate::Ledger::commit). The ledger is unchanged
/// whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppendError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Poisoned(#[from] LockPoisoned),
}

impl AppendError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Validation(v) if v.is_retryable())
    }

    /// The validation failure, if that is what this is.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            Self::Poisoned(_) => None,
        }
    }
}

/// Errors from read-side ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Poisoned(#[from] LockPoisoned),

    #[error("integrity violation: {0}")]
    Integrity(#[from] ChainError),
}
