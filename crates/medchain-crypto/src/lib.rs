//! Hashing primitives for medchain.
//!
//! Provides canonical payload encoding, domain-separated BLAKE3 block
//! digests, and hash chain verification.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod chain;
pub mod codec;

pub use chain::{ChainError, ChainLink, HashChainVerifier};
pub use codec::{CodecError, HashCodec};
