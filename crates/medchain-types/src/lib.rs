//! Foundation types for medchain.
//!
//! Every other medchain crate depends on `medchain-types`.
//!
//! # Key Types
//!
//! - [`Transaction`]: One wallet update, the payload carried by every block
//! - [`MedicalRecord`]: A patient's record, addressed by a [`WalletAddress`]
//! - [`BlockHash`]: 256-bit block digest, exported as hex
//! - [`Attributed`]: Actor/role accessors consumed by authorization policies

pub mod error;
pub mod hash;
pub mod record;
pub mod wallet;

pub use error::TypeError;
pub use hash::BlockHash;
pub use record::{Attributed, Transaction};
pub use wallet::{MedicalRecord, WalletAddress};
