//! Append-only, hash-linked ledger for medchain.
//!
//! This crate is the heart of medchain. It provides:
//! - [`Block`]: immutable, self-verifying records chained by hash
//! - [`ValidationPolicy`]: linkage, position, hash and authorization checks
//!   deciding whether a candidate block may extend the chain
//! - [`AuthorizationPolicy`]: the pluggable actor/role check
//! - [`AccessGuard`]: serialized writers, consistent readers
//! - [`Ledger`]: the shared chain with `append`, `commit`, `snapshot` and `tail`
//! - [`Snapshot`]: a frozen view with full-chain integrity checks

pub mod block;
pub mod clock;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod policy;
pub mod snapshot;
pub mod validation;

pub use block::Block;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppendError, LedgerError, ValidationError};
pub use guard::{AccessGuard, LockPoisoned};
pub use ledger::Ledger;
pub use policy::{AllowRoles, AuthorizationDecision, AuthorizationPolicy, PermitAll};
pub use snapshot::{IntegrityReport, Snapshot};
pub use validation::ValidationPolicy;

/// The ledger as deployed: wallet updates on a medical-record chain.
pub type MedicalLedger = Ledger<medchain_types::Transaction>;
