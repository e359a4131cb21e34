use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::block::Block;
use crate::clock::{Clock, SystemClock};
use crate::error::{AppendError, LedgerError, ValidationError};
use crate::guard::AccessGuard;
use crate::policy::{AuthorizationPolicy, PermitAll};
use crate::snapshot::{IntegrityReport, Snapshot};
use crate::validation::ValidationPolicy;

/// The committed block sequence. Never empty: genesis is placed at
/// construction.
struct Chain<P> {
    blocks: Vec<Arc<Block<P>>>,
    tail: Arc<Block<P>>,
}

impl<P> Chain<P> {
    fn new(genesis: Block<P>) -> Self {
        let genesis = Arc::new(genesis);
        Self {
            blocks: vec![Arc::clone(&genesis)],
            tail: genesis,
        }
    }

    fn push(&mut self, block: Block<P>) -> Arc<Block<P>> {
        let block = Arc::new(block);
        self.blocks.push(Arc::clone(&block));
        self.tail = Arc::clone(&block);
        block
    }
}

/// Append-only, hash-linked ledger.
///
/// One instance is built at startup and shared by handle
/// (`Arc<Ledger<P>>`) with everything that reads or writes it. All access goes
/// through an [`AccessGuard`]: appends are serialized against each other, and
/// reads see a block either fully committed or not at all.
pub struct Ledger<P> {
    chain: AccessGuard<Chain<P>>,
    policy: ValidationPolicy<P>,
    clock: Box<dyn Clock>,
}

impl<P: Serialize> Ledger<P> {
    /// A ledger that authorizes every payload and stamps blocks with wall-clock
    /// time.
    pub fn new(genesis: P) -> Result<Self, ValidationError> {
        Self::with_policy(genesis, PermitAll, SystemClock)
    }

    pub fn with_policy(
        genesis: P,
        authorization: impl AuthorizationPolicy<P> + 'static,
        clock: impl Clock + 'static,
    ) -> Result<Self, ValidationError> {
        let genesis = Block::genesis(genesis, &clock)?;
        debug!(hash = %genesis.hash(), "ledger created");
        Ok(Self {
            chain: AccessGuard::new(Chain::new(genesis)),
            policy: ValidationPolicy::new(authorization),
            clock: Box::new(clock),
        })
    }

    /// Chain `payload` onto the current tail.
    ///
    /// Reading the tail, building the block, validating it and committing it
    /// happen under one exclusive lock, so concurrent appends each land on a
    /// distinct position. On error nothing is committed.
    pub fn append(&self, payload: P) -> Result<Arc<Block<P>>, AppendError> {
        let result = self.chain.write(|chain| {
            let candidate = Block::next(&chain.tail, payload, self.clock.as_ref())?;
            self.policy.is_valid_successor(&candidate, &chain.tail)?;
            Ok::<_, ValidationError>(chain.push(candidate))
        })?;
        Self::log_outcome(result).map_err(AppendError::from)
    }

    /// Commit a block the caller built against some earlier tail.
    ///
    /// Fails with [`ValidationError::LinkageMismatch`] or
    /// [`ValidationError::PositionGap`] if the ledger has moved on since.
    pub fn commit(&self, candidate: Block<P>) -> Result<Arc<Block<P>>, AppendError> {
        let result = self.chain.write(|chain| {
            self.policy.is_valid_successor(&candidate, &chain.tail)?;
            Ok::<_, ValidationError>(chain.push(candidate))
        })?;
        Self::log_outcome(result).map_err(AppendError::from)
    }

    /// Full-chain integrity check over a consistent snapshot.
    pub fn audit(&self) -> Result<IntegrityReport, LedgerError> {
        Ok(self.snapshot()?.report())
    }

    /// Like [`audit`](Self::audit), failing on the first violation.
    pub fn verify(&self) -> Result<(), LedgerError> {
        self.snapshot()?.verify()?;
        Ok(())
    }

    fn log_outcome(
        result: Result<Arc<Block<P>>, ValidationError>,
    ) -> Result<Arc<Block<P>>, ValidationError> {
        match &result {
            Ok(block) => {
                debug!(position = block.position(), hash = %block.hash(), "block committed")
            }
            Err(err) => warn!(error = %err, "block rejected"),
        }
        result
    }
}

impl<P> Ledger<P> {
    /// Every committed block, genesis first, as of one instant.
    pub fn snapshot(&self) -> Result<Snapshot<P>, LedgerError> {
        Ok(self
            .chain
            .read(|chain| Snapshot::new(chain.blocks.clone()))?)
    }

    /// The most recently committed block.
    pub fn tail(&self) -> Result<Arc<Block<P>>, LedgerError> {
        Ok(self.chain.read(|chain| Arc::clone(&chain.tail))?)
    }

    /// Number of committed blocks, genesis included.
    pub fn height(&self) -> Result<u64, LedgerError> {
        Ok(self.chain.read(|chain| chain.blocks.len() as u64)?)
    }
}
