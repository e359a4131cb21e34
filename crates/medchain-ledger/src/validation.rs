use serde::Serialize;

use crate::block::Block;
use crate::error::ValidationError;
use crate::policy::{AuthorizationDecision, AuthorizationPolicy, PermitAll};

/// Decides whether a candidate block may extend the ledger.
///
/// Checks run in a fixed order and the first failure is reported:
///
/// 1. linkage: `candidate.previous_hash == tail.hash`
/// 2. position: `candidate.position == tail.position + 1`
/// 3. self-consistency: the candidate's hash matches its contents
/// 4. authorization of the payload's actor
///
/// All four must pass for acceptance. None of them touches ledger state.
pub struct ValidationPolicy<P> {
    authorization: Box<dyn AuthorizationPolicy<P>>,
}

impl<P> ValidationPolicy<P> {
    pub fn new(authorization: impl AuthorizationPolicy<P> + 'static) -> Self {
        Self {
            authorization: Box::new(authorization),
        }
    }

    /// Structural checks only; every payload is authorized.
    pub fn permissive() -> Self {
        Self::new(PermitAll)
    }
}

impl<P> Default for ValidationPolicy<P> {
    fn default() -> Self {
        Self::permissive()
    }
}

impl<P: Serialize> ValidationPolicy<P> {
    pub fn is_valid_successor(
        &self,
        candidate: &Block<P>,
        tail: &Block<P>,
    ) -> Result<(), ValidationError> {
        check_linkage(candidate, tail)?;
        check_position(candidate, tail)?;
        candidate.verify()?;
        self.check_authorization(candidate.payload())
    }

    pub fn check_authorization(&self, payload: &P) -> Result<(), ValidationError> {
        match self.authorization.authorize(payload) {
            AuthorizationDecision::Permit => Ok(()),
            AuthorizationDecision::Deny { reason } => {
                Err(ValidationError::AuthorizationDenied { reason })
            }
        }
    }
}

pub fn check_linkage<P>(candidate: &Block<P>, tail: &Block<P>) -> Result<(), ValidationError> {
    if candidate.previous_hash() == tail.hash() {
        Ok(())
    } else {
        Err(ValidationError::LinkageMismatch {
            expected: tail.hash(),
            found: candidate.previous_hash(),
        })
    }
}

pub fn check_position<P>(candidate: &Block<P>, tail: &Block<P>) -> Result<(), ValidationError> {
    let expected = tail
        .position()
        .checked_add(1)
        .ok_or(ValidationError::PositionExhausted {
            position: tail.position(),
        })?;
    if candidate.position() == expected {
        Ok(())
    } else {
        Err(ValidationError::PositionGap {
            expected,
            found: candidate.position(),
        })
    }
}
