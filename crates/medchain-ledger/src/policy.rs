use std::collections::BTreeSet;

use medchain_types::Attributed;
use serde::{Deserialize, Serialize};

/// Outcome of an authorization check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationDecision {
    Permit,
    Deny { reason: String },
}

impl AuthorizationDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_permit(&self) -> bool {
        matches!(self, Self::Permit)
    }
}

/// Decides whether a payload's actor may write it to the ledger.
///
/// This is the seam where a real authorization collaborator plugs in; the
/// chain logic only ever sees the decision. Any
/// `Fn(&P) -> AuthorizationDecision` closure is a policy.
pub trait AuthorizationPolicy<P>: Send + Sync {
    fn authorize(&self, payload: &P) -> AuthorizationDecision;
}

impl<P, F> AuthorizationPolicy<P> for F
where
    F: Fn(&P) -> AuthorizationDecision + Send + Sync,
{
    fn authorize(&self, payload: &P) -> AuthorizationDecision {
        self(payload)
    }
}

/// Permits every payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermitAll;

impl<P> AuthorizationPolicy<P> for PermitAll {
    fn authorize(&self, _payload: &P) -> AuthorizationDecision {
        AuthorizationDecision::Permit
    }
}

/// Permits payloads whose actor holds one of a fixed set of roles.
#[derive(Clone, Debug, Default)]
pub struct AllowRoles {
    roles: BTreeSet<String>,
}

impl AllowRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }
}

impl<P: Attributed> AuthorizationPolicy<P> for AllowRoles {
    fn authorize(&self, payload: &P) -> AuthorizationDecision {
        let role = payload.actor_role();
        tracing::debug!(actor = payload.actor_id(), role, "checking role");
        if self.roles.contains(role) {
            AuthorizationDecision::Permit
        } else {
            AuthorizationDecision::deny(format!(
                "role `{role}` of `{}` may not write to the ledger",
                payload.actor_id()
            ))
        }
    }
}
