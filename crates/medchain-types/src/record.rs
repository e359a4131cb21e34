use serde::{Deserialize, Serialize};

/// One state change to a medical-record wallet.
///
/// This is the payload carried by every block. Field names on the wire are
/// snake_case and every field is optional on input, so a partially filled
/// request still decodes into a well-defined value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    /// Wallet the update applies to.
    pub wallet_address: String,
    /// Actor performing the update.
    pub user_id: String,
    /// Role the actor claims (e.g. "doctor", "patient").
    pub user_role: String,
    /// Wallet field being updated.
    pub updated_key: String,
    /// New value for `updated_key`.
    pub updated_value: String,
    /// Set only on the genesis payload.
    pub is_genesis: bool,
}

impl Transaction {
    /// The sentinel payload anchoring a new chain.
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }

    /// A wallet update with no actor attribution.
    pub fn update(
        wallet_address: impl Into<String>,
        updated_key: impl Into<String>,
        updated_value: impl Into<String>,
    ) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            updated_key: updated_key.into(),
            updated_value: updated_value.into(),
            ..Self::default()
        }
    }

    /// Attach the acting user and role.
    pub fn by(mut self, user_id: impl Into<String>, user_role: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.user_role = user_role.into();
        self
    }
}

/// The actor a payload is attributed to, for authorization decisions.
pub trait Attributed {
    fn actor_id(&self) -> &str;
    fn actor_role(&self) -> &str;
}

impl Attributed for Transaction {
    fn actor_id(&self) -> &str {
        &self.user_id
    }

    fn actor_role(&self) -> &str {
        &self.user_role
    }
}
