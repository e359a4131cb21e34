use std::fmt;

use serde::{Deserialize, Serialize};

/// Deterministic identifier of a medical-record wallet (32 hex characters).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Derive an address from the wallet holder's name and creation date.
    ///
    /// Fields are length-prefixed before hashing so that
    /// `("ab", "c")` and `("a", "bc")` map to different addresses.
    pub fn derive(full_name: &str, creation_date: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"medchain-wallet-v1:");
        for field in [full_name, creation_date] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Self(hex::encode(&hasher.finalize().as_bytes()[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A patient's medical record, addressed by its wallet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalRecord {
    pub wallet_address: String,
    pub full_name: String,
    pub operations: Vec<String>,
    pub prescriptions: Vec<String>,
    pub allergies: Vec<String>,
    pub creation_date: String,
}

impl MedicalRecord {
    /// Derive the wallet address for this record.
    pub fn derive_address(&self) -> WalletAddress {
        WalletAddress::derive(&self.full_name, &self.creation_date)
    }

    /// Return the record with its wallet address filled in.
    pub fn with_derived_address(mut self) -> Self {
        self.wallet_address = self.derive_address().as_str().to_owned();
        self
    }
}
