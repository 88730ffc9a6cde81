//! Platform identity: an identifier plus its public keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::binary::Identifier;
use super::public_key::{IdentityPublicKey, KeyId};

/// A platform identity.
///
/// Keys are held in id order, which for a freshly created identity is
/// also the key-slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Identifier,
    pub public_keys: BTreeMap<KeyId, IdentityPublicKey>,
    pub balance: u64,
    pub revision: u64,
}

impl Identity {
    pub fn get_public_key_by_id(&self, id: KeyId) -> Option<&IdentityPublicKey> {
        self.public_keys.get(&id)
    }

    /// Keys in ascending id order.
    pub fn public_keys(&self) -> impl Iterator<Item = &IdentityPublicKey> {
        self.public_keys.values()
    }

    pub fn master_keys(&self) -> impl Iterator<Item = &IdentityPublicKey> {
        self.public_keys.values().filter(|key| key.is_master())
    }
}
