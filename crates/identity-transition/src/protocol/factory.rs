//! Construction of identities and identity-create transitions.

use std::collections::BTreeMap;

use super::asset_lock::AssetLockProof;
use super::binary::Identifier;
use super::identity::Identity;
use super::public_key::IdentityPublicKey;
use super::transition::IdentityCreateTransition;
use crate::error::{Result, TransitionError};

/// Builds protocol objects stamped with one protocol version.
#[derive(Debug, Clone)]
pub struct IdentityFactory {
    protocol_version: u32,
}

impl IdentityFactory {
    pub fn new(protocol_version: u32) -> Self {
        Self { protocol_version }
    }

    pub fn protocol_version(&self) -> u32 {
        self.protocol_version
    }

    /// Create a new identity with zero balance and revision.
    ///
    /// Key ids must be unique.
    pub fn create(&self, id: Identifier, public_keys: Vec<IdentityPublicKey>) -> Result<Identity> {
        let mut keys = BTreeMap::new();
        for key in public_keys {
            let key_id = key.id;
            if keys.insert(key_id, key).is_some() {
                return Err(TransitionError::InvalidKey(format!(
                    "duplicated public key id {key_id}"
                )));
            }
        }

        Ok(Identity {
            id,
            public_keys: keys,
            balance: 0,
            revision: 0,
        })
    }

    /// Create an unsigned identity-create transition for `identity`
    /// funded by `asset_lock_proof`.
    pub fn create_identity_create_transition(
        &self,
        identity: &Identity,
        asset_lock_proof: AssetLockProof,
    ) -> Result<IdentityCreateTransition> {
        asset_lock_proof.check()?;

        let expected = asset_lock_proof.create_identifier();
        if identity.id != expected {
            return Err(TransitionError::InvalidAssetLockProof(format!(
                "identity id {} does not match asset lock identifier {expected}",
                identity.id
            )));
        }

        Ok(IdentityCreateTransition::new(
            identity,
            asset_lock_proof,
            self.protocol_version,
        ))
    }
}
