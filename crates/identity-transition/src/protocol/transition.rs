//! Identity-create state transition.
//!
//! The signable bytes cover the transition type, protocol version,
//! asset lock proof, and the public keys *without* their signatures.
//! Neither the per-key signatures nor the transition signature are
//! part of what gets signed, so key proofs can be attached in any
//! order without invalidating each other.

use bitcoin::secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

use super::asset_lock::AssetLockProof;
use super::binary::{BinaryData, Identifier};
use super::identity::Identity;
use super::public_key::{IdentityPublicKey, KeyId, KeyType, Purpose, SecurityLevel};
use super::validation::{self, ValidationResult};
use crate::crypto::signing;
use crate::error::{Result, TransitionError};

/// State transition type tag for identity creation.
pub const IDENTITY_CREATE_TRANSITION_TYPE: u8 = 2;

/// Signed instruction that creates an identity on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCreateTransition {
    protocol_version: u32,
    asset_lock_proof: AssetLockProof,
    public_keys: Vec<IdentityPublicKey>,
    identity_id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<BinaryData>,
}

#[derive(Serialize)]
struct SignableKey<'a> {
    id: KeyId,
    purpose: Purpose,
    security_level: SecurityLevel,
    key_type: KeyType,
    read_only: bool,
    data: &'a BinaryData,
}

#[derive(Serialize)]
struct SignablePayload<'a> {
    transition_type: u8,
    protocol_version: u32,
    asset_lock_proof: &'a AssetLockProof,
    public_keys: Vec<SignableKey<'a>>,
}

impl IdentityCreateTransition {
    /// Build an unsigned transition carrying copies of the identity's keys.
    pub fn new(
        identity: &Identity,
        asset_lock_proof: AssetLockProof,
        protocol_version: u32,
    ) -> Self {
        let public_keys = identity
            .public_keys()
            .cloned()
            .map(|mut key| {
                key.signature = None;
                key
            })
            .collect();

        Self {
            protocol_version,
            asset_lock_proof,
            public_keys,
            identity_id: identity.id,
            signature: None,
        }
    }

    pub fn protocol_version(&self) -> u32 {
        self.protocol_version
    }

    pub fn asset_lock_proof(&self) -> &AssetLockProof {
        &self.asset_lock_proof
    }

    pub fn identity_id(&self) -> Identifier {
        self.identity_id
    }

    pub fn public_keys(&self) -> &[IdentityPublicKey] {
        &self.public_keys
    }

    pub fn set_public_keys(&mut self, public_keys: Vec<IdentityPublicKey>) {
        self.public_keys = public_keys;
    }

    pub fn signature(&self) -> Option<&BinaryData> {
        self.signature.as_ref()
    }

    pub fn set_signature(&mut self, signature: Option<BinaryData>) {
        self.signature = signature;
    }

    /// Bytes covered by every signature on this transition.
    pub fn signable_bytes(&self) -> Result<Vec<u8>> {
        let payload = SignablePayload {
            transition_type: IDENTITY_CREATE_TRANSITION_TYPE,
            protocol_version: self.protocol_version,
            asset_lock_proof: &self.asset_lock_proof,
            public_keys: self
                .public_keys
                .iter()
                .map(|key| SignableKey {
                    id: key.id,
                    purpose: key.purpose,
                    security_level: key.security_level,
                    key_type: key.key_type,
                    read_only: key.read_only,
                    data: &key.data,
                })
                .collect(),
        };
        bincode::serialize(&payload).map_err(|e| TransitionError::SerializationError(e.to_string()))
    }

    /// Sign the transition and store the result in its signature field,
    /// replacing any previous signature.
    pub fn sign_by_private_key(&mut self, private_key: &[u8], key_type: KeyType) -> Result<()> {
        let data = self.signable_bytes()?;
        let signature = signing::sign_by_key_type(&data, private_key, key_type)?;
        self.signature = Some(signature);
        Ok(())
    }

    /// Public key that produced the transition signature.
    pub fn recover_signer(&self) -> Result<PublicKey> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| TransitionError::InvalidSignature("transition is not signed".into()))?;
        signing::recover_public_key(&self.signable_bytes()?, signature.as_slice())
    }

    /// Verify the transition signature against key data of the given type.
    pub fn verify_signature_by_public_key_data(
        &self,
        public_key_data: &[u8],
        key_type: KeyType,
    ) -> Result<()> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| TransitionError::InvalidSignature("transition is not signed".into()))?;
        signing::verify_by_public_key_data(
            &self.signable_bytes()?,
            signature.as_slice(),
            public_key_data,
            key_type,
        )
    }

    /// Local structure check: key set shape and every signature.
    pub fn validate_basic(&self) -> ValidationResult {
        validation::validate_identity_create_basic(self)
    }
}
