//! Basic structure check for identity-create transitions.
//!
//! Stateless: looks only at the transition itself. It does not know
//! the funding output, so the transition signature is checked for
//! recoverability, not against the locked output's key.

use std::collections::HashSet;

use super::public_key::{KeyId, KeyType, Purpose, SecurityLevel};
use super::transition::IdentityCreateTransition;
use crate::crypto::signing;

/// Most keys an identity may be created with.
pub const MAX_PUBLIC_KEYS_IN_CREATION: usize = 10;

/// One structural problem found in a transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasicError {
    #[error("Identity must be created with at least one public key")]
    MissingPublicKeys,

    #[error("Identity cannot be created with more than {max} public keys, got {actual}")]
    TooManyPublicKeys { max: usize, actual: usize },

    #[error("Duplicated public key id {0}")]
    DuplicatedKeyId(KeyId),

    #[error("Duplicated public key data for key {0}")]
    DuplicatedKeyData(KeyId),

    #[error("Identity must have exactly one master authentication key, got {0}")]
    MasterKeyCount(usize),

    #[error("Master key {0} must have AUTHENTICATION purpose")]
    MasterKeyPurpose(KeyId),

    #[error("Transfer key {id} must have CRITICAL security level, got {level:?}")]
    TransferKeySecurityLevel { id: KeyId, level: SecurityLevel },

    #[error("Key {id} of type {key_type} must be {expected} bytes, got {actual}")]
    InvalidKeyDataLength {
        id: KeyId,
        key_type: KeyType,
        expected: usize,
        actual: usize,
    },

    #[error("Key {0} has no ownership signature")]
    MissingKeySignature(KeyId),

    #[error("Key {id} ownership signature is invalid: {reason}")]
    InvalidKeySignature { id: KeyId, reason: String },

    #[error("State transition is not signed")]
    MissingSignature,

    #[error("State transition signature is invalid: {0}")]
    InvalidSignature(String),

    #[error("Cannot compute signable bytes: {0}")]
    Serialization(String),
}

/// Outcome of a basic check. Valid when no errors were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<BasicError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[BasicError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    fn push(&mut self, error: BasicError) {
        self.errors.push(error);
    }
}

pub(crate) fn validate_identity_create_basic(
    transition: &IdentityCreateTransition,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    let keys = transition.public_keys();

    if keys.is_empty() {
        result.push(BasicError::MissingPublicKeys);
    }
    if keys.len() > MAX_PUBLIC_KEYS_IN_CREATION {
        result.push(BasicError::TooManyPublicKeys {
            max: MAX_PUBLIC_KEYS_IN_CREATION,
            actual: keys.len(),
        });
    }

    let mut seen_ids = HashSet::new();
    let mut seen_data = HashSet::new();
    for key in keys {
        if !seen_ids.insert(key.id) {
            result.push(BasicError::DuplicatedKeyId(key.id));
        }
        if !seen_data.insert(key.data.as_slice()) {
            result.push(BasicError::DuplicatedKeyData(key.id));
        }

        let expected = key.key_type.data_len();
        if key.data.len() != expected {
            result.push(BasicError::InvalidKeyDataLength {
                id: key.id,
                key_type: key.key_type,
                expected,
                actual: key.data.len(),
            });
        }

        if key.is_master() && key.purpose != Purpose::Authentication {
            result.push(BasicError::MasterKeyPurpose(key.id));
        }
        if key.purpose == Purpose::Transfer && key.security_level != SecurityLevel::Critical {
            result.push(BasicError::TransferKeySecurityLevel {
                id: key.id,
                level: key.security_level,
            });
        }
    }

    let master_count = keys
        .iter()
        .filter(|key| key.is_master() && key.purpose == Purpose::Authentication)
        .count();
    if !keys.is_empty() && master_count != 1 {
        result.push(BasicError::MasterKeyCount(master_count));
    }

    let signable = match transition.signable_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            result.push(BasicError::Serialization(e.to_string()));
            return result;
        }
    };

    for key in keys {
        match &key.signature {
            None => result.push(BasicError::MissingKeySignature(key.id)),
            Some(signature) => {
                if let Err(e) = signing::verify_by_public_key_data(
                    &signable,
                    signature.as_slice(),
                    key.data.as_slice(),
                    key.key_type,
                ) {
                    result.push(BasicError::InvalidKeySignature {
                        id: key.id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    match transition.signature() {
        None => result.push(BasicError::MissingSignature),
        Some(signature) => {
            if let Err(e) = signing::recover_public_key(&signable, signature.as_slice()) {
                result.push(BasicError::InvalidSignature(e.to_string()));
            }
        }
    }

    result
}
