//! Identity public key descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::binary::BinaryData;

/// Key id, unique within one identity.
pub type KeyId = u32;

/// Functional role of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    Authentication = 0,
    Encryption = 1,
    Decryption = 2,
    Transfer = 3,
    System = 4,
    Voting = 5,
}

/// Authorization tier of a key. Lower value is stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityLevel {
    Master = 0,
    Critical = 1,
    High = 2,
    Medium = 3,
}

/// Cryptographic scheme of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    EcdsaSecp256k1 = 0,
    #[serde(rename = "BLS12_381")]
    Bls12381 = 1,
    EcdsaHash160 = 2,
    Bip13ScriptHash = 3,
    #[serde(rename = "EDDSA_25519_HASH160")]
    EddsaEd25519Hash160 = 4,
}

impl KeyType {
    /// Expected length of the key data, when fixed.
    pub fn data_len(&self) -> usize {
        match self {
            Self::EcdsaSecp256k1 => 33,
            Self::Bls12381 => 48,
            Self::EcdsaHash160 | Self::Bip13ScriptHash | Self::EddsaEd25519Hash160 => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EcdsaSecp256k1 => "ECDSA_SECP256K1",
            Self::Bls12381 => "BLS12_381",
            Self::EcdsaHash160 => "ECDSA_HASH160",
            Self::Bip13ScriptHash => "BIP13_SCRIPT_HASH",
            Self::EddsaEd25519Hash160 => "EDDSA_25519_HASH160",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public key attached to an identity.
///
/// `signature` is only populated on the copies carried by an
/// identity-create transition, where it proves possession of the
/// matching private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPublicKey {
    pub id: KeyId,
    pub purpose: Purpose,
    pub security_level: SecurityLevel,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub read_only: bool,
    pub data: BinaryData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<BinaryData>,
}

impl IdentityPublicKey {
    /// A key with the given id and the defaults: AUTHENTICATION,
    /// HIGH, ECDSA_SECP256K1, writable, no data.
    pub fn new(id: KeyId) -> Self {
        Self {
            id,
            purpose: Purpose::Authentication,
            security_level: SecurityLevel::High,
            key_type: KeyType::EcdsaSecp256k1,
            read_only: false,
            data: BinaryData::default(),
            signature: None,
        }
    }

    pub fn set_id(&mut self, id: KeyId) {
        self.id = id;
    }

    pub fn set_purpose(&mut self, purpose: Purpose) {
        self.purpose = purpose;
    }

    pub fn set_security_level(&mut self, security_level: SecurityLevel) {
        self.security_level = security_level;
    }

    pub fn set_data(&mut self, data: impl Into<BinaryData>) {
        self.data = data.into();
    }

    pub fn set_signature(&mut self, signature: Option<BinaryData>) {
        self.signature = signature;
    }

    pub fn is_master(&self) -> bool {
        self.security_level == SecurityLevel::Master
    }
}
