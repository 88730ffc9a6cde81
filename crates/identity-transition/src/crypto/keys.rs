//! secp256k1 key pairs.
//!
//! Identity keys derived from the wallet and the one-time asset lock
//! (funding) key are both secp256k1. Public keys are handled in their
//! 33-byte compressed form throughout.

use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroize;

use crate::crypto::hash::hash160;
use crate::crypto::random::random_bytes;
use crate::error::{Result, TransitionError};

/// A secp256k1 key pair.
///
/// The secret key is erased on drop.
pub struct Secp256k1KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Secp256k1KeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        loop {
            let mut bytes: [u8; 32] = random_bytes();
            let parsed = SecretKey::from_slice(&bytes);
            bytes.zeroize();
            // Out-of-range scalars are astronomically rare; draw again.
            if let Ok(secret_key) = parsed {
                return Self::from_secret_key(secret_key);
            }
        }
    }

    /// Wrap an existing secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Reconstruct a key pair from raw 32-byte secret key material.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| TransitionError::InvalidKey(format!("invalid secret key: {e}")))?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Reconstruct a key pair from a hex-encoded secret key.
    pub fn from_hex(secret_hex: &str) -> Result<Self> {
        let mut bytes = hex::decode(secret_hex.trim())
            .map_err(|e| TransitionError::InvalidKey(format!("invalid hex: {e}")))?;
        let result = Self::from_secret_bytes(&bytes);
        bytes.zeroize();
        result
    }

    /// Parse a 33-byte compressed (or 65-byte uncompressed) public key.
    pub fn public_key_from_bytes(bytes: &[u8]) -> Result<PublicKey> {
        PublicKey::from_slice(bytes)
            .map_err(|e| TransitionError::InvalidKey(format!("invalid public key: {e}")))
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Return the secret key bytes. Caller must zeroize after use.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }

    /// Return the secret key as hex. Caller must zeroize after use.
    pub fn secret_key_hex(&self) -> String {
        let mut bytes = self.secret_key_bytes();
        let encoded = hex::encode(bytes);
        bytes.zeroize();
        encoded
    }

    /// Compressed public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    /// HASH160 of the compressed public key.
    pub fn public_key_hash(&self) -> [u8; 20] {
        hash160(&self.public_key_bytes())
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        self.secret_key.non_secure_erase();
    }
}
