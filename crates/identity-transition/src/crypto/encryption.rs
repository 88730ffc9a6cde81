//! Passphrase sealing for wallet secrets at rest.
//!
//! passphrase → Argon2id(salt) → HKDF-SHA256(context) → ChaCha20-Poly1305.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use zeroize::Zeroize;

use crate::crypto::derivation::derive_key;
use crate::crypto::random::{random_nonce_12, random_salt_16};
use crate::error::{Result, TransitionError};

const ARGON2_M_COST: u32 = 65536; // 64 MiB
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Ciphertext plus the public parameters needed to open it.
#[derive(Debug, Clone)]
pub struct SealedSecret {
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
    pub ciphertext: Vec<u8>,
}

/// Derive a 32-byte key from a passphrase and salt using Argon2id.
pub fn derive_passphrase_key(passphrase: &[u8], salt: &[u8; 16]) -> Result<[u8; 32]> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(32))
        .map_err(|e| TransitionError::DerivationFailed(format!("Argon2 params: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(passphrase, salt, &mut output)
        .map_err(|e| TransitionError::DerivationFailed(format!("Argon2 hash: {e}")))?;
    Ok(output)
}

fn cipher_key(passphrase: &[u8], salt: &[u8; 16], context: &str) -> Result<[u8; 32]> {
    let mut master = derive_passphrase_key(passphrase, salt)?;
    let key = derive_key(&master, context);
    master.zeroize();
    key
}

/// Encrypt `plaintext` under a passphrase, bound to `context`.
pub fn seal(passphrase: &[u8], plaintext: &[u8], context: &str) -> Result<SealedSecret> {
    let salt = random_salt_16();
    let nonce = random_nonce_12();

    let mut key = cipher_key(passphrase, &salt, context)?;
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| TransitionError::EncryptionFailed(format!("cipher init: {e}")));
    key.zeroize();

    let ciphertext = cipher?
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| TransitionError::EncryptionFailed(format!("encrypt: {e}")))?;

    Ok(SealedSecret {
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt a [`SealedSecret`]. A wrong passphrase or context yields
/// `InvalidPassphrase`.
pub fn open(passphrase: &[u8], sealed: &SealedSecret, context: &str) -> Result<Vec<u8>> {
    let mut key = cipher_key(passphrase, &sealed.salt, context)?;
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| TransitionError::DecryptionFailed(format!("cipher init: {e}")));
    key.zeroize();

    cipher?
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| TransitionError::InvalidPassphrase)
}
