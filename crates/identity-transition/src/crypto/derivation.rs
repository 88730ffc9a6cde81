//! Symmetric key derivation using HKDF-SHA256.
//!
//! Used to turn the Argon2id passphrase key into purpose-bound
//! encryption keys, so one passphrase never keys two ciphers directly.
//! Identity signing keys are derived with BIP32 in [`crate::wallet`].

use hkdf::Hkdf;
use sha2::Sha256;

use crate::config::Network;
use crate::error::{Result, TransitionError};

/// Derive a 32-byte key from input key material and a context string.
pub fn derive_key(ikm: &[u8; 32], context: &str) -> Result<[u8; 32]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut output = [0u8; 32];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| TransitionError::DerivationFailed(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}

/// Context for the key that seals a wallet's master key on disk.
///
/// Bound to the network so a mainnet file cannot be opened as testnet.
/// Must remain stable across versions.
pub fn wallet_seal_context(network: Network) -> String {
    format!("identity-transition/wallet-seal/{network}")
}
