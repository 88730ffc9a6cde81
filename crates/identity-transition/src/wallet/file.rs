//! Wallet file format: HD master key sealed under a passphrase.
//!
//! The master key is encrypted with ChaCha20-Poly1305 under a key
//! derived from the passphrase (Argon2id, then HKDF bound to the
//! network). Public metadata stays in plaintext so a wallet can be
//! inspected, and its used identity indices updated, without the
//! passphrase.
//!
//! File format (JSON):
//! ```json
//! {
//!     "version": 1,
//!     "format": "idtx-wallet-v1",
//!     "network": "testnet",
//!     "encryption": {
//!         "algorithm": "chacha20-poly1305",
//!         "kdf": "argon2id",
//!         "salt": "<base64-16-bytes>",
//!         "nonce": "<base64-12-bytes>"
//!     },
//!     "encrypted_master_key": "<base64-ciphertext>",
//!     "used_identity_indices": [0, 1]
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::hd::{first_unused_index, HdWalletAccount};
use crate::config::Network;
use crate::crypto::derivation::wallet_seal_context;
use crate::crypto::encryption::{self, SealedSecret};
use crate::error::{Result, TransitionError};

const WALLET_VERSION: u32 = 1;
const WALLET_FORMAT: &str = "idtx-wallet-v1";
const WALLET_ALGORITHM: &str = "chacha20-poly1305";
const WALLET_KDF: &str = "argon2id";

/// Top-level structure written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletFile {
    pub version: u32,
    pub format: String,
    pub network: Network,
    pub encryption: EncryptionMetadata,
    /// Base64 ciphertext of the serialized BIP32 master key.
    pub encrypted_master_key: String,
    #[serde(default)]
    pub used_identity_indices: Vec<u32>,
}

/// Encryption parameters needed for decryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    pub algorithm: String,
    pub kdf: String,
    /// Base64 Argon2id salt (16 bytes).
    pub salt: String,
    /// Base64 ChaCha20-Poly1305 nonce (12 bytes).
    pub nonce: String,
}

/// Save `account` to `path`, sealing its master key with `passphrase`.
///
/// The write is atomic (temp file then rename).
pub fn save_wallet(account: &HdWalletAccount, path: &Path, passphrase: &str) -> Result<()> {
    let network = account.network();
    let mut master = account.master_key_bytes();
    let sealed = encryption::seal(
        passphrase.as_bytes(),
        &master,
        &wallet_seal_context(network),
    );
    master.zeroize();
    let sealed = sealed?;

    let wallet_file = WalletFile {
        version: WALLET_VERSION,
        format: WALLET_FORMAT.to_string(),
        network,
        encryption: EncryptionMetadata {
            algorithm: WALLET_ALGORITHM.to_string(),
            kdf: WALLET_KDF.to_string(),
            salt: BASE64.encode(sealed.salt),
            nonce: BASE64.encode(sealed.nonce),
        },
        encrypted_master_key: BASE64.encode(&sealed.ciphertext),
        used_identity_indices: account.used_identity_indices().collect(),
    };

    write_wallet_file(path, &wallet_file)?;
    log::debug!("wallet saved to {}", path.display());
    Ok(())
}

/// Load and decrypt the account stored at `path`.
///
/// A wrong passphrase yields `InvalidPassphrase`.
pub fn load_wallet(path: &Path, passphrase: &str) -> Result<HdWalletAccount> {
    let wallet_file = read_wallet_metadata(path)?;

    let salt: [u8; 16] = decode_field(&wallet_file.encryption.salt, "salt")?
        .try_into()
        .map_err(|_| TransitionError::InvalidFileFormat("salt must be 16 bytes".into()))?;
    let nonce: [u8; 12] = decode_field(&wallet_file.encryption.nonce, "nonce")?
        .try_into()
        .map_err(|_| TransitionError::InvalidFileFormat("nonce must be 12 bytes".into()))?;
    let ciphertext = decode_field(&wallet_file.encrypted_master_key, "ciphertext")?;

    let sealed = SealedSecret {
        salt,
        nonce,
        ciphertext,
    };
    let mut master = encryption::open(
        passphrase.as_bytes(),
        &sealed,
        &wallet_seal_context(wallet_file.network),
    )?;
    let account = HdWalletAccount::from_master_key_bytes(&master, wallet_file.network);
    master.zeroize();

    Ok(account?.with_used_identity_indices(wallet_file.used_identity_indices))
}

/// Read the plaintext part of a wallet file; no passphrase needed.
pub fn read_wallet_metadata(path: &Path) -> Result<WalletFile> {
    let bytes = std::fs::read(path)?;
    let wallet_file: WalletFile = serde_json::from_slice(&bytes).map_err(|e| {
        TransitionError::InvalidFileFormat(format!("failed to parse wallet file: {e}"))
    })?;

    if wallet_file.version != WALLET_VERSION || wallet_file.format != WALLET_FORMAT {
        return Err(TransitionError::InvalidFileFormat(format!(
            "unsupported wallet file version={} format={}",
            wallet_file.version, wallet_file.format,
        )));
    }
    Ok(wallet_file)
}

/// Add `identity_index` to the wallet's used set without decrypting it.
pub fn record_used_identity_index(path: &Path, identity_index: u32) -> Result<()> {
    let mut wallet_file = read_wallet_metadata(path)?;
    if !wallet_file.used_identity_indices.contains(&identity_index) {
        wallet_file.used_identity_indices.push(identity_index);
        wallet_file.used_identity_indices.sort_unstable();
        write_wallet_file(path, &wallet_file)?;
    }
    Ok(())
}

/// Next unused identity index according to the file's metadata.
pub fn next_unused_identity_index(wallet_file: &WalletFile) -> Result<u32> {
    let used: BTreeSet<u32> = wallet_file.used_identity_indices.iter().copied().collect();
    first_unused_index(&used)
}

fn decode_field(value: &str, name: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| TransitionError::InvalidFileFormat(format!("invalid {name} base64: {e}")))
}

fn write_wallet_file(path: &Path, wallet_file: &WalletFile) -> Result<()> {
    let json = serde_json::to_string_pretty(wallet_file)
        .map_err(|e| TransitionError::SerializationError(e.to_string()))?;
    write_atomic(path, json.as_bytes())
}

/// Write `data` to `path` through a sibling temp file and rename.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("wallet.tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
