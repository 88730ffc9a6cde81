//! BIP32 hierarchical-deterministic wallet account.

use std::collections::BTreeSet;

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::Secp256k1;

use super::paths::{identity_authentication_path, identity_registration_funding_path};
use super::WalletAccount;
use crate::config::Network;
use crate::crypto::keys::Secp256k1KeyPair;
use crate::error::{Result, TransitionError};

/// Serialized length of an extended private key.
pub const MASTER_KEY_LEN: usize = 78;

const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;
const MAX_IDENTITY_INDEX: u32 = (1 << 31) - 1;

/// Wallet account backed by a BIP32 master key.
///
/// Tracks which identity indices have been registered so the next
/// unused one can be handed out.
#[derive(Clone)]
pub struct HdWalletAccount {
    master: Xpriv,
    network: Network,
    used_identity_indices: BTreeSet<u32>,
}

impl HdWalletAccount {
    /// Create an account from a BIP32 seed (16 to 64 bytes).
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(TransitionError::InvalidKey(format!(
                "seed must be {MIN_SEED_LEN}..={MAX_SEED_LEN} bytes, got {}",
                seed.len()
            )));
        }
        let master = Xpriv::new_master(network.network_kind(), seed)
            .map_err(|e| TransitionError::DerivationFailed(format!("master key: {e}")))?;
        Ok(Self {
            master,
            network,
            used_identity_indices: BTreeSet::new(),
        })
    }

    /// Restore an account from a serialized master key.
    ///
    /// The key's encoded network kind must match `network`.
    pub fn from_master_key_bytes(bytes: &[u8], network: Network) -> Result<Self> {
        let master = Xpriv::decode(bytes)
            .map_err(|e| TransitionError::InvalidKey(format!("invalid master key: {e}")))?;
        if master.network != network.network_kind() {
            return Err(TransitionError::InvalidKey(format!(
                "master key is for {:?}, not {network}",
                master.network
            )));
        }
        Ok(Self {
            master,
            network,
            used_identity_indices: BTreeSet::new(),
        })
    }

    /// Serialized master key. Caller must zeroize after use.
    pub fn master_key_bytes(&self) -> [u8; MASTER_KEY_LEN] {
        self.master.encode()
    }

    pub fn with_used_identity_indices(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.used_identity_indices.extend(indices);
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn used_identity_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.used_identity_indices.iter().copied()
    }

    /// Key that funds the asset lock for registration `index`.
    pub fn identity_registration_funding_key(&self, index: u32) -> Result<Secp256k1KeyPair> {
        let path = identity_registration_funding_path(self.network.coin_type(), index)?;
        self.derive(&path)
    }

    fn derive(&self, path: &DerivationPath) -> Result<Secp256k1KeyPair> {
        let secp = Secp256k1::signing_only();
        let child = self
            .master
            .derive_priv(&secp, path)
            .map_err(|e| TransitionError::DerivationFailed(format!("{path}: {e}")))?;
        Ok(Secp256k1KeyPair::from_secret_key(child.private_key))
    }
}

/// Smallest hardened-derivable index not in `used`.
pub(crate) fn first_unused_index(used: &BTreeSet<u32>) -> Result<u32> {
    (0..=MAX_IDENTITY_INDEX)
        .find(|index| !used.contains(index))
        .ok_or(TransitionError::IdentityIndexExhausted)
}

impl WalletAccount for HdWalletAccount {
    fn unused_identity_index(&self) -> Result<u32> {
        first_unused_index(&self.used_identity_indices)
    }

    fn identity_hd_key(&self, identity_index: u32, key_index: u32) -> Result<Secp256k1KeyPair> {
        let path =
            identity_authentication_path(self.network.coin_type(), identity_index, key_index)?;
        self.derive(&path)
    }

    fn mark_identity_index_used(&mut self, identity_index: u32) {
        if self.used_identity_indices.insert(identity_index) {
            log::debug!("identity index {identity_index} marked used");
        }
    }
}

impl std::fmt::Debug for HdWalletAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdWalletAccount")
            .field("network", &self.network)
            .field("used_identity_indices", &self.used_identity_indices)
            .finish_non_exhaustive()
    }
}
