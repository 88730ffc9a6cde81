//! Wallet account access for identity key derivation.
//!
//! [`WalletClient`] hands out the active account; [`WalletAccount`]
//! allocates identity indices and derives identity keys.
//! [`HdWalletAccount`] is the BIP32 implementation and [`LocalWallet`]
//! serves one in-process.

pub mod file;
pub mod hd;
pub mod paths;

pub use file::{
    load_wallet, next_unused_identity_index, read_wallet_metadata, record_used_identity_index,
    save_wallet, WalletFile,
};
pub use hd::HdWalletAccount;

use crate::crypto::keys::Secp256k1KeyPair;
use crate::error::Result;

/// An account able to derive identity keys.
pub trait WalletAccount {
    /// Smallest identity index not yet registered.
    fn unused_identity_index(&self) -> Result<u32>;

    /// Private key `key_index` of identity `identity_index`.
    fn identity_hd_key(&self, identity_index: u32, key_index: u32) -> Result<Secp256k1KeyPair>;

    /// Record that `identity_index` now belongs to a registered identity.
    fn mark_identity_index_used(&mut self, identity_index: u32);
}

/// Source of the active wallet account.
#[allow(async_fn_in_trait)]
pub trait WalletClient {
    type Account: WalletAccount;

    async fn wallet_account(&self) -> Result<Self::Account>;
}

/// In-process wallet holding a single HD account.
#[derive(Debug, Clone)]
pub struct LocalWallet {
    account: HdWalletAccount,
}

impl LocalWallet {
    pub fn new(account: HdWalletAccount) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &HdWalletAccount {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut HdWalletAccount {
        &mut self.account
    }

    pub fn into_account(self) -> HdWalletAccount {
        self.account
    }
}

impl WalletClient for LocalWallet {
    type Account = HdWalletAccount;

    async fn wallet_account(&self) -> Result<HdWalletAccount> {
        Ok(self.account.clone())
    }
}
