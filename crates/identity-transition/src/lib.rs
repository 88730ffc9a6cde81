//! identity-transition: client glue for registering platform identities.
//!
//! Derives four identity keys from an HD wallet, assembles an
//! identity-create state transition around a funded asset lock, proves
//! possession of every key, and signs the result with the asset lock
//! funding key. Also carries small Fibonacci helpers.

pub mod config;
pub mod crypto;
pub mod error;
pub mod fibonacci;
pub mod platform;
pub mod protocol;
pub mod wallet;

// Re-export primary types
pub use config::{Network, PlatformConfig};
pub use crypto::Secp256k1KeyPair;
pub use error::{Result, TransitionError};
pub use fibonacci::{fibonacci, nearest_greater_fibonacci, MAX_FIBONACCI_INDEX};
pub use platform::{sign_slot, IdentityCreateResult, KeySlot, Platform, IDENTITY_KEY_SLOTS};
pub use protocol::{
    AssetLockProof, BinaryData, Identifier, Identity, IdentityCreateTransition, IdentityFactory,
    IdentityPublicKey, KeyId, KeyType, Purpose, SecurityLevel,
};
pub use wallet::{HdWalletAccount, LocalWallet, WalletAccount, WalletClient};
