//! Error types for identity-transition.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.

use crate::protocol::KeyType;

/// Error type covering wallet, signing, and transition operations.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Unsupported key type for signing: {0}")]
    UnsupportedKeyType(KeyType),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Wallet account unavailable: {0}")]
    WalletUnavailable(String),

    #[error("No unused identity index left in account")]
    IdentityIndexExhausted,

    #[error("Invalid asset lock proof: {0}")]
    InvalidAssetLockProof(String),

    #[error("StateTransition is invalid - {0:?}")]
    InvalidStateTransition(Vec<String>),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, TransitionError>;
