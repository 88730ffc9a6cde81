//! Cryptographic primitives for identity-transition.
//!
//! This module provides:
//! - secp256k1 key pairs (identity keys and funding keys)
//! - compact recoverable ECDSA signing and verification
//! - double-SHA256 and HASH160 digests
//! - HKDF-SHA256 key derivation
//! - Argon2id + ChaCha20-Poly1305 sealing for wallet secrets at rest
//! - Cryptographically secure random number generation

pub mod derivation;
pub mod encryption;
pub mod hash;
pub mod keys;
pub mod random;
pub mod signing;

pub use keys::Secp256k1KeyPair;
