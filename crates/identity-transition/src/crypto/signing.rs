//! Compact recoverable ECDSA signatures.
//!
//! Signatures are 65 bytes: a header byte `27 + recovery_id + 4`
//! (the `+ 4` marks a compressed public key) followed by `r || s`.
//! The signed message is always double-SHA256 of the payload.

use bitcoin::secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::crypto::hash::{hash160, sha256d};
use crate::error::{Result, TransitionError};
use crate::protocol::{BinaryData, KeyType};

/// Length of a compact recoverable signature.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

const COMPACT_HEADER_BASE: u8 = 27;
const COMPRESSED_KEY_FLAG: u8 = 4;

/// Sign `data` with a secp256k1 secret key.
pub fn sign_compact(data: &[u8], secret_key: &SecretKey) -> [u8; COMPACT_SIGNATURE_LEN] {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(sha256d(data));
    let signature = secp.sign_ecdsa_recoverable(&message, secret_key);
    let (recovery_id, rs) = signature.serialize_compact();

    let mut out = [0u8; COMPACT_SIGNATURE_LEN];
    out[0] = COMPACT_HEADER_BASE + COMPRESSED_KEY_FLAG + recovery_id.to_i32() as u8;
    out[1..].copy_from_slice(&rs);
    out
}

/// Recover the public key that produced a compact signature over `data`.
pub fn recover_public_key(data: &[u8], signature: &[u8]) -> Result<PublicKey> {
    if signature.len() != COMPACT_SIGNATURE_LEN {
        return Err(TransitionError::InvalidSignature(format!(
            "compact signature must be {COMPACT_SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }

    let header = signature[0];
    if !(COMPACT_HEADER_BASE..COMPACT_HEADER_BASE + 8).contains(&header) {
        return Err(TransitionError::InvalidSignature(format!(
            "invalid header byte {header}"
        )));
    }

    let recovery_id = RecoveryId::from_i32(i32::from((header - COMPACT_HEADER_BASE) & 3))
        .map_err(|e| TransitionError::InvalidSignature(format!("recovery id: {e}")))?;
    let recoverable = RecoverableSignature::from_compact(&signature[1..], recovery_id)
        .map_err(|e| TransitionError::InvalidSignature(format!("compact form: {e}")))?;

    let message = Message::from_digest(sha256d(data));
    Secp256k1::verification_only()
        .recover_ecdsa(&message, &recoverable)
        .map_err(|_| TransitionError::SignatureInvalid)
}

/// Sign `data` with raw private key bytes for the given key type.
///
/// Only the ECDSA key types can sign; everything else is rejected.
pub fn sign_by_key_type(data: &[u8], private_key: &[u8], key_type: KeyType) -> Result<BinaryData> {
    match key_type {
        KeyType::EcdsaSecp256k1 | KeyType::EcdsaHash160 => {
            let secret_key = SecretKey::from_slice(private_key)
                .map_err(|e| TransitionError::InvalidKey(format!("invalid secret key: {e}")))?;
            Ok(BinaryData::new(sign_compact(data, &secret_key).to_vec()))
        }
        other => Err(TransitionError::UnsupportedKeyType(other)),
    }
}

/// Verify `signature` over `data` against identity public key data.
///
/// `public_key_data` is the 33-byte compressed key for `EcdsaSecp256k1`
/// or its HASH160 for `EcdsaHash160`.
pub fn verify_by_public_key_data(
    data: &[u8],
    signature: &[u8],
    public_key_data: &[u8],
    key_type: KeyType,
) -> Result<()> {
    let recovered = recover_public_key(data, signature)?.serialize();
    let matches = match key_type {
        KeyType::EcdsaSecp256k1 => recovered.as_slice() == public_key_data,
        KeyType::EcdsaHash160 => hash160(&recovered).as_slice() == public_key_data,
        other => return Err(TransitionError::UnsupportedKeyType(other)),
    };

    if matches {
        Ok(())
    } else {
        Err(TransitionError::SignatureInvalid)
    }
}
