//! BIP32 paths for identity key material.
//!
//! Identity keys live under the feature purpose `9'`:
//!
//! ```text
//! m / 9' / coin' / 5' / 0' / 0' / identity_index' / key_index'   authentication keys (ECDSA)
//! m / 9' / coin' / 5' / 1' / index'                             registration funding keys
//! ```

use bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::error::{Result, TransitionError};

/// Feature purpose for platform key material.
pub const FEATURE_PURPOSE: u32 = 9;

/// Feature index for identities.
pub const IDENTITY_FEATURE: u32 = 5;

/// Sub-feature for identity authentication keys.
pub const AUTHENTICATION_SUBFEATURE: u32 = 0;

/// Sub-feature for identity registration funding keys.
pub const REGISTRATION_FUNDING_SUBFEATURE: u32 = 1;

/// Key-type component for ECDSA authentication keys.
pub const ECDSA_KEY_TYPE: u32 = 0;

fn hardened(index: u32) -> Result<ChildNumber> {
    ChildNumber::from_hardened_idx(index)
        .map_err(|e| TransitionError::DerivationFailed(format!("index {index}: {e}")))
}

/// Path of authentication key `key_index` of identity `identity_index`.
pub fn identity_authentication_path(
    coin_type: u32,
    identity_index: u32,
    key_index: u32,
) -> Result<DerivationPath> {
    let path = vec![
        hardened(FEATURE_PURPOSE)?,
        hardened(coin_type)?,
        hardened(IDENTITY_FEATURE)?,
        hardened(AUTHENTICATION_SUBFEATURE)?,
        hardened(ECDSA_KEY_TYPE)?,
        hardened(identity_index)?,
        hardened(key_index)?,
    ];
    Ok(DerivationPath::from(path))
}

/// Path of the asset lock funding key for registration `index`.
pub fn identity_registration_funding_path(coin_type: u32, index: u32) -> Result<DerivationPath> {
    let path = vec![
        hardened(FEATURE_PURPOSE)?,
        hardened(coin_type)?,
        hardened(IDENTITY_FEATURE)?,
        hardened(REGISTRATION_FUNDING_SUBFEATURE)?,
        hardened(index)?,
    ];
    Ok(DerivationPath::from(path))
}
