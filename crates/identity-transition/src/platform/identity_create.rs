//! Identity-create transition builder.
//!
//! Every new identity gets the same four ECDSA keys, derived from the
//! wallet at `(identity_index, slot)`:
//!
//! | slot | purpose        | security level |
//! |------|----------------|----------------|
//! | 0    | AUTHENTICATION | MASTER         |
//! | 1    | AUTHENTICATION | HIGH           |
//! | 2    | AUTHENTICATION | CRITICAL       |
//! | 3    | TRANSFER       | CRITICAL       |
//!
//! Each key descriptor is signed with its own private key over the
//! transition's signable bytes, then the whole transition is signed
//! with the asset lock funding key.

use serde::Serialize;
use zeroize::Zeroize;

use super::Platform;
use crate::crypto::keys::Secp256k1KeyPair;
use crate::crypto::signing::sign_compact;
use crate::error::{Result, TransitionError};
use crate::protocol::{
    AssetLockProof, BinaryData, Identity, IdentityCreateTransition, IdentityPublicKey, KeyId,
    KeyType, Purpose, SecurityLevel,
};
use crate::wallet::{WalletAccount, WalletClient};

/// Fixed role of one identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySlot {
    pub index: KeyId,
    pub purpose: Purpose,
    pub security_level: SecurityLevel,
}

/// Key layout of every identity this builder creates.
pub const IDENTITY_KEY_SLOTS: [KeySlot; 4] = [
    KeySlot {
        index: 0,
        purpose: Purpose::Authentication,
        security_level: SecurityLevel::Master,
    },
    KeySlot {
        index: 1,
        purpose: Purpose::Authentication,
        security_level: SecurityLevel::High,
    },
    KeySlot {
        index: 2,
        purpose: Purpose::Authentication,
        security_level: SecurityLevel::Critical,
    },
    KeySlot {
        index: 3,
        purpose: Purpose::Transfer,
        security_level: SecurityLevel::Critical,
    },
];

/// Output of [`Platform::create_identity_create_transition`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCreateResult {
    pub identity: Identity,
    pub identity_create_transition: IdentityCreateTransition,
    /// Wallet identity index the keys were derived at. Callers that
    /// persist wallet state should mark it used once the transition
    /// is broadcast.
    pub identity_index: u32,
}

/// Proof of possession for one key: its signature over `signable`.
pub fn sign_slot(signable: &[u8], key: &Secp256k1KeyPair) -> BinaryData {
    BinaryData::new(sign_compact(signable, key.secret_key()).to_vec())
}

impl<C: WalletClient> Platform<C> {
    /// Build and sign an identity-create transition funded by
    /// `asset_lock_proof`.
    ///
    /// `asset_lock_private_key` must be the key that funded the lock;
    /// it produces the transition signature. Any failure aborts the
    /// whole build.
    pub async fn create_identity_create_transition(
        &self,
        asset_lock_proof: AssetLockProof,
        asset_lock_private_key: &Secp256k1KeyPair,
    ) -> Result<IdentityCreateResult> {
        let account = self.client.wallet_account().await?;
        let identity_index = account.unused_identity_index()?;
        log::debug!("building identity at wallet index {identity_index}");

        let mut slot_keys = Vec::with_capacity(IDENTITY_KEY_SLOTS.len());
        let mut public_keys = Vec::with_capacity(IDENTITY_KEY_SLOTS.len());
        for slot in &IDENTITY_KEY_SLOTS {
            let key_pair = account.identity_hd_key(identity_index, slot.index)?;

            let mut public_key = IdentityPublicKey::new(slot.index);
            public_key.set_purpose(slot.purpose);
            public_key.set_security_level(slot.security_level);
            public_key.set_data(key_pair.public_key_bytes().to_vec());

            public_keys.push(public_key);
            slot_keys.push(key_pair);
        }

        let identity = self
            .factory
            .create(asset_lock_proof.create_identifier(), public_keys)?;
        let mut transition = self
            .factory
            .create_identity_create_transition(&identity, asset_lock_proof)?;

        let signable = transition.signable_bytes()?;
        let mut signed_keys = transition.public_keys().to_vec();
        for descriptor in &mut signed_keys {
            let key_pair = slot_keys
                .get(descriptor.id as usize)
                .ok_or_else(|| TransitionError::InvalidKey(format!("no slot {}", descriptor.id)))?;
            descriptor.set_signature(Some(sign_slot(&signable, key_pair)));
        }
        transition.set_public_keys(signed_keys);

        let mut funding_key = asset_lock_private_key.secret_key_bytes();
        let signed = transition.sign_by_private_key(&funding_key, KeyType::EcdsaSecp256k1);
        funding_key.zeroize();
        signed?;

        if self.config.validate_basic {
            let result = transition.validate_basic();
            if !result.is_valid() {
                log::warn!("identity {} failed basic check", identity.id);
                return Err(TransitionError::InvalidStateTransition(result.messages()));
            }
        }

        log::info!(
            "identity-create transition signed for {} (index {identity_index})",
            identity.id
        );
        Ok(IdentityCreateResult {
            identity,
            identity_create_transition: transition,
            identity_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Network, PlatformConfig};
    use crate::crypto::signing::{recover_public_key, verify_by_public_key_data};
    use crate::wallet::{HdWalletAccount, LocalWallet};

    fn proof() -> AssetLockProof {
        AssetLockProof::Instant {
            instant_lock: BinaryData::new(vec![3u8; 16]),
            transaction: BinaryData::new(vec![5u8; 120]),
            output_index: 1,
        }
    }

    fn account() -> HdWalletAccount {
        HdWalletAccount::from_seed(&[21u8; 64], Network::Testnet).unwrap()
    }

    fn platform() -> Platform<LocalWallet> {
        Platform::new(LocalWallet::new(account()), PlatformConfig::default())
    }

    /// Account that hands out the same key for every slot.
    #[derive(Clone)]
    struct SameKeyAccount;

    impl WalletAccount for SameKeyAccount {
        fn unused_identity_index(&self) -> Result<u32> {
            Ok(0)
        }

        fn identity_hd_key(&self, _: u32, _: u32) -> Result<Secp256k1KeyPair> {
            Secp256k1KeyPair::from_secret_bytes(&[9u8; 32])
        }

        fn mark_identity_index_used(&mut self, _: u32) {}
    }

    struct SameKeyWallet;

    impl WalletClient for SameKeyWallet {
        type Account = SameKeyAccount;

        async fn wallet_account(&self) -> Result<SameKeyAccount> {
            Ok(SameKeyAccount)
        }
    }

    struct LockedWallet;

    impl WalletClient for LockedWallet {
        type Account = HdWalletAccount;

        async fn wallet_account(&self) -> Result<HdWalletAccount> {
            Err(TransitionError::WalletUnavailable("locked".into()))
        }
    }

    #[tokio::test]
    async fn test_key_slots_in_order() {
        let funding = account().identity_registration_funding_key(0).unwrap();
        let result = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();

        let keys = result.identity_create_transition.public_keys();
        assert_eq!(keys.len(), 4);
        for (key, slot) in keys.iter().zip(IDENTITY_KEY_SLOTS.iter()) {
            assert_eq!(key.id, slot.index);
            assert_eq!(key.purpose, slot.purpose);
            assert_eq!(key.security_level, slot.security_level);
            assert_eq!(key.key_type, KeyType::EcdsaSecp256k1);
            assert_eq!(key.data.len(), 33);
        }
    }

    #[tokio::test]
    async fn test_keys_match_wallet_derivation() {
        let funding = Secp256k1KeyPair::generate();
        let result = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();

        assert_eq!(result.identity_index, 0);
        let wallet = account();
        for key in result.identity_create_transition.public_keys() {
            let expected = wallet.identity_hd_key(0, key.id).unwrap().public_key_bytes();
            assert_eq!(key.data.as_slice(), &expected[..]);
        }
    }

    #[tokio::test]
    async fn test_transition_signed_by_funding_key() {
        let funding = Secp256k1KeyPair::generate();
        let result = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();

        let transition = &result.identity_create_transition;
        assert_eq!(transition.signature().unwrap().len(), 65);
        assert_eq!(transition.recover_signer().unwrap(), *funding.public_key());
    }

    #[tokio::test]
    async fn test_each_key_signature_verifies() {
        let funding = Secp256k1KeyPair::generate();
        let result = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();

        let transition = &result.identity_create_transition;
        let signable = transition.signable_bytes().unwrap();
        for key in transition.public_keys() {
            let signature = key.signature.as_ref().unwrap();
            verify_by_public_key_data(
                &signable,
                signature.as_slice(),
                key.data.as_slice(),
                key.key_type,
            )
            .unwrap();
            assert_ne!(
                recover_public_key(&signable, signature.as_slice()).unwrap(),
                *funding.public_key()
            );
        }
    }

    #[tokio::test]
    async fn test_identity_id_from_proof() {
        let funding = Secp256k1KeyPair::generate();
        let result = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();

        assert_eq!(result.identity.id, proof().create_identifier());
        assert_eq!(
            result.identity_create_transition.identity_id(),
            result.identity.id
        );
        assert_eq!(result.identity.public_keys().count(), 4);
        assert!(result.identity.public_keys().all(|k| k.signature.is_none()));
        assert_eq!(result.identity.master_keys().count(), 1);
        assert_eq!(
            result.identity.get_public_key_by_id(3).unwrap().purpose,
            Purpose::Transfer
        );
    }

    #[tokio::test]
    async fn test_deterministic_for_same_inputs() {
        let funding = Secp256k1KeyPair::from_secret_bytes(&[4u8; 32]).unwrap();
        let a = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();
        let b = platform()
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();
        assert_eq!(a.identity_create_transition, b.identity_create_transition);
    }

    #[tokio::test]
    async fn test_uses_next_unused_index() {
        let mut wallet_account = account();
        wallet_account.mark_identity_index_used(0);
        wallet_account.mark_identity_index_used(1);
        let platform = Platform::new(LocalWallet::new(wallet_account), PlatformConfig::default());

        let funding = Secp256k1KeyPair::generate();
        let result = platform
            .create_identity_create_transition(proof(), &funding)
            .await
            .unwrap();

        assert_eq!(result.identity_index, 2);
        let master = account().identity_hd_key(2, 0).unwrap().public_key_bytes();
        assert_eq!(
            result.identity_create_transition.public_keys()[0]
                .data
                .as_slice(),
            &master[..]
        );
    }

    #[tokio::test]
    async fn test_wallet_error_propagates() {
        let platform = Platform::new(LockedWallet, PlatformConfig::default());
        let err = platform
            .create_identity_create_transition(proof(), &Secp256k1KeyPair::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::WalletUnavailable(_)));
    }

    #[tokio::test]
    async fn test_invalid_proof_rejected() {
        let empty = AssetLockProof::Instant {
            instant_lock: BinaryData::default(),
            transaction: BinaryData::new(vec![1u8; 10]),
            output_index: 0,
        };
        let err = platform()
            .create_identity_create_transition(empty, &Secp256k1KeyPair::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidAssetLockProof(_)));
    }

    #[tokio::test]
    async fn test_basic_check_rejects_duplicate_key_data() {
        let platform = Platform::new(SameKeyWallet, PlatformConfig::default());
        let err = platform
            .create_identity_create_transition(proof(), &Secp256k1KeyPair::generate())
            .await
            .unwrap_err();
        match err {
            TransitionError::InvalidStateTransition(messages) => assert!(!messages.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_basic_check_can_be_disabled() {
        let config = PlatformConfig::default().with_validate_basic(false);
        let platform = Platform::new(SameKeyWallet, config);
        let result = platform
            .create_identity_create_transition(proof(), &Secp256k1KeyPair::generate())
            .await
            .unwrap();
        assert!(!result.identity_create_transition.validate_basic().is_valid());
    }

    #[test]
    fn test_sign_slot_recovers_to_key() {
        let key = Secp256k1KeyPair::generate();
        let signature = sign_slot(b"signable", &key);
        assert_eq!(
            recover_public_key(b"signable", signature.as_slice()).unwrap(),
            *key.public_key()
        );
    }
}
