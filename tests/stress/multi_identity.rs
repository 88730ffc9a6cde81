//! Stress test: build identity-create transitions for 50 consecutive
//! wallet indices, verify all keys are unique, every transition passes
//! the basic check, and rebuilding is deterministic.

use std::collections::HashSet;

use identity_transition::{
    AssetLockProof, BinaryData, HdWalletAccount, IdentityCreateResult, LocalWallet, Network,
    Platform, PlatformConfig, WalletAccount,
};

const IDENTITIES: u32 = 50;

fn seed_account() -> HdWalletAccount {
    HdWalletAccount::from_seed(&[0xA5; 64], Network::Testnet).unwrap()
}

fn proof_for(index: u32) -> AssetLockProof {
    let mut transaction = vec![0u8; 120];
    transaction[..4].copy_from_slice(&index.to_le_bytes());
    AssetLockProof::Instant {
        instant_lock: BinaryData::new(vec![1u8; 32]),
        transaction: BinaryData::new(transaction),
        output_index: 0,
    }
}

#[tokio::test]
async fn stress_50_identities_unique_keys() {
    let mut account = seed_account();
    let mut key_data = HashSet::new();
    let mut identity_ids = HashSet::new();

    for i in 0..IDENTITIES {
        let funding = account.identity_registration_funding_key(i).unwrap();
        let platform = Platform::new(LocalWallet::new(account), PlatformConfig::default());
        let result = platform
            .create_identity_create_transition(proof_for(i), &funding)
            .await
            .unwrap();

        assert_eq!(result.identity_index, i);
        assert!(
            identity_ids.insert(result.identity.id),
            "duplicate identity id at index {i}"
        );
        for key in result.identity_create_transition.public_keys() {
            assert!(
                key_data.insert(key.data.as_slice().to_vec()),
                "duplicate key data at index {i}, slot {}",
                key.id
            );
        }
        assert!(result.identity_create_transition.validate_basic().is_valid());

        account = platform.into_client().into_account();
        account.mark_identity_index_used(result.identity_index);
    }

    assert_eq!(identity_ids.len(), IDENTITIES as usize);
    assert_eq!(key_data.len(), IDENTITIES as usize * 4);
}

async fn build_at(index: u32) -> IdentityCreateResult {
    let account = seed_account().with_used_identity_indices(0..index);
    let funding = account.identity_registration_funding_key(index).unwrap();
    Platform::new(LocalWallet::new(account), PlatformConfig::default())
        .create_identity_create_transition(proof_for(index), &funding)
        .await
        .unwrap()
}

#[tokio::test]
async fn stress_rebuild_is_deterministic() {
    for i in 0..10 {
        let a = build_at(i).await;
        let b = build_at(i).await;
        assert_eq!(a.identity_index, i);
        assert_eq!(a.identity_create_transition, b.identity_create_transition);
    }
}
