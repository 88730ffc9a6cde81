//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle:
//! 1. Create and save an encrypted wallet
//! 2. Reload it and derive the registration funding key
//! 3. Build and sign an identity-create transition
//! 4. Check every signature and the basic structure
//! 5. Record the identity index and build the next identity

use identity_transition::crypto::signing::verify_by_public_key_data;
use identity_transition::wallet::{load_wallet, record_used_identity_index, save_wallet};
use identity_transition::{
    AssetLockProof, BinaryData, HdWalletAccount, IdentityCreateResult, IdentityCreateTransition,
    KeyType, LocalWallet, Network, Platform, PlatformConfig, Purpose, SecurityLevel,
    WalletAccount,
};

fn instant_proof(tag: u8) -> AssetLockProof {
    AssetLockProof::Instant {
        instant_lock: BinaryData::new(vec![tag; 32]),
        transaction: BinaryData::new(vec![tag.wrapping_add(1); 200]),
        output_index: 0,
    }
}

async fn build(account: HdWalletAccount, proof: AssetLockProof) -> IdentityCreateResult {
    let funding = account.identity_registration_funding_key(0).unwrap();
    let platform = Platform::new(LocalWallet::new(account), PlatformConfig::default());
    platform
        .create_identity_create_transition(proof, &funding)
        .await
        .unwrap()
}

#[tokio::test]
async fn full_workflow_wallet_to_signed_transition() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.wallet");

    // ── Step 1: Create and save a wallet ────────────────────────────────
    let account = HdWalletAccount::from_seed(&[77u8; 64], Network::Testnet).unwrap();
    save_wallet(&account, &path, "workflow-pass").unwrap();

    // ── Step 2: Reload it ───────────────────────────────────────────────
    let account = load_wallet(&path, "workflow-pass").unwrap();
    let funding = account.identity_registration_funding_key(0).unwrap();

    // ── Step 3: Build the transition ────────────────────────────────────
    let platform = Platform::new(LocalWallet::new(account), PlatformConfig::default());
    let result = platform
        .create_identity_create_transition(instant_proof(1), &funding)
        .await
        .unwrap();
    assert_eq!(result.identity_index, 0);

    // ── Step 4: Check signatures and structure ──────────────────────────
    let transition = &result.identity_create_transition;
    assert_eq!(transition.identity_id(), instant_proof(1).create_identifier());
    assert_eq!(transition.recover_signer().unwrap(), *funding.public_key());
    transition
        .verify_signature_by_public_key_data(&funding.public_key_bytes(), KeyType::EcdsaSecp256k1)
        .unwrap();

    let signable = transition.signable_bytes().unwrap();
    for key in transition.public_keys() {
        verify_by_public_key_data(
            &signable,
            key.signature.as_ref().unwrap().as_slice(),
            key.data.as_slice(),
            key.key_type,
        )
        .unwrap();
    }
    assert!(transition.validate_basic().is_valid());

    let transfer = &transition.public_keys()[3];
    assert_eq!(transfer.purpose, Purpose::Transfer);
    assert_eq!(transfer.security_level, SecurityLevel::Critical);

    // ── Step 5: Record the index; the next build moves on ───────────────
    record_used_identity_index(&path, result.identity_index).unwrap();
    let account = load_wallet(&path, "workflow-pass").unwrap();
    assert_eq!(account.unused_identity_index().unwrap(), 1);

    let next = build(account, instant_proof(9)).await;
    assert_eq!(next.identity_index, 1);
    assert_ne!(
        next.identity_create_transition.public_keys()[0].data,
        transition.public_keys()[0].data
    );
}

#[tokio::test]
async fn transition_survives_json_roundtrip() {
    let account = HdWalletAccount::from_seed(&[5u8; 32], Network::Testnet).unwrap();
    let result = build(account, instant_proof(3)).await;

    let json = serde_json::to_string(&result.identity_create_transition).unwrap();
    let decoded: IdentityCreateTransition = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, result.identity_create_transition);
    assert!(decoded.validate_basic().is_valid());
    assert_eq!(
        decoded.recover_signer().unwrap(),
        result
            .identity_create_transition
            .recover_signer()
            .unwrap()
    );
}

#[tokio::test]
async fn tampered_transition_fails_basic_check() {
    let account = HdWalletAccount::from_seed(&[6u8; 32], Network::Testnet).unwrap();
    let funding = account.identity_registration_funding_key(0).unwrap();
    let result = build(account, instant_proof(4)).await;

    let mut transition = result.identity_create_transition;
    let mut keys = transition.public_keys().to_vec();
    keys[1].set_security_level(SecurityLevel::Medium);
    transition.set_public_keys(keys);

    assert!(!transition.validate_basic().is_valid());
    // The funding signature no longer covers these bytes.
    assert_ne!(transition.recover_signer().ok(), Some(*funding.public_key()));
}

#[tokio::test]
async fn mainnet_and_testnet_wallets_differ() {
    let testnet = HdWalletAccount::from_seed(&[8u8; 32], Network::Testnet).unwrap();
    let mainnet = HdWalletAccount::from_seed(&[8u8; 32], Network::Mainnet).unwrap();

    let a = build(testnet, instant_proof(2)).await;
    let b = build(mainnet, instant_proof(2)).await;

    assert_eq!(a.identity.id, b.identity.id);
    assert_ne!(
        a.identity_create_transition.public_keys()[0].data,
        b.identity_create_transition.public_keys()[0].data
    );
}
