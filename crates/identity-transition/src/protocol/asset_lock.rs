//! Asset lock proofs: evidence of the funding transaction that
//! anchors an identity's creation.

use bitcoin::consensus::encode::serialize as consensus_serialize;
use bitcoin::hashes::Hash;
use bitcoin::{OutPoint, Txid};
use serde::{Deserialize, Serialize};

use super::binary::{BinaryData, Identifier};
use crate::crypto::hash::sha256d;
use crate::error::{Result, TransitionError};

/// Proof that funds were locked for identity creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetLockProof {
    /// Locked output confirmed by an instant-send lock.
    #[serde(rename_all = "camelCase")]
    Instant {
        instant_lock: BinaryData,
        transaction: BinaryData,
        output_index: u32,
    },
    /// Locked output confirmed by a chain-locked block.
    #[serde(rename_all = "camelCase")]
    Chain {
        core_chain_locked_height: u32,
        out_point: OutPoint,
    },
}

impl AssetLockProof {
    /// The locked output this proof refers to.
    pub fn out_point(&self) -> OutPoint {
        match self {
            Self::Instant {
                transaction,
                output_index,
                ..
            } => OutPoint {
                txid: Txid::from_byte_array(sha256d(transaction.as_slice())),
                vout: *output_index,
            },
            Self::Chain { out_point, .. } => *out_point,
        }
    }

    /// Identity identifier derived from the locked output:
    /// double-SHA256 of the 36-byte out point.
    pub fn create_identifier(&self) -> Identifier {
        let out_point_bytes = consensus_serialize(&self.out_point());
        Identifier::new(sha256d(&out_point_bytes))
    }

    /// Reject proofs that are missing the parts a transition needs.
    pub fn check(&self) -> Result<()> {
        match self {
            Self::Instant {
                instant_lock,
                transaction,
                ..
            } => {
                if instant_lock.is_empty() {
                    return Err(TransitionError::InvalidAssetLockProof(
                        "instant lock is empty".into(),
                    ));
                }
                if transaction.is_empty() {
                    return Err(TransitionError::InvalidAssetLockProof(
                        "transaction is empty".into(),
                    ));
                }
            }
            Self::Chain {
                core_chain_locked_height,
                ..
            } => {
                if *core_chain_locked_height == 0 {
                    return Err(TransitionError::InvalidAssetLockProof(
                        "core chain locked height must be positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
