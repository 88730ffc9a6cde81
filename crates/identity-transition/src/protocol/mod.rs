//! Protocol surface consumed by the identity-create builder.
//!
//! Only what identity creation needs: identifiers, public key
//! descriptors, asset lock proofs, identities, and the identity-create
//! state transition with its signing and basic structure check.
//! Consensus validation and broadcasting are not part of this crate.

pub mod asset_lock;
pub mod binary;
pub mod factory;
pub mod identity;
pub mod public_key;
pub mod transition;
pub mod validation;

pub use asset_lock::AssetLockProof;
pub use binary::{BinaryData, Identifier};
pub use factory::IdentityFactory;
pub use identity::Identity;
pub use public_key::{IdentityPublicKey, KeyId, KeyType, Purpose, SecurityLevel};
pub use transition::IdentityCreateTransition;
pub use validation::{BasicError, ValidationResult};
