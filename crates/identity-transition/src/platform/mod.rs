//! Client-side platform glue.
//!
//! [`Platform`] ties a wallet client to an identity factory and turns a
//! funded asset lock into a signed identity-create transition.

pub mod identity_create;

pub use identity_create::{sign_slot, IdentityCreateResult, KeySlot, IDENTITY_KEY_SLOTS};

use crate::config::PlatformConfig;
use crate::protocol::IdentityFactory;
use crate::wallet::WalletClient;

/// Platform client bound to a wallet.
#[derive(Debug)]
pub struct Platform<C: WalletClient> {
    client: C,
    factory: IdentityFactory,
    config: PlatformConfig,
}

impl<C: WalletClient> Platform<C> {
    pub fn new(client: C, config: PlatformConfig) -> Self {
        let factory = IdentityFactory::new(config.protocol_version);
        Self {
            client,
            factory,
            config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn factory(&self) -> &IdentityFactory {
        &self.factory
    }
}
