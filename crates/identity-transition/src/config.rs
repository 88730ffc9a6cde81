//! Runtime configuration.
//!
//! `PlatformConfig::default()` targets testnet with basic validation on.
//! `from_env` layers `IDTX_*` environment variables over the defaults.

use std::env;
use std::fmt;
use std::str::FromStr;

use bitcoin::NetworkKind;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransitionError};

/// Protocol version stamped on new transitions unless overridden.
pub const DEFAULT_PROTOCOL_VERSION: u32 = 1;

/// Network the wallet and transitions belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Regtest,
}

impl Network {
    /// BIP44 coin type used in identity derivation paths.
    pub fn coin_type(&self) -> u32 {
        match self {
            Self::Mainnet => 5,
            Self::Testnet | Self::Devnet | Self::Regtest => 1,
        }
    }

    /// Extended key version bytes to use for this network.
    pub fn network_kind(&self) -> NetworkKind {
        match self {
            Self::Mainnet => NetworkKind::Main,
            Self::Testnet | Self::Devnet | Self::Regtest => NetworkKind::Test,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "devnet" | "dev" => Ok(Self::Devnet),
            "regtest" | "local" => Ok(Self::Regtest),
            other => Err(TransitionError::InvalidConfig(format!(
                "unknown network '{other}'"
            ))),
        }
    }
}

/// Settings for [`crate::platform::Platform`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub network: Network,
    pub protocol_version: u32,
    /// Run the local basic structure check before returning a transition.
    pub validate_basic: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            validate_basic: true,
        }
    }
}

impl PlatformConfig {
    /// Read `IDTX_NETWORK`, `IDTX_PROTOCOL_VERSION` and `IDTX_VALIDATE_BASIC`.
    ///
    /// Unset variables keep their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(network) = env::var("IDTX_NETWORK") {
            config.network = network.parse()?;
        }
        if let Ok(version) = env::var("IDTX_PROTOCOL_VERSION") {
            config.protocol_version = version.trim().parse().map_err(|_| {
                TransitionError::InvalidConfig(format!("invalid IDTX_PROTOCOL_VERSION '{version}'"))
            })?;
        }
        if let Ok(flag) = env::var("IDTX_VALIDATE_BASIC") {
            config.validate_basic = parse_bool(&flag).ok_or_else(|| {
                TransitionError::InvalidConfig(format!("invalid IDTX_VALIDATE_BASIC '{flag}'"))
            })?;
        }

        Ok(config)
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_validate_basic(mut self, validate_basic: bool) -> Self {
        self.validate_basic = validate_basic;
        self
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
