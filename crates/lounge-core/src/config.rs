//! ============================================================================
//! Lounge Configuration
//! ============================================================================
//! Membership NFT constants and endpoint URLs, injected into the page
//! controller at startup. Defaults carry the production membership NFT;
//! every field can be overridden from `LOUNGE_*` environment variables.
//! ============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::types::{Address, AddressError};

/// Membership NFT contract (ERC-1155 collection on Polygon)
pub const MEMBERSHIP_NFT_CONTRACT_ADDRESS: &str = "0x8b0A0b7Ba195E37065fc28436875877FDa0b1A15";

/// Token id inside the collection that grants membership
pub const MEMBERSHIP_NFT_TOKEN_ID: &str = "0";

/// Minimum number of tokens a member must hold
pub const MEMBERSHIP_NFT_TOKEN_COUNT: u64 = 1;

pub const OPENSEA_LINK: &str =
    "https://opensea.io/assets/matic/0x8b0A0b7Ba195E37065fc28436875877FDa0b1A15/0";

pub const PRIVATE_INVITE_LINK: &str = "https://discord.gg/thirdweb";

/// Polygon mainnet
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Lounge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoungeConfig {
    pub contract_address: Address,
    /// Decimal token id (uint256)
    pub token_id: String,
    pub required_count: u64,
    pub marketplace_url: String,
    pub invite_url: String,
    pub chain_id: u64,
    pub chain_name: String,
    /// Base URL of the site serving `/api/request_access` and `/lounge`
    pub site_url: String,
    /// Chain node answering read-only `eth_call`
    pub node_rpc_url: String,
    /// Wallet provider answering `eth_requestAccounts` / `personal_sign`
    pub wallet_rpc_url: String,
}

impl Default for LoungeConfig {
    fn default() -> Self {
        Self {
            contract_address: Address::parse(MEMBERSHIP_NFT_CONTRACT_ADDRESS)
                .expect("membership contract constant is a valid address"),
            token_id: MEMBERSHIP_NFT_TOKEN_ID.to_string(),
            required_count: MEMBERSHIP_NFT_TOKEN_COUNT,
            marketplace_url: OPENSEA_LINK.to_string(),
            invite_url: PRIVATE_INVITE_LINK.to_string(),
            chain_id: POLYGON_CHAIN_ID,
            chain_name: "Polygon".to_string(),
            site_url: "http://localhost:3000".to_string(),
            node_rpc_url: "https://polygon-rpc.com".to_string(),
            wallet_rpc_url: "http://localhost:8545".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid contract address: {0}")]
    ContractAddress(#[from] AddressError),

    #[error("Token id must be a decimal integer, got {0:?}")]
    TokenId(String),

    #[error("Required token count must be at least 1")]
    RequiredCount,

    #[error("Invalid {name}: {value:?} ({reason})")]
    Value {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl LoungeConfig {
    /// Defaults overridden by `LOUNGE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("LOUNGE_CONTRACT_ADDRESS") {
            config.contract_address = Address::parse(&v)?;
        }
        if let Some(v) = lookup("LOUNGE_TOKEN_ID") {
            config.token_id = v.trim().to_string();
        }
        if let Some(v) = lookup("LOUNGE_REQUIRED_COUNT") {
            config.required_count = v.trim().parse().map_err(|e| ConfigError::Value {
                name: "LOUNGE_REQUIRED_COUNT",
                value: v.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(v) = lookup("LOUNGE_CHAIN_ID") {
            config.chain_id = v.trim().parse().map_err(|e| ConfigError::Value {
                name: "LOUNGE_CHAIN_ID",
                value: v.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(v) = lookup("LOUNGE_CHAIN_NAME") {
            config.chain_name = v;
        }
        if let Some(v) = lookup("LOUNGE_MARKETPLACE_URL") {
            config.marketplace_url = v;
        }
        if let Some(v) = lookup("LOUNGE_INVITE_URL") {
            config.invite_url = v;
        }
        if let Some(v) = lookup("LOUNGE_SITE_URL") {
            config.site_url = v;
        }
        if let Some(v) = lookup("LOUNGE_NODE_RPC_URL") {
            config.node_rpc_url = v;
        }
        if let Some(v) = lookup("LOUNGE_WALLET_RPC_URL") {
            config.wallet_rpc_url = v;
        }

        config.validate()?;
        debug!(
            "Lounge config: contract={} token_id={} required={} chain={}",
            config.contract_address, config.token_id, config.required_count, config.chain_id
        );
        Ok(config)
    }

    /// Check the fields that cannot be expressed in the types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_id.is_empty() || !self.token_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::TokenId(self.token_id.clone()));
        }
        if self.required_count == 0 {
            return Err(ConfigError::RequiredCount);
        }
        for (name, value) in [
            ("site_url", &self.site_url),
            ("node_rpc_url", &self.node_rpc_url),
            ("wallet_rpc_url", &self.wallet_rpc_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::Value {
                name,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Site base URL (validated)
    pub fn site_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site_url).map_err(|e| ConfigError::Value {
            name: "site_url",
            value: self.site_url.clone(),
            reason: e.to_string(),
        })
    }
}
