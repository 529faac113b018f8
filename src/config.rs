//! Tokenization configuration from environment variables
//!
//! Controls the target network, scoring service endpoint, and the deployed
//! contract addresses the invoker talks to. Defaults to Sepolia with the
//! production deployment's addresses.

use std::env;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};

/// FractionFactory deployment on Sepolia
pub const SEPOLIA_FACTORY_ADDRESS: Address = address!("6e43827c837F3353209C207647682EB66EEffF4B");

/// AssetNFT deployment on Sepolia
pub const SEPOLIA_ASSET_NFT_ADDRESS: Address =
    address!("ea49A502F42f6AC2C3f96C39ABcf16E20D45A3eD");

/// Scoring service production endpoint
pub const DEFAULT_SCORING_URL: &str = "https://verichain-xlrz.onrender.com";

/// Target chain for tokenization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainNetwork {
    /// Ethereum Sepolia testnet (production deployment)
    Sepolia,
    /// Local development node (anvil/hardhat)
    Local,
}

impl ChainNetwork {
    /// EIP-155 chain id for this network
    pub fn chain_id(&self) -> u64 {
        match self {
            ChainNetwork::Sepolia => 11_155_111,
            ChainNetwork::Local => 31_337,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TokenizeConfig {
    /// Target chain
    pub network: ChainNetwork,
    /// Scoring service base URL
    pub scoring_url: String,
    /// FractionFactory address; `None` switches the invoker to direct deployment
    pub factory_address: Option<Address>,
    /// AssetNFT contract the fractions are tied to
    pub asset_nft_address: Address,
    /// Token id of the asset NFT being fractionalized
    pub asset_token_id: U256,
    /// Bounded confirmation wait; `None` waits indefinitely
    pub confirmation_timeout: Option<Duration>,
}

impl TokenizeConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CHAIN_NETWORK`: "sepolia" (default) or "local"
    /// - `SCORING_URL`: scoring service endpoint (optional, has per-network defaults)
    /// - `FACTORY_ADDRESS`: FractionFactory address, or "none" to force direct deployment
    /// - `ASSET_NFT_ADDRESS`: AssetNFT contract address
    /// - `ASSET_TOKEN_ID`: token id of the asset NFT (default 1)
    /// - `CONFIRMATION_TIMEOUT_SECS`: bounded confirmation wait, 0 or unset waits forever
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Use Sepolia (default)
    /// cargo run
    ///
    /// # Use a local node with a local scoring mock
    /// CHAIN_NETWORK=local SCORING_URL=http://localhost:8000 cargo run
    /// ```
    pub fn from_env() -> Self {
        let network_str = env::var("CHAIN_NETWORK")
            .unwrap_or_else(|_| "sepolia".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "local" => {
                log::info!("🔧 Using LOCAL network");
                ChainNetwork::Local
            }
            "sepolia" | "" => {
                log::info!("🌐 Using SEPOLIA network");
                ChainNetwork::Sepolia
            }
            other => {
                log::warn!("⚠️  Unknown network '{}', defaulting to Sepolia", other);
                ChainNetwork::Sepolia
            }
        };

        // Determine scoring service URL
        let scoring_url = env::var("SCORING_URL").unwrap_or_else(|_| {
            let default_url = match network {
                ChainNetwork::Local => {
                    log::info!("📡 Scoring URL: http://localhost:8000 (local default)");
                    "http://localhost:8000".to_string()
                }
                ChainNetwork::Sepolia => {
                    log::info!("📡 Scoring URL: {}", DEFAULT_SCORING_URL);
                    DEFAULT_SCORING_URL.to_string()
                }
            };
            default_url
        });

        // Factory address: per-network default, explicit "none" forces direct deployment
        let factory_address = match env::var("FACTORY_ADDRESS") {
            Ok(s) if s.eq_ignore_ascii_case("none") => {
                log::info!("🔧 Factory disabled, invoker will deploy directly");
                None
            }
            Ok(s) => match s.parse::<Address>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    log::warn!("⚠️  Invalid FACTORY_ADDRESS '{}' ({}), using default", s, e);
                    default_factory(network)
                }
            },
            Err(_) => default_factory(network),
        };
        if let Some(addr) = factory_address {
            log::info!("🏭 Factory address: {}", addr);
        }

        let asset_nft_address = env::var("ASSET_NFT_ADDRESS")
            .ok()
            .and_then(|s| match s.parse::<Address>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    log::warn!("⚠️  Invalid ASSET_NFT_ADDRESS '{}' ({}), using default", s, e);
                    None
                }
            })
            .unwrap_or(SEPOLIA_ASSET_NFT_ADDRESS);
        log::info!("🖼️  Asset NFT address: {}", asset_nft_address);

        let asset_token_id = env::var("ASSET_TOKEN_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(U256::from)
            .unwrap_or(U256::ONE);

        let confirmation_timeout = env::var("CONFIRMATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        if let Some(timeout) = confirmation_timeout {
            log::info!("⏱️  Confirmation timeout: {:?}", timeout);
        }

        Self {
            network,
            scoring_url,
            factory_address,
            asset_nft_address,
            asset_token_id,
            confirmation_timeout,
        }
    }

    /// Block explorer link for a transaction on this network
    ///
    /// Returns `None` on networks without a public explorer.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        match self.network {
            ChainNetwork::Sepolia => Some(format!("https://sepolia.etherscan.io/tx/{}", tx_hash)),
            ChainNetwork::Local => None,
        }
    }
}

fn default_factory(network: ChainNetwork) -> Option<Address> {
    match network {
        ChainNetwork::Sepolia => Some(SEPOLIA_FACTORY_ADDRESS),
        // Local nodes have no well-known deployment
        ChainNetwork::Local => None,
    }
}

impl Default for TokenizeConfig {
    /// Default configuration (Sepolia production deployment)
    fn default() -> Self {
        Self {
            network: ChainNetwork::Sepolia,
            scoring_url: DEFAULT_SCORING_URL.to_string(),
            factory_address: Some(SEPOLIA_FACTORY_ADDRESS),
            asset_nft_address: SEPOLIA_ASSET_NFT_ADDRESS,
            asset_token_id: U256::ONE,
            confirmation_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sepolia() {
        let config = TokenizeConfig::default();
        assert!(matches!(config.network, ChainNetwork::Sepolia));
        assert_eq!(config.factory_address, Some(SEPOLIA_FACTORY_ADDRESS));
        assert_eq!(config.asset_token_id, U256::ONE);
    }

    #[test]
    fn test_chain_id() {
        assert_eq!(ChainNetwork::Sepolia.chain_id(), 11_155_111);
        assert_eq!(ChainNetwork::Local.chain_id(), 31_337);
    }

    #[test]
    fn test_explorer_url_only_on_public_networks() {
        let sepolia = TokenizeConfig::default();
        assert!(sepolia
            .explorer_tx_url("0xabc")
            .expect("sepolia has an explorer")
            .contains("sepolia.etherscan.io"));

        let local = TokenizeConfig {
            network: ChainNetwork::Local,
            ..Default::default()
        };
        assert_eq!(local.explorer_tx_url("0xabc"), None);
    }
}
