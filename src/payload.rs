//! Tokenization payload construction
//!
//! Builds the on-chain call parameters for one tokenization from
//! config-seeded defaults plus per-workflow overrides. Construction is a
//! pure function of its inputs: the same asset and the same builder always
//! produce the same payload.
//!
//! The valuation score is accepted here but does not influence the payload.
//! This is a deliberate simplification carried over from the production
//! flow; a future version could gate supply or fraction count by score
//! tier, which is a product decision rather than a plumbing one.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TokenizeConfig;
use crate::scoring::{DeploymentTemplate, ScoreResult};
use crate::{Result, TokenizeError};

// ============================================================================
// Data Structures
// ============================================================================

/// Token name used when no override is given
pub const DEFAULT_TOKEN_NAME: &str = "RWA Fraction";

/// Token symbol used when no override is given
pub const DEFAULT_TOKEN_SYMBOL: &str = "RWAF";

/// Total supply used when no override is given
pub const DEFAULT_TOTAL_SUPPLY: u64 = 1_000_000;

/// Fraction count used when no override is given
pub const DEFAULT_FRACTION_COUNT: u64 = 1_000;

/// On-chain call parameters for one tokenization
///
/// Everything the contract invoker needs: the fraction token parameters,
/// the asset NFT binding, and (direct-deploy mode only) the contract
/// artifacts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenizationPayload {
    /// Fraction token name
    pub token_name: String,

    /// Fraction token symbol
    pub token_symbol: String,

    /// Total supply in token units, exact integer
    pub total_supply: U256,

    /// Number of ownership fractions the supply represents
    pub fraction_count: u64,

    /// Asset NFT contract the fractions are tied to
    pub asset_nft: Address,

    /// Token id of the asset NFT
    pub token_id: U256,

    /// Contract ABI, present only for direct deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_abi: Option<Value>,

    /// Creation bytecode hex, present only for direct deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_bytecode: Option<String>,
}

impl TokenizationPayload {
    /// Fill in missing contract artifacts from a deployment template
    ///
    /// Artifacts already present on the payload are kept; only absent
    /// fields are taken from the template.
    pub fn apply_template(&mut self, template: &DeploymentTemplate) {
        if self.contract_abi.is_none() {
            self.contract_abi = template.contract_abi.clone();
        }
        if self.contract_bytecode.is_none() {
            self.contract_bytecode = template.contract_bytecode.clone();
        }
    }
}

// ============================================================================
// Payload Builder
// ============================================================================

/// Builder for [`TokenizationPayload`]
///
/// Seeded from configuration, overridden per workflow with the fluent
/// setters. `build` validates and assembles the payload.
#[derive(Clone, Debug)]
pub struct PayloadBuilder {
    token_name: String,
    token_symbol: String,
    total_supply: U256,
    fraction_count: u64,
    asset_nft: Address,
    token_id: U256,
}

impl PayloadBuilder {
    /// Create a builder seeded with the configured defaults
    pub fn new(config: &TokenizeConfig) -> Self {
        Self {
            token_name: DEFAULT_TOKEN_NAME.to_string(),
            token_symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            total_supply: U256::from(DEFAULT_TOTAL_SUPPLY),
            fraction_count: DEFAULT_FRACTION_COUNT,
            asset_nft: config.asset_nft_address,
            token_id: config.asset_token_id,
        }
    }

    /// Override the fraction token name
    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.token_name = name.into();
        self
    }

    /// Override the fraction token symbol
    pub fn token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.token_symbol = symbol.into();
        self
    }

    /// Override the total supply (exact token units)
    pub fn total_supply(mut self, supply: U256) -> Self {
        self.total_supply = supply;
        self
    }

    /// Override the fraction count
    pub fn fraction_count(mut self, count: u64) -> Self {
        self.fraction_count = count;
        self
    }

    /// Override the asset NFT contract address
    pub fn asset_nft(mut self, address: Address) -> Self {
        self.asset_nft = address;
        self
    }

    /// Override the asset NFT token id
    pub fn token_id(mut self, id: U256) -> Self {
        self.token_id = id;
        self
    }

    /// Build the payload for the given asset
    ///
    /// Deterministic: identical builder state and arguments produce an
    /// identical payload.
    ///
    /// # Arguments
    ///
    /// * `asset_id` - identifier assigned by the scoring service
    /// * `score` - advisory valuation; recorded by the workflow but not
    ///   applied to the payload
    ///
    /// # Errors
    ///
    /// - `MissingAsset` when no asset identifier is available
    /// - `InvalidInput` for an empty name/symbol or a zero supply or
    ///   fraction count
    pub fn build(
        &self,
        asset_id: Option<&str>,
        score: Option<&ScoreResult>,
    ) -> Result<TokenizationPayload> {
        // 1. An asset must have been uploaded before tokenization
        let asset_id = match asset_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(TokenizeError::MissingAsset),
        };

        // 2. Validate token parameters
        if self.token_name.trim().is_empty() {
            return Err(TokenizeError::invalid_input("token name must not be empty"));
        }
        if self.token_symbol.trim().is_empty() {
            return Err(TokenizeError::invalid_input(
                "token symbol must not be empty",
            ));
        }
        if self.total_supply.is_zero() {
            return Err(TokenizeError::invalid_input(
                "total supply must be greater than zero",
            ));
        }
        if self.fraction_count == 0 {
            return Err(TokenizeError::invalid_input(
                "fraction count must be greater than zero",
            ));
        }

        // 3. The score stays advisory
        if let Some(score) = score {
            log::debug!(
                "Building payload for asset {} (advisory score {:.3})",
                asset_id,
                score.score
            );
        } else {
            log::debug!("Building payload for asset {} (unscored)", asset_id);
        }

        Ok(TokenizationPayload {
            token_name: self.token_name.clone(),
            token_symbol: self.token_symbol.clone(),
            total_supply: self.total_supply,
            fraction_count: self.fraction_count,
            asset_nft: self.asset_nft,
            token_id: self.token_id,
            contract_abi: None,
            contract_bytecode: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_score(value: f64) -> ScoreResult {
        ScoreResult {
            score: value,
            breakdown: json!({ "keyword_score": 0.5 }),
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = TokenizeConfig::default();
        let builder = PayloadBuilder::new(&config).token_symbol("RWA");

        let first = builder
            .build(Some("a1"), Some(&test_score(72.0)))
            .expect("payload should build");
        let second = builder
            .build(Some("a1"), Some(&test_score(72.0)))
            .expect("payload should build");

        assert_eq!(first, second);
    }

    #[test]
    fn test_score_does_not_influence_payload() {
        let config = TokenizeConfig::default();
        let builder = PayloadBuilder::new(&config);

        let scored = builder
            .build(Some("a1"), Some(&test_score(99.9)))
            .expect("payload should build");
        let unscored = builder.build(Some("a1"), None).expect("payload should build");

        assert_eq!(scored, unscored);
    }

    #[test]
    fn test_build_without_asset_is_missing_asset() {
        let config = TokenizeConfig::default();
        let builder = PayloadBuilder::new(&config);

        assert!(matches!(
            builder.build(None, None),
            Err(TokenizeError::MissingAsset)
        ));
        assert!(matches!(
            builder.build(Some("   "), None),
            Err(TokenizeError::MissingAsset)
        ));
    }

    #[test]
    fn test_zero_supply_is_rejected() {
        let config = TokenizeConfig::default();
        let builder = PayloadBuilder::new(&config).total_supply(U256::ZERO);

        assert!(matches!(
            builder.build(Some("a1"), None),
            Err(TokenizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let config = TokenizeConfig::default();
        let builder = PayloadBuilder::new(&config).token_name("  ");

        assert!(matches!(
            builder.build(Some("a1"), None),
            Err(TokenizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_defaults_match_the_production_flow() {
        let config = TokenizeConfig::default();
        let payload = PayloadBuilder::new(&config)
            .build(Some("a1"), None)
            .expect("payload should build");

        assert_eq!(payload.token_name, "RWA Fraction");
        assert_eq!(payload.token_symbol, "RWAF");
        assert_eq!(payload.total_supply, U256::from(1_000_000u64));
        assert_eq!(payload.fraction_count, 1_000);
        assert_eq!(payload.asset_nft, config.asset_nft_address);
        assert!(payload.contract_bytecode.is_none());
    }

    #[test]
    fn test_apply_template_fills_only_missing_artifacts() {
        let config = TokenizeConfig::default();
        let mut payload = PayloadBuilder::new(&config)
            .build(Some("a1"), None)
            .expect("payload should build");
        payload.contract_bytecode = Some("0xfeed".to_string());

        let template = DeploymentTemplate {
            status: Some("ready_for_deployment".to_string()),
            contract_abi: Some(json!([{ "type": "constructor" }])),
            contract_bytecode: Some("0xdead".to_string()),
            constructor_args: None,
        };
        payload.apply_template(&template);

        // Existing bytecode kept, missing ABI filled in
        assert_eq!(payload.contract_bytecode.as_deref(), Some("0xfeed"));
        assert!(payload.contract_abi.is_some());
    }
}
