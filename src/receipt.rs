//! Receipt decoding and token address resolution
//!
//! Decodes confirmed-transaction logs against the table of known event
//! schemas and extracts the created fraction token's address. Resolution is
//! strictly first-match in emitted order: logs are ordered by execution,
//! and the creation event is expected exactly once per transaction. Logs
//! that fail to decode are skipped without aborting the scan.

use std::collections::HashMap;

use alloy_primitives::{Address, Log, B256, U256};
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::contracts::{AssetMinted, FractionCreated, Transfer};
use crate::{Result, TokenizeError};

/// Name of the factory's creation event
pub const CREATION_EVENT: &str = "FractionCreated";

// ============================================================================
// Data Structures
// ============================================================================

/// Confirmed record of a transaction
///
/// Ephemeral: owned by the invoker for the duration of one call, read by
/// the resolver, then dropped with the workflow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Hash of the confirmed transaction
    pub transaction_hash: B256,

    /// Block the transaction was mined in
    pub block_number: u64,

    /// Execution outcome; `false` means the transaction reverted
    pub status: bool,

    /// Created contract address, populated for deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,

    /// Emitted logs in execution order
    pub logs: Vec<Log>,
}

/// A log decoded against one of the known event schemas
#[derive(Clone, Debug, PartialEq)]
pub enum KnownEvent {
    /// Factory created a fraction token
    FractionCreated {
        token_address: Address,
        asset_nft: Address,
        token_id: U256,
        total_supply: U256,
    },
    /// ERC-20 transfer (genesis mint instrumentation)
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    /// AssetNFT registered an asset
    AssetMinted {
        to: Address,
        token_id: U256,
        token_uri: String,
    },
}

impl KnownEvent {
    /// Event name as declared in the contract interface
    pub fn name(&self) -> &'static str {
        match self {
            KnownEvent::FractionCreated { .. } => "FractionCreated",
            KnownEvent::Transfer { .. } => "Transfer",
            KnownEvent::AssetMinted { .. } => "AssetMinted",
        }
    }

    /// Address of the contract this event reports as created, if any
    pub fn created_token_address(&self) -> Option<Address> {
        match self {
            KnownEvent::FractionCreated { token_address, .. } => Some(*token_address),
            _ => None,
        }
    }
}

// ============================================================================
// Event Registry
// ============================================================================

/// Decoder for one event schema
///
/// Returns `None` when the log does not decode against the schema. No
/// panics, no error-based control flow.
pub type EventDecoder = fn(&Log) -> Option<KnownEvent>;

/// Lookup table from event signature hash (topic0) to decoder
///
/// The registry is the single place new event schemas get added; the
/// resolver itself never changes.
pub struct EventRegistry {
    decoders: HashMap<B256, EventDecoder>,
}

impl EventRegistry {
    /// Empty registry with no known schemas
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry with every schema the toolkit knows
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(FractionCreated::SIGNATURE_HASH, decode_fraction_created);
        registry.register(Transfer::SIGNATURE_HASH, decode_transfer);
        registry.register(AssetMinted::SIGNATURE_HASH, decode_asset_minted);
        registry
    }

    /// Register a decoder for an event signature hash
    ///
    /// Replaces any decoder previously registered for the same topic.
    pub fn register(&mut self, topic0: B256, decoder: EventDecoder) {
        self.decoders.insert(topic0, decoder);
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether the registry has no schemas
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode a single log against the registered schemas
    ///
    /// `None` when the topic is unknown or the log body does not match the
    /// schema registered for it (topic collisions with different indexing
    /// layouts land here).
    pub fn decode(&self, log: &Log) -> Option<KnownEvent> {
        let topic0 = log.data.topics().first()?;
        let decoder = self.decoders.get(topic0)?;
        decoder(log)
    }

    /// Extract the created token address from a receipt
    ///
    /// Scans logs in emitted order and returns the address carried by the
    /// first log that decodes to the expected event. Undecodable logs are
    /// skipped. A full scan without a match fails with `EventNotFound`;
    /// a null or placeholder address is never fabricated.
    pub fn resolve_token_address(
        &self,
        receipt: &TransactionReceipt,
        expected: &str,
    ) -> Result<Address> {
        log::debug!(
            "🔍 Scanning {} logs for {} event",
            receipt.logs.len(),
            expected
        );

        for (index, log) in receipt.logs.iter().enumerate() {
            match self.decode(log) {
                Some(event) if event.name() == expected => {
                    match event.created_token_address() {
                        Some(address) => {
                            log::info!("   ✅ {} found at log index {}: {}", expected, index, address);
                            return Ok(address);
                        }
                        // Matched an event that carries no creation address
                        None => log::debug!(
                            "   {} at index {} carries no token address, continuing",
                            expected,
                            index
                        ),
                    }
                }
                Some(other) => {
                    log::debug!("   Skipping {} at log index {}", other.name(), index);
                }
                None => {
                    log::debug!("   Skipping undecodable log at index {}", index);
                }
            }
        }

        Err(TokenizeError::EventNotFound(format!(
            "no {} event in {} logs of tx {}",
            expected,
            receipt.logs.len(),
            receipt.transaction_hash
        )))
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

fn decode_fraction_created(log: &Log) -> Option<KnownEvent> {
    let event = FractionCreated::decode_log_data(&log.data).ok()?;
    Some(KnownEvent::FractionCreated {
        token_address: event.tokenAddress,
        asset_nft: event.assetNft,
        token_id: event.tokenId,
        total_supply: event.totalSupply,
    })
}

fn decode_transfer(log: &Log) -> Option<KnownEvent> {
    let event = Transfer::decode_log_data(&log.data).ok()?;
    Some(KnownEvent::Transfer {
        from: event.from,
        to: event.to,
        value: event.value,
    })
}

fn decode_asset_minted(log: &Log) -> Option<KnownEvent> {
    let event = AssetMinted::decode_log_data(&log.data).ok()?;
    Some(KnownEvent::AssetMinted {
        to: event.to,
        token_id: event.tokenId,
        token_uri: event.tokenUri,
    })
}
