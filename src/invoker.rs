//! Contract invocation
//!
//! Turns a tokenization payload into a broadcast, confirmed transaction.
//! Two modes: calling a deployed FractionFactory (normal path) or deploying
//! the fraction token directly from the payload's ABI + bytecode (fallback
//! when no factory address is known).
//!
//! `prepare` is pure and runs the placeholder-bytecode guard, so unusable
//! deployment artifacts are rejected before any wallet interaction.

use std::time::Duration;

use alloy_primitives::{Address, B256};

use crate::config::TokenizeConfig;
use crate::contracts;
use crate::payload::TokenizationPayload;
use crate::receipt::TransactionReceipt;
use crate::wallet::{TransactionRequest, WalletSession};
use crate::{Result, TokenizeError};

/// Minimum plausible creation bytecode size in decoded bytes
///
/// Real compiled contracts run to kilobytes; anything shorter is a
/// placeholder that would burn gas without deploying a usable token.
pub const MIN_DEPLOY_BYTECODE_BYTES: usize = 32;

/// How the fraction token comes into existence
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvocationMode {
    /// Call `createFraction` on a deployed factory
    FactoryCall { factory: Address },

    /// Deploy the token contract directly from payload artifacts
    DirectDeploy,
}

/// Prepares, submits, and confirms tokenization transactions
pub struct ContractInvoker {
    mode: InvocationMode,
}

impl ContractInvoker {
    /// Create an invoker with an explicit mode
    pub fn new(mode: InvocationMode) -> Self {
        Self { mode }
    }

    /// Select the mode from configuration
    ///
    /// A known factory address selects the factory call; otherwise the
    /// invoker falls back to direct deployment.
    pub fn from_config(config: &TokenizeConfig) -> Self {
        let mode = match config.factory_address {
            Some(factory) => InvocationMode::FactoryCall { factory },
            None => InvocationMode::DirectDeploy,
        };
        Self::new(mode)
    }

    /// Get the selected invocation mode
    pub fn mode(&self) -> &InvocationMode {
        &self.mode
    }

    /// Check a payload against the selected mode without touching a wallet
    ///
    /// Direct-deploy mode runs the placeholder-bytecode guard; factory
    /// mode needs nothing beyond what the payload builder validated.
    pub fn validate_payload(&self, payload: &TokenizationPayload) -> Result<()> {
        match &self.mode {
            InvocationMode::FactoryCall { .. } => Ok(()),
            InvocationMode::DirectDeploy => {
                decode_deploy_bytecode(payload.contract_bytecode.as_deref()).map(|_| ())
            }
        }
    }

    /// Build the transaction request for a payload
    ///
    /// Pure: no wallet or network interaction. Factory mode ABI-encodes the
    /// `createFraction` call with the payload's parameters in declaration
    /// order. Direct-deploy mode validates the payload bytecode (absent,
    /// empty, `0x`, non-hex, or implausibly short all fail with
    /// `PlaceholderBytecode`) and appends the encoded constructor
    /// arguments.
    pub fn prepare(
        &self,
        payload: &TokenizationPayload,
        from: Address,
    ) -> Result<TransactionRequest> {
        match &self.mode {
            InvocationMode::FactoryCall { factory } => {
                log::debug!(
                    "🔧 Preparing createFraction({}, {}, {}, {}, {})",
                    payload.token_name,
                    payload.token_symbol,
                    payload.total_supply,
                    payload.asset_nft,
                    payload.token_id
                );
                let data = contracts::create_fraction_calldata(
                    &payload.token_name,
                    &payload.token_symbol,
                    payload.total_supply,
                    payload.asset_nft,
                    payload.token_id,
                );
                Ok(TransactionRequest::call(from, *factory, data))
            }
            InvocationMode::DirectDeploy => {
                let bytecode = decode_deploy_bytecode(payload.contract_bytecode.as_deref())?;
                log::debug!(
                    "🔧 Preparing direct deployment ({} bytecode bytes)",
                    bytecode.len()
                );
                let init_code = contracts::fraction_init_code(
                    &bytecode,
                    &payload.token_name,
                    &payload.token_symbol,
                    payload.total_supply,
                );
                Ok(TransactionRequest::deployment(from, init_code))
            }
        }
    }

    /// Prepare, sign, and broadcast; returns the pending transaction hash
    ///
    /// Once the hash is returned the transaction is in flight: there is no
    /// cancellation, only awaiting a terminal outcome.
    pub async fn submit(
        &self,
        session: &WalletSession,
        payload: &TokenizationPayload,
    ) -> Result<B256> {
        let request = self.prepare(payload, session.address())?;
        session.send_transaction(&request).await
    }

    /// Wait for a submitted transaction to be mined and check its status
    ///
    /// With a timeout the wait is bounded and expiry fails with
    /// `ConfirmationTimeout`; without one the wait is unbounded. A mined
    /// transaction with a failed status is `TransactionFailed`, distinct
    /// from the timeout.
    pub async fn confirm(
        &self,
        session: &WalletSession,
        tx_hash: B256,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt> {
        let receipt = match timeout {
            Some(limit) => tokio::time::timeout(limit, session.await_confirmation(tx_hash))
                .await
                .map_err(|_| {
                    log::error!("   ❌ No confirmation within {:?}", limit);
                    TokenizeError::ConfirmationTimeout { waited: limit }
                })??,
            None => session.await_confirmation(tx_hash).await?,
        };

        if !receipt.status {
            return Err(TokenizeError::transaction_failed(format!(
                "transaction {} reverted",
                tx_hash
            )));
        }

        Ok(receipt)
    }

    /// Submit and confirm in one step
    pub async fn invoke(
        &self,
        session: &WalletSession,
        payload: &TokenizationPayload,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt> {
        let tx_hash = self.submit(session, payload).await?;
        self.confirm(session, tx_hash, timeout).await
    }
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Decode and sanity-check deployment bytecode
///
/// Rejects everything a placeholder template could carry: missing field,
/// empty string, bare `0x`, non-hex characters, or code too short to be a
/// compiled contract.
fn decode_deploy_bytecode(bytecode: Option<&str>) -> Result<Vec<u8>> {
    let raw = bytecode.unwrap_or_default().trim();
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);

    if stripped.is_empty() {
        return Err(TokenizeError::PlaceholderBytecode(
            "payload carries no deployable bytecode".to_string(),
        ));
    }

    let bytes = hex::decode(stripped).map_err(|e| {
        TokenizeError::PlaceholderBytecode(format!("bytecode is not valid hex: {}", e))
    })?;

    if bytes.len() < MIN_DEPLOY_BYTECODE_BYTES {
        return Err(TokenizeError::PlaceholderBytecode(format!(
            "bytecode is {} bytes, compiled creation code is at least {}",
            bytes.len(),
            MIN_DEPLOY_BYTECODE_BYTES
        )));
    }

    Ok(bytes)
}
