//! Wallet provider abstraction and sessions
//!
//! The wallet is an opaque capability behind [`WalletProvider`]: request
//! account access, sign-and-send, await confirmation. A [`WalletSession`]
//! binds to the first account the provider serves. Sessions are never
//! cached across workflows; each tokenization attempt re-validates signer
//! availability at its approval step.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::receipt::TransactionReceipt;
use crate::{Result, TokenizeError};

// ============================================================================
// Data Structures
// ============================================================================

/// What a wallet is asked to sign and broadcast
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Sender account (the session's bound address)
    pub from: Address,

    /// Recipient contract; `None` is contract creation
    pub to: Option<Address>,

    /// Calldata, or init code for a creation
    pub data: Bytes,

    /// Native value attached to the call
    pub value: U256,
}

impl TransactionRequest {
    /// Contract call with calldata and no attached value
    pub fn call(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from,
            to: Some(to),
            data,
            value: U256::ZERO,
        }
    }

    /// Contract creation carrying init code
    pub fn deployment(from: Address, init_code: Bytes) -> Self {
        Self {
            from,
            to: None,
            data: init_code,
            value: U256::ZERO,
        }
    }

    /// Whether this request creates a contract
    pub fn is_deployment(&self) -> bool {
        self.to.is_none()
    }
}

// ============================================================================
// Wallet Provider Trait
// ============================================================================

/// Opaque wallet capability
///
/// Implementations wrap an injected browser provider, a remote signer, or
/// the in-crate mock. Failures surface through the workflow taxonomy: a
/// declined prompt is `UserRejected`, a missing capability is
/// `WalletUnavailable`, and broadcast or confirmation failure is
/// `TransactionFailed` with the revert reason when available.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request account access
    ///
    /// Returns the accounts the user authorized, first one primary.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Sign and broadcast a transaction, returning the pending hash
    ///
    /// This is the point of no return: once the hash is returned the
    /// transaction is in flight and cannot be cancelled by this crate.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256>;

    /// Suspend until the transaction is mined and return its receipt
    async fn await_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt>;
}

// ============================================================================
// Wallet Session
// ============================================================================

/// An authorized signer bound to one account
#[derive(Clone)]
pub struct WalletSession {
    address: Address,
    provider: Arc<dyn WalletProvider>,
}

impl WalletSession {
    /// Connect to a wallet provider
    ///
    /// Requests account access and binds to the first account served. An
    /// empty account list is `WalletUnavailable`; a declined prompt
    /// surfaces the provider's `UserRejected`.
    pub async fn connect(provider: Arc<dyn WalletProvider>) -> Result<Self> {
        log::info!("🔌 Connecting wallet session");

        let accounts = provider.request_accounts().await?;
        let address = accounts.first().copied().ok_or_else(|| {
            TokenizeError::WalletUnavailable("provider served no accounts".to_string())
        })?;

        log::info!("   ✅ Session bound to {}", address);
        Ok(Self { address, provider })
    }

    /// The account this session signs with
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign and broadcast through the session's provider
    pub async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256> {
        log::info!(
            "✍️  Requesting signature from {} ({})",
            self.address,
            if request.is_deployment() {
                "deployment".to_string()
            } else {
                format!("call to {}", request.to.unwrap_or_default())
            }
        );

        let tx_hash = self.provider.send_transaction(request).await?;
        log::info!("   📡 Broadcast: {}", tx_hash);
        Ok(tx_hash)
    }

    /// Wait for a broadcast transaction to be mined
    pub async fn await_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        log::info!("⏳ Awaiting confirmation of {}", tx_hash);

        let receipt = self.provider.await_confirmation(tx_hash).await?;
        log::info!(
            "   ⛏️  Mined in block {} (status: {})",
            receipt.block_number,
            if receipt.status { "success" } else { "reverted" }
        );
        Ok(receipt)
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
