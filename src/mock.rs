//! Deterministic wallet provider for tests and local development
//!
//! [`MockWalletProvider`] implements [`WalletProvider`] without a browser
//! or a chain: accounts are configured up front, transaction hashes are
//! derived deterministically, and confirmations are served from scripted
//! receipts or synthesized from the submitted calldata. Every entry point
//! is recorded, so tests can assert the exact requests a workflow produced
//! and that a failing workflow produced none.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy_primitives::{address, keccak256, Address, Log, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;

use crate::contracts::{createFractionCall, FractionCreated, Transfer};
use crate::receipt::TransactionReceipt;
use crate::wallet::{TransactionRequest, WalletProvider};
use crate::{Result, TokenizeError};

/// Account the mock serves by default (well-known local dev account)
pub const DEFAULT_ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Scripted wallet provider
///
/// Defaults to a fully cooperative wallet: one account, every transaction
/// accepted, every confirmation a synthesized success receipt. The
/// constructors configure the failure modes a real wallet can exhibit.
pub struct MockWalletProvider {
    accounts: Vec<Address>,
    reject_connection: bool,
    reject_signing: bool,
    revert_on_confirm: bool,
    never_confirm: bool,
    scripted_receipts: Mutex<VecDeque<TransactionReceipt>>,
    sent: Mutex<Vec<(B256, TransactionRequest)>>,
    interactions: AtomicUsize,
    nonce: AtomicU64,
    block_number: AtomicU64,
}

impl MockWalletProvider {
    /// Cooperative wallet serving the default dev account
    pub fn new() -> Self {
        Self::with_accounts(vec![DEFAULT_ACCOUNT])
    }

    /// Cooperative wallet serving the given accounts
    ///
    /// An empty list simulates a locked wallet: connection succeeds at the
    /// provider level but the session has nothing to bind to.
    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            reject_connection: false,
            reject_signing: false,
            revert_on_confirm: false,
            never_confirm: false,
            scripted_receipts: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            interactions: AtomicUsize::new(0),
            nonce: AtomicU64::new(0),
            block_number: AtomicU64::new(0),
        }
    }

    /// Wallet that declines the connection prompt
    pub fn rejecting_connection() -> Self {
        Self {
            reject_connection: true,
            ..Self::new()
        }
    }

    /// Wallet that connects but declines every signing prompt
    pub fn rejecting_signature() -> Self {
        Self {
            reject_signing: true,
            ..Self::new()
        }
    }

    /// Wallet whose transactions mine but revert
    pub fn reverting() -> Self {
        Self {
            revert_on_confirm: true,
            ..Self::new()
        }
    }

    /// Wallet whose transactions never confirm
    pub fn never_confirming() -> Self {
        Self {
            never_confirm: true,
            ..Self::new()
        }
    }

    /// Queue a receipt to serve for the next confirmation
    ///
    /// Scripted receipts are served in order before any synthesis; the
    /// receipt's transaction hash is rewritten to the confirmed one.
    pub fn with_receipt(self, receipt: TransactionReceipt) -> Self {
        self.scripted_receipts
            .lock()
            .expect("mock lock poisoned")
            .push_back(receipt);
        self
    }

    /// Every transaction request this provider signed, in order
    pub fn sent_requests(&self) -> Vec<TransactionRequest> {
        self.sent
            .lock()
            .expect("mock lock poisoned")
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// Total provider entry points hit (connect, send, confirm)
    pub fn interaction_count(&self) -> usize {
        self.interactions.load(Ordering::SeqCst)
    }

    fn next_tx_hash(&self, request: &TransactionRequest) -> B256 {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let mut preimage = Vec::with_capacity(request.data.len() + 28);
        preimage.extend_from_slice(request.from.as_slice());
        preimage.extend_from_slice(&nonce.to_le_bytes());
        preimage.extend_from_slice(&request.data);
        keccak256(preimage)
    }

    /// Build a coherent success receipt from the submitted request
    ///
    /// Factory calls get a genesis-mint `Transfer` followed by
    /// `FractionCreated`; deployments get a contract address and the mint
    /// log only. Unrecognized calldata succeeds without events.
    fn synthesize_receipt(&self, tx_hash: B256, request: &TransactionRequest) -> TransactionReceipt {
        let block_number = 1 + self.block_number.fetch_add(1, Ordering::SeqCst);
        let token_address = Address::from_slice(&tx_hash[12..]);

        let (contract_address, logs) = if request.is_deployment() {
            let mint = mint_transfer_log(token_address, request.from, U256::ZERO);
            (Some(token_address), vec![mint])
        } else if let Ok(call) = createFractionCall::abi_decode(&request.data) {
            let mint = mint_transfer_log(token_address, request.from, call.totalSupply);
            let created = fraction_created_log(
                request.to.unwrap_or_default(),
                token_address,
                call.assetNft,
                call.tokenId,
                call.totalSupply,
            );
            (None, vec![mint, created])
        } else {
            (None, Vec::new())
        };

        TransactionReceipt {
            transaction_hash: tx_hash,
            block_number,
            status: !self.revert_on_confirm,
            contract_address,
            logs,
        }
    }
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.interactions.fetch_add(1, Ordering::SeqCst);

        if self.reject_connection {
            return Err(TokenizeError::UserRejected(
                "connection request declined".to_string(),
            ));
        }
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<B256> {
        self.interactions.fetch_add(1, Ordering::SeqCst);

        if self.reject_signing {
            return Err(TokenizeError::UserRejected(
                "signing request declined in wallet".to_string(),
            ));
        }

        let tx_hash = self.next_tx_hash(request);
        self.sent
            .lock()
            .expect("mock lock poisoned")
            .push((tx_hash, request.clone()));
        log::debug!("Mock wallet accepted tx {}", tx_hash);
        Ok(tx_hash)
    }

    async fn await_confirmation(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        self.interactions.fetch_add(1, Ordering::SeqCst);

        if self.never_confirm {
            log::debug!("Mock wallet holding {} unconfirmed", tx_hash);
            std::future::pending::<()>().await;
        }

        let request = self
            .sent
            .lock()
            .expect("mock lock poisoned")
            .iter()
            .find(|(hash, _)| *hash == tx_hash)
            .map(|(_, request)| request.clone())
            .ok_or_else(|| {
                TokenizeError::transaction_failed(format!("unknown transaction {}", tx_hash))
            })?;

        let scripted = self
            .scripted_receipts
            .lock()
            .expect("mock lock poisoned")
            .pop_front();

        let receipt = match scripted {
            Some(mut receipt) => {
                receipt.transaction_hash = tx_hash;
                receipt
            }
            None => self.synthesize_receipt(tx_hash, &request),
        };
        Ok(receipt)
    }
}

// ============================================================================
// Log and Receipt Builders
// ============================================================================

/// Encoded `FractionCreated` log as the factory emits it
pub fn fraction_created_log(
    factory: Address,
    token_address: Address,
    asset_nft: Address,
    token_id: U256,
    total_supply: U256,
) -> Log {
    let event = FractionCreated {
        tokenAddress: token_address,
        assetNft: asset_nft,
        tokenId: token_id,
        totalSupply: total_supply,
    };
    Log {
        address: factory,
        data: event.encode_log_data(),
    }
}

/// Encoded genesis-mint `Transfer` log (from the zero address)
pub fn mint_transfer_log(token: Address, to: Address, value: U256) -> Log {
    let event = Transfer {
        from: Address::ZERO,
        to,
        value,
    };
    Log {
        address: token,
        data: event.encode_log_data(),
    }
}

/// Log with a topic no registry knows
pub fn unknown_event_log(emitter: Address) -> Log {
    Log::new_unchecked(
        emitter,
        vec![keccak256(b"Unknown(uint256)")],
        Default::default(),
    )
}

/// Success receipt over the given logs
pub fn receipt_with_logs(tx_hash: B256, logs: Vec<Log>) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: tx_hash,
        block_number: 1,
        status: true,
        contract_address: None,
        logs,
    }
}
