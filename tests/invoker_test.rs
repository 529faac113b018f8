//! Contract Invoker and Wallet Session Integration Tests
//!
//! Covers transaction preparation for both invocation modes, the
//! placeholder-bytecode guard, and the submit/confirm path through a
//! mock wallet provider.
//!
//! Run with: cargo test --test invoker_test -- --nocapture

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue};

use verichain::contracts::createFractionCall;
use verichain::invoker::MIN_DEPLOY_BYTECODE_BYTES;
use verichain::mock::{MockWalletProvider, DEFAULT_ACCOUNT};
use verichain::{
    ContractInvoker, InvocationMode, PayloadBuilder, TokenizationPayload, TokenizeConfig,
    TokenizeError, WalletSession,
};

const FACTORY: Address = address!("6e43827c837F3353209C207647682EB66EEffF4B");
const ASSET_NFT: Address = address!("ea49A502F42f6AC2C3f96C39ABcf16E20D45A3eD");

/// Payload for asset "a1" with the production defaults and a custom symbol
fn test_payload() -> TokenizationPayload {
    PayloadBuilder::new(&TokenizeConfig::default())
        .token_symbol("RWA")
        .build(Some("a1"), None)
        .expect("Payload should build")
}

/// Plausible EVM bytecode above the deploy guard threshold
fn deployable_bytecode() -> String {
    format!("0x{}", "6080604052".repeat(8))
}

#[test]
fn test_factory_call_encodes_arguments_in_order() {
    let invoker = ContractInvoker::new(InvocationMode::FactoryCall { factory: FACTORY });
    let payload = test_payload();

    let request = invoker
        .prepare(&payload, DEFAULT_ACCOUNT)
        .expect("Factory preparation should succeed");

    assert_eq!(request.to, Some(FACTORY), "Call must target the factory");
    assert!(!request.is_deployment());
    assert_eq!(request.from, DEFAULT_ACCOUNT);

    // Round-trip the calldata to verify argument order
    let call = createFractionCall::abi_decode(&request.data).expect("Calldata should decode");
    assert_eq!(call.name, "RWA Fraction");
    assert_eq!(call.symbol, "RWA");
    assert_eq!(call.totalSupply, U256::from(1_000_000u64));
    assert_eq!(call.assetNft, ASSET_NFT);
    assert_eq!(call.tokenId, U256::ONE);
}

#[test]
fn test_direct_deploy_init_code_embeds_constructor_args() {
    let invoker = ContractInvoker::new(InvocationMode::DirectDeploy);
    let bytecode = deployable_bytecode();
    let mut payload = test_payload();
    payload.contract_bytecode = Some(bytecode.clone());

    let request = invoker
        .prepare(&payload, DEFAULT_ACCOUNT)
        .expect("Deployment preparation should succeed");

    assert!(request.is_deployment(), "Deployment carries no recipient");

    let code_bytes = hex::decode(bytecode.trim_start_matches("0x")).expect("Valid hex");
    assert!(
        request.data.starts_with(&code_bytes),
        "Init code must start with the contract bytecode"
    );

    // Constructor args are ABI-encoded after the bytecode
    let (name, symbol, supply) =
        <(String, String, U256)>::abi_decode_params(&request.data[code_bytes.len()..])
            .expect("Constructor args should decode");
    assert_eq!(name, "RWA Fraction");
    assert_eq!(symbol, "RWA");
    assert_eq!(supply, U256::from(1_000_000u64));
}

#[test]
fn test_placeholder_bytecode_rejected_without_wallet() {
    let invoker = ContractInvoker::new(InvocationMode::DirectDeploy);

    // Every template shape the scoring service can serve short of real
    // deployment artifacts
    let placeholders = [
        None,
        Some("".to_string()),
        Some("0x".to_string()),
        Some("0x6000...DEADBEEF".to_string()),
        Some(format!("0x{}", "60".repeat(MIN_DEPLOY_BYTECODE_BYTES / 2))),
    ];

    for bytecode in placeholders {
        let mut payload = test_payload();
        payload.contract_bytecode = bytecode.clone();

        let result = invoker.validate_payload(&payload);
        assert!(
            matches!(result, Err(TokenizeError::PlaceholderBytecode(_))),
            "Bytecode {:?} should fail the deploy guard, got: {:?}",
            bytecode,
            result
        );

        // Preparation must fail identically
        assert!(invoker.prepare(&payload, DEFAULT_ACCOUNT).is_err());
    }
}

#[test]
fn test_factory_mode_ignores_template_bytecode() {
    let invoker = ContractInvoker::new(InvocationMode::FactoryCall { factory: FACTORY });
    let mut payload = test_payload();
    payload.contract_bytecode = Some("0x6000...DEADBEEF".to_string());

    // The factory path never deploys template bytecode
    invoker
        .validate_payload(&payload)
        .expect("Factory mode should not run the deploy guard");
}

#[tokio::test]
async fn test_submitted_transaction_flows_through_session() {
    let provider = Arc::new(MockWalletProvider::new());
    let session = WalletSession::connect(provider.clone())
        .await
        .expect("Connection should succeed");
    assert_eq!(session.address(), DEFAULT_ACCOUNT);

    let invoker = ContractInvoker::new(InvocationMode::FactoryCall { factory: FACTORY });
    let tx_hash = invoker
        .submit(&session, &test_payload())
        .await
        .expect("Submission should succeed");

    let sent = provider.sent_requests();
    assert_eq!(sent.len(), 1, "Exactly one transaction should be signed");
    assert_eq!(sent[0].from, DEFAULT_ACCOUNT);
    assert_eq!(sent[0].to, Some(FACTORY));
    assert_ne!(tx_hash, B256::default());
}

#[tokio::test]
async fn test_confirmation_timeout_is_reported() {
    let provider = Arc::new(MockWalletProvider::never_confirming());
    let session = WalletSession::connect(provider)
        .await
        .expect("Connection should succeed");

    let invoker = ContractInvoker::new(InvocationMode::FactoryCall { factory: FACTORY });
    let limit = Duration::from_millis(50);
    let result = invoker
        .invoke(&session, &test_payload(), Some(limit))
        .await;

    match result {
        Ok(receipt) => panic!("Expected timeout, got receipt {:?}", receipt.transaction_hash),
        Err(TokenizeError::ConfirmationTimeout { waited }) => {
            assert_eq!(waited, limit, "Error should carry the elapsed limit");
        }
        Err(other) => panic!("Expected ConfirmationTimeout error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_reverted_transaction_surfaces_failure() {
    let provider = Arc::new(MockWalletProvider::reverting());
    let session = WalletSession::connect(provider)
        .await
        .expect("Connection should succeed");

    let invoker = ContractInvoker::new(InvocationMode::FactoryCall { factory: FACTORY });
    let result = invoker.invoke(&session, &test_payload(), None).await;

    match result {
        Ok(_) => panic!("Reverted transaction should not confirm"),
        Err(TokenizeError::TransactionFailed { reason }) => {
            assert!(
                reason.contains("reverted"),
                "Failure should name the revert, got: {}",
                reason
            );
        }
        Err(other) => panic!("Expected TransactionFailed error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_declined_connection_is_user_rejection() {
    let provider = Arc::new(MockWalletProvider::rejecting_connection());
    let result = WalletSession::connect(provider).await;

    assert!(
        matches!(result, Err(TokenizeError::UserRejected(_))),
        "Declined prompt should map to UserRejected, got: {:?}",
        result.map(|_| ())
    );
}

#[tokio::test]
async fn test_locked_wallet_is_unavailable() {
    let provider = Arc::new(MockWalletProvider::with_accounts(vec![]));
    let result = WalletSession::connect(provider).await;

    match result {
        Ok(_) => panic!("Connection without accounts should fail"),
        Err(TokenizeError::WalletUnavailable(msg)) => {
            assert!(msg.contains("no accounts"), "Got: {}", msg);
        }
        Err(other) => panic!("Expected WalletUnavailable error, got: {:?}", other),
    }
}
