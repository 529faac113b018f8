//! Scoring Service Integration Tests
//!
//! Runs the scoring mock in-process on an ephemeral port and exercises
//! the HTTP client against it: upload and registration, scoring by asset
//! id and by raw text, HTTP error mapping, and the deployment-template
//! path end to end through the orchestrator.
//!
//! Run with: cargo test --test scoring_test -- --nocapture

use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use scorer_mock::{create_router, AssetStore};

use verichain::contracts::createFractionCall;
use verichain::mock::MockWalletProvider;
use verichain::{
    Asset, ChainNetwork, ScoringClient, TokenizationOrchestrator, TokenizationWorkflow,
    TokenizeConfig, TokenizeError, WorkflowState,
};

const FACTORY: Address = address!("6e43827c837F3353209C207647682EB66EEffF4B");
const ASSET_NFT: Address = address!("ea49A502F42f6AC2C3f96C39ABcf16E20D45A3eD");

/// Property document with enough substance to score above zero
const DEED_TEXT: &str = "Warranty deed for asset 7 Harbor Lane. Valuation: 2,500,000 USD (2024). \
    Annual lease revenue 180,000 USD with fraction ownership rights, transfer \
    obligations and projected yield 7.2%. Token custodian: VeriChain.";

/// Start the scoring mock on an ephemeral port, returning its base URL
async fn spawn_scoring_mock() -> String {
    let store = Arc::new(AssetStore::new());
    let app = create_router(store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read bound address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server crashed");
    });

    format!("http://{}", addr)
}

/// Configuration pointing the orchestrator at the in-process mock
fn config_for(base_url: String, factory: Option<Address>) -> TokenizeConfig {
    TokenizeConfig {
        network: ChainNetwork::Local,
        scoring_url: base_url,
        factory_address: factory,
        asset_nft_address: ASSET_NFT,
        asset_token_id: U256::ONE,
        confirmation_timeout: None,
    }
}

#[tokio::test]
async fn test_upload_then_score_by_asset_id() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();

    let base_url = spawn_scoring_mock().await;
    let client = ScoringClient::new(&base_url);

    // Step 1: upload registers the document and assigns an id
    let asset = client
        .upload("deed.txt", DEED_TEXT.as_bytes().to_vec())
        .await
        .expect("Upload should succeed");
    let asset_id = asset.id.as_deref().expect("Upload should assign an asset id");
    assert!(
        asset
            .extracted_text
            .as_deref()
            .unwrap_or_default()
            .contains("Warranty deed"),
        "Preview should carry the extracted text"
    );

    // Step 2: score the registered asset
    let result = client
        .submit_for_scoring(Some(asset_id), None)
        .await
        .expect("Scoring should succeed");

    assert!(
        result.score > 0.0 && result.score <= 100.0,
        "Score out of range: {}",
        result.score
    );
    let hits = result.breakdown["keyword_hits"]
        .as_u64()
        .expect("Breakdown should count keyword hits");
    assert!(hits >= 6, "Document should hit the keyword list, got {}", hits);
}

#[tokio::test]
async fn test_upload_preview_is_truncated() {
    let base_url = spawn_scoring_mock().await;
    let client = ScoringClient::new(&base_url);

    let long_document = "asset valuation record 2024 ".repeat(200);
    let asset = client
        .upload("ledger.txt", long_document.into_bytes())
        .await
        .expect("Upload should succeed");

    let preview = asset.extracted_text.expect("Preview should be present");
    assert_eq!(
        preview.chars().count(),
        1000,
        "Preview is capped at 1000 characters"
    );
}

#[tokio::test]
async fn test_scores_raw_text_without_registration() {
    let base_url = spawn_scoring_mock().await;
    let client = ScoringClient::new(&base_url);

    let result = client
        .submit_for_scoring(None, Some(DEED_TEXT))
        .await
        .expect("Raw text scoring should succeed");
    assert!(result.score > 0.0);
}

#[tokio::test]
async fn test_asset_id_takes_precedence_over_raw_text() {
    let base_url = spawn_scoring_mock().await;
    let client = ScoringClient::new(&base_url);

    let asset = client
        .upload("deed.txt", DEED_TEXT.as_bytes().to_vec())
        .await
        .expect("Upload should succeed");
    let asset_id = asset.id.as_deref().expect("Upload should assign an asset id");

    let by_id = client
        .submit_for_scoring(Some(asset_id), None)
        .await
        .expect("Scoring by id should succeed");
    let with_conflicting_text = client
        .submit_for_scoring(Some(asset_id), Some("tiny"))
        .await
        .expect("Scoring should succeed");

    assert_eq!(
        by_id.score, with_conflicting_text.score,
        "Raw text must be ignored when an asset id is given"
    );
}

#[tokio::test]
async fn test_unknown_asset_id_maps_to_service_unavailable() {
    let base_url = spawn_scoring_mock().await;
    let client = ScoringClient::new(&base_url);

    let result = client.submit_for_scoring(Some("no-such-asset"), None).await;

    match result {
        Ok(score) => panic!("Expected a 404 mapping, got score {}", score.score),
        Err(TokenizeError::ServiceUnavailable { status, message }) => {
            assert_eq!(status, Some(404), "Status code should be carried over");
            assert!(!message.is_empty());
        }
        Err(other) => panic!("Expected ServiceUnavailable error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_scoring_request_is_rejected_client_side() {
    let base_url = spawn_scoring_mock().await;
    let client = ScoringClient::new(&base_url);

    // Neither id nor text; the client refuses before any request is sent
    let result = client.submit_for_scoring(None, None).await;
    assert!(
        matches!(result, Err(TokenizeError::InvalidInput(_))),
        "Expected InvalidInput, got: {:?}",
        result
    );
}

#[tokio::test]
async fn test_placeholder_template_blocks_direct_deployment() {
    let base_url = spawn_scoring_mock().await;
    let provider = Arc::new(MockWalletProvider::new());

    // No factory configured: the orchestrator falls back to direct
    // deployment and must fetch the template from the scoring service
    let orchestrator = TokenizationOrchestrator::new(config_for(base_url, None))
        .with_provider(provider.clone());

    let asset = orchestrator
        .scoring()
        .upload("deed.txt", DEED_TEXT.as_bytes().to_vec())
        .await
        .expect("Upload should succeed");
    let mut workflow = TokenizationWorkflow::new(asset);

    let result = orchestrator.run(&mut workflow).await;
    assert!(
        matches!(result, Err(TokenizeError::PlaceholderBytecode(_))),
        "Template bytecode is a placeholder and must be refused, got: {:?}",
        result
    );

    assert_eq!(workflow.state(), WorkflowState::Failed);
    assert!(
        workflow.score().is_some(),
        "The scoring prefix should have completed before the guard fired"
    );
    assert!(workflow.tx_hash().is_none());
    assert_eq!(
        provider.interaction_count(),
        0,
        "The guard must fire before any wallet interaction"
    );
}

#[tokio::test]
async fn test_scored_factory_workflow_resolves() {
    let base_url = spawn_scoring_mock().await;
    let provider = Arc::new(MockWalletProvider::new());
    let orchestrator = TokenizationOrchestrator::new(config_for(base_url, Some(FACTORY)))
        .with_provider(provider.clone());

    // Step 1: upload and register
    let asset = orchestrator
        .scoring()
        .upload("deed.txt", DEED_TEXT.as_bytes().to_vec())
        .await
        .expect("Upload should succeed");

    // Step 2: score, then tokenize with the configured defaults
    let mut workflow = TokenizationWorkflow::new(asset);
    let resolved = orchestrator
        .run(&mut workflow)
        .await
        .expect("Workflow should resolve");

    assert_eq!(workflow.state(), WorkflowState::Resolved);
    let score = workflow.score().expect("Score should be recorded");
    assert!(score.score > 0.0 && score.score <= 100.0);
    assert_ne!(resolved.token_address, Address::ZERO);

    // Step 3: the factory call used the production defaults
    let sent = provider.sent_requests();
    assert_eq!(sent.len(), 1);
    let call = createFractionCall::abi_decode(&sent[0].data).expect("Calldata should decode");
    assert_eq!(call.name, "RWA Fraction");
    assert_eq!(call.symbol, "RWAF");
    assert_eq!(call.totalSupply, U256::from(1_000_000u64));
}

#[tokio::test]
async fn test_raw_text_asset_scores_but_cannot_tokenize() {
    let base_url = spawn_scoring_mock().await;
    let provider = Arc::new(MockWalletProvider::new());
    let orchestrator = TokenizationOrchestrator::new(config_for(base_url, Some(FACTORY)))
        .with_provider(provider.clone());

    let mut workflow = TokenizationWorkflow::new(Asset::from_text(DEED_TEXT));

    // Scoring works on raw text alone
    orchestrator
        .score(&mut workflow)
        .await
        .expect("Raw text should score");
    assert_eq!(workflow.state(), WorkflowState::ScoreReady);

    // Tokenization needs a registered asset
    let result = orchestrator.tokenize(&mut workflow).await;
    assert!(
        matches!(result, Err(TokenizeError::MissingAsset)),
        "Expected MissingAsset, got: {:?}",
        result
    );
    assert_eq!(workflow.state(), WorkflowState::Failed);
    assert_eq!(provider.interaction_count(), 0);
}
