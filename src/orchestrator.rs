//! Tokenization workflow orchestration
//!
//! The root of the crate: sequences scoring, payload preparation, wallet
//! approval, confirmation, and receipt resolution for one asset, tracking
//! an explicit state machine along the way.
//!
//! # State machine
//!
//! ```text
//! Idle ──(score requested)──> Scoring ──(scored)──> ScoreReady
//! Idle | ScoreReady ──(invoke)──> PreparingPayload ──> PayloadReady
//! PayloadReady ──> AwaitingWalletApproval ──(signed)──> AwaitingConfirmation
//! AwaitingConfirmation ──(mined)──> Resolved
//! any non-terminal ──(error)──> Failed
//! ```
//!
//! `Resolved` and `Failed` are terminal: a finished workflow refuses to run
//! again, and retrying means creating a new workflow instance. State lives
//! in memory only; a workflow abandoned mid-flight is lost, and re-running
//! the deployment may duplicate the on-chain token if the original
//! transaction later confirms. Once a transaction is broadcast there is no
//! cancellation, only awaiting the terminal outcome.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use verichain::{
//!     Asset, TokenizationOrchestrator, TokenizationWorkflow, TokenizeConfig,
//! };
//!
//! let config = TokenizeConfig::from_env();
//! let orchestrator = TokenizationOrchestrator::new(config)
//!     .with_provider(Arc::new(browser_provider));
//!
//! // Upload, then drive the full flow
//! let asset = orchestrator.scoring().upload("deed.pdf", bytes).await?;
//! let mut workflow = TokenizationWorkflow::new(asset);
//! let token = orchestrator.run(&mut workflow).await?;
//! println!("fraction token at {}", token.token_address);
//! ```

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenizeConfig;
use crate::invoker::{ContractInvoker, InvocationMode};
use crate::payload::{PayloadBuilder, TokenizationPayload};
use crate::receipt::{EventRegistry, CREATION_EVENT};
use crate::scoring::{Asset, ScoreResult, ScoringClient};
use crate::wallet::{WalletProvider, WalletSession};
use crate::{Result, TokenizeError};

// ============================================================================
// Data Structures
// ============================================================================

/// Position of a workflow in the tokenization sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    /// Fresh workflow, nothing attempted
    Idle,
    /// Score request in flight
    Scoring,
    /// Score received, tokenization not yet started
    ScoreReady,
    /// Building the on-chain call parameters
    PreparingPayload,
    /// Payload built and validated
    PayloadReady,
    /// Waiting for the user to approve in their wallet
    AwaitingWalletApproval,
    /// Transaction broadcast, waiting for it to be mined
    AwaitingConfirmation,
    /// Token address recovered; terminal
    Resolved,
    /// Classified failure recorded; terminal
    Failed,
}

impl WorkflowState {
    /// Whether this state ends the workflow
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Resolved | WorkflowState::Failed)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::Scoring => "Scoring",
            WorkflowState::ScoreReady => "ScoreReady",
            WorkflowState::PreparingPayload => "PreparingPayload",
            WorkflowState::PayloadReady => "PayloadReady",
            WorkflowState::AwaitingWalletApproval => "AwaitingWalletApproval",
            WorkflowState::AwaitingConfirmation => "AwaitingConfirmation",
            WorkflowState::Resolved => "Resolved",
            WorkflowState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Terminal artifact of a successful workflow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedToken {
    /// Address of the created fraction token
    pub token_address: Address,
    /// Transaction that created it
    pub transaction_hash: B256,
}

/// One tokenization attempt for one asset
///
/// Holds the asset, the state, and everything produced along the way. A
/// workflow is driven by a [`TokenizationOrchestrator`] and is not
/// reusable once terminal.
pub struct TokenizationWorkflow {
    id: Uuid,
    asset: Asset,
    state: WorkflowState,
    score: Option<ScoreResult>,
    payload: Option<TokenizationPayload>,
    tx_hash: Option<B256>,
    failure: Option<TokenizeError>,
    started_at: DateTime<Utc>,
}

impl TokenizationWorkflow {
    /// Create a fresh workflow for an asset
    pub fn new(asset: Asset) -> Self {
        let id = Uuid::new_v4();
        log::debug!("🆕 Workflow {} created for asset {:?}", id, asset.id);

        Self {
            id,
            asset,
            state: WorkflowState::Idle,
            score: None,
            payload: None,
            tx_hash: None,
            failure: None,
            started_at: Utc::now(),
        }
    }

    /// Unique id of this attempt
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The asset being tokenized
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Current position in the sequence
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Valuation received during the scoring prefix, if any
    pub fn score(&self) -> Option<&ScoreResult> {
        self.score.as_ref()
    }

    /// Payload built for this attempt, if preparation got that far
    pub fn payload(&self) -> Option<&TokenizationPayload> {
        self.payload.as_ref()
    }

    /// Hash of the broadcast transaction
    ///
    /// `None` until the wallet accepts the submission; a rejected approval
    /// never records a hash.
    pub fn tx_hash(&self) -> Option<B256> {
        self.tx_hash
    }

    /// The classified failure that ended this workflow, if it failed
    pub fn failure(&self) -> Option<&TokenizeError> {
        self.failure.as_ref()
    }

    /// When this workflow was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn transition(&mut self, next: WorkflowState) {
        log::info!("📊 Workflow {}: {} → {}", self.id, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: &TokenizeError) {
        log::error!(
            "❌ Workflow {} failed in {} state: {}",
            self.id,
            self.state,
            error
        );
        self.failure = Some(error.clone());
        self.state = WorkflowState::Failed;
    }

    fn ensure_runnable(&self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(TokenizeError::invalid_input(format!(
                "workflow {} already finished ({}); create a new workflow to retry",
                self.id, self.state
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Drives tokenization workflows end to end
///
/// Owns the scoring client, the contract invoker, the event registry, and
/// an optional wallet provider. Methods take `&self`, so one orchestrator
/// can drive independent workflows concurrently; each workflow is `&mut`
/// and strictly sequential internally.
pub struct TokenizationOrchestrator {
    config: TokenizeConfig,
    scoring: ScoringClient,
    invoker: ContractInvoker,
    events: EventRegistry,
    provider: Option<Arc<dyn WalletProvider>>,
}

impl TokenizationOrchestrator {
    /// Create an orchestrator from configuration
    ///
    /// The invocation mode follows the configured factory address, and the
    /// event registry starts with the standard schemas. No wallet provider
    /// is attached; tokenization without one fails with
    /// `WalletUnavailable` at the approval step.
    pub fn new(config: TokenizeConfig) -> Self {
        let scoring = ScoringClient::new(&config.scoring_url);
        let invoker = ContractInvoker::from_config(&config);

        Self {
            config,
            scoring,
            invoker,
            events: EventRegistry::standard(),
            provider: None,
        }
    }

    /// Attach the wallet capability of the host environment
    pub fn with_provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the event registry
    ///
    /// For deployments whose factory emits a custom creation event.
    pub fn with_event_registry(mut self, events: EventRegistry) -> Self {
        self.events = events;
        self
    }

    /// Get the active configuration
    pub fn config(&self) -> &TokenizeConfig {
        &self.config
    }

    /// Get the scoring service client
    pub fn scoring(&self) -> &ScoringClient {
        &self.scoring
    }

    /// Get the contract invoker
    pub fn invoker(&self) -> &ContractInvoker {
        &self.invoker
    }

    /// Score the workflow's asset
    ///
    /// Optional prefix of the tokenization chain: `Idle → Scoring →
    /// ScoreReady`. Re-scoring from `ScoreReady` is allowed and replaces
    /// the recorded score. The score stays advisory; tokenization does not
    /// require it.
    pub async fn score(&self, workflow: &mut TokenizationWorkflow) -> Result<ScoreResult> {
        workflow.ensure_runnable()?;
        match workflow.state {
            WorkflowState::Idle | WorkflowState::ScoreReady => {}
            other => {
                return Err(TokenizeError::invalid_input(format!(
                    "cannot score from {} state",
                    other
                )))
            }
        }

        workflow.transition(WorkflowState::Scoring);
        let result = self
            .scoring
            .submit_for_scoring(
                workflow.asset.id.as_deref(),
                workflow.asset.extracted_text.as_deref(),
            )
            .await;

        match result {
            Ok(score) => {
                workflow.score = Some(score.clone());
                workflow.transition(WorkflowState::ScoreReady);
                Ok(score)
            }
            Err(e) => {
                workflow.fail(&e);
                Err(e)
            }
        }
    }

    /// Tokenize with the configured payload defaults
    pub async fn tokenize(&self, workflow: &mut TokenizationWorkflow) -> Result<ResolvedToken> {
        let builder = PayloadBuilder::new(&self.config);
        self.tokenize_with(workflow, builder).await
    }

    /// Tokenize with explicit payload parameters
    ///
    /// Runs the chain `PreparingPayload → PayloadReady →
    /// AwaitingWalletApproval → AwaitingConfirmation → Resolved`, allowed
    /// from `Idle` or `ScoreReady`. Every failure is recorded on the
    /// workflow, moves it to `Failed`, and is returned; there is no
    /// ambiguous outcome.
    pub async fn tokenize_with(
        &self,
        workflow: &mut TokenizationWorkflow,
        builder: PayloadBuilder,
    ) -> Result<ResolvedToken> {
        workflow.ensure_runnable()?;
        match workflow.state {
            WorkflowState::Idle | WorkflowState::ScoreReady => {}
            other => {
                return Err(TokenizeError::invalid_input(format!(
                    "cannot start tokenization from {} state",
                    other
                )))
            }
        }

        match self.drive_tokenization(workflow, builder).await {
            Ok(token) => Ok(token),
            Err(e) => {
                workflow.fail(&e);
                Err(e)
            }
        }
    }

    /// Score, then tokenize with the configured defaults
    pub async fn run(&self, workflow: &mut TokenizationWorkflow) -> Result<ResolvedToken> {
        self.score(workflow).await?;
        self.tokenize(workflow).await
    }

    async fn drive_tokenization(
        &self,
        workflow: &mut TokenizationWorkflow,
        builder: PayloadBuilder,
    ) -> Result<ResolvedToken> {
        // 1. Build and validate the payload
        workflow.transition(WorkflowState::PreparingPayload);
        let mut payload = builder.build(workflow.asset.id.as_deref(), workflow.score.as_ref())?;

        // Direct deployment needs contract artifacts; fetch the template
        // unless the caller already supplied them. The placeholder guard
        // runs before any wallet interaction.
        if self.invoker.mode() == &InvocationMode::DirectDeploy {
            if payload.contract_bytecode.is_none() {
                if let Some(asset_id) = workflow.asset.id.as_deref() {
                    let template = self
                        .scoring
                        .fetch_deployment_template(asset_id, &payload)
                        .await?;
                    payload.apply_template(&template);
                }
            }
            self.invoker.validate_payload(&payload)?;
        }

        workflow.payload = Some(payload.clone());
        workflow.transition(WorkflowState::PayloadReady);

        // 2. Wallet approval; signer availability is re-validated here on
        // every attempt, never cached from a previous workflow
        workflow.transition(WorkflowState::AwaitingWalletApproval);
        let provider = self.provider.clone().ok_or_else(|| {
            TokenizeError::WalletUnavailable(
                "no wallet capability in host environment".to_string(),
            )
        })?;
        let session = WalletSession::connect(provider).await?;
        let tx_hash = self.invoker.submit(&session, &payload).await?;
        workflow.tx_hash = Some(tx_hash);

        // 3. Confirmation
        workflow.transition(WorkflowState::AwaitingConfirmation);
        let receipt = self
            .invoker
            .confirm(&session, tx_hash, self.config.confirmation_timeout)
            .await?;

        // 4. Resolution
        let token_address = match self.invoker.mode() {
            InvocationMode::FactoryCall { .. } => {
                self.events.resolve_token_address(&receipt, CREATION_EVENT)?
            }
            InvocationMode::DirectDeploy => receipt.contract_address.ok_or_else(|| {
                TokenizeError::EventNotFound(
                    "deployment receipt carries no contract address".to_string(),
                )
            })?,
        };

        workflow.transition(WorkflowState::Resolved);
        log::info!(
            "🎉 Workflow {} resolved: token {} (tx {})",
            workflow.id,
            token_address,
            receipt.transaction_hash
        );
        if let Some(url) = self.config.explorer_tx_url(&receipt.transaction_hash.to_string()) {
            log::info!("   🔗 {}", url);
        }

        Ok(ResolvedToken {
            token_address,
            transaction_hash: receipt.transaction_hash,
        })
    }
}
