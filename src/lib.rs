//! VeriChain: Asset Tokenization Orchestration
//!
//! This crate turns a scored real-world asset into an ERC-20 fraction
//! token on an EVM chain, coordinating the scoring backend, the user's
//! wallet, and the fractionalization contracts behind a single workflow.
//!
//! # Architecture
//!
//! - **Scoring Client**: Uploads asset documents, retrieves scores and deployment templates
//! - **Payload Builder**: Validates and assembles the on-chain tokenization parameters
//! - **Contract Invoker**: Encodes factory calls or direct deployments and tracks confirmation
//! - **Receipt Resolver**: Decodes mined logs to recover the fraction token address
//! - **Orchestrator**: Drives the workflow state machine from scoring to a resolved token
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use verichain::{Asset, TokenizationOrchestrator, TokenizationWorkflow, TokenizeConfig};
//!
//! // Wire the orchestrator to a wallet-capable host
//! let config = TokenizeConfig::from_env();
//! let orchestrator = TokenizationOrchestrator::new(config).with_provider(provider);
//!
//! // Score and tokenize one asset end to end
//! let mut workflow = TokenizationWorkflow::new(Asset::from_id("a1"));
//! let token = orchestrator.run(&mut workflow).await?;
//! println!("Fraction token live at {}", token.token_address);
//! ```

// Public modules
pub mod config;
pub mod contracts;
pub mod error;
pub mod invoker;
pub mod mock;
pub mod orchestrator;
pub mod payload;
pub mod receipt;
pub mod scoring;
pub mod wallet;

// Re-exports for convenience
pub use config::{ChainNetwork, TokenizeConfig};
pub use error::TokenizeError;
pub use invoker::{ContractInvoker, InvocationMode};
pub use orchestrator::{
    ResolvedToken, TokenizationOrchestrator, TokenizationWorkflow, WorkflowState,
};
pub use payload::{PayloadBuilder, TokenizationPayload};
pub use receipt::{EventRegistry, KnownEvent, TransactionReceipt};
pub use scoring::{Asset, DeploymentTemplate, ScoreResult, ScoringClient};
pub use wallet::{TransactionRequest, WalletProvider, WalletSession};

// Re-export commonly used EVM primitives
pub use alloy_primitives::{Address, B256, U256};

// Common result type
pub type Result<T> = std::result::Result<T, TokenizeError>;
