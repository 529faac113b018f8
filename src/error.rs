//! Error types for tokenization operations
//!
//! Every failure crossing an external boundary (scoring service, wallet
//! provider, chain) is classified into exactly one variant, with the
//! underlying diagnostic preserved in the message.

use std::time::Duration;

use thiserror::Error;

/// Core error type for the tokenization workflow
///
/// Covers scoring service failures, wallet/signing problems, contract
/// invocation issues, and receipt resolution failures. The orchestrator
/// never retries on its own: retrying a signed transaction risks duplicate
/// on-chain effects, so retry is always a caller decision.
#[derive(Error, Clone, Debug)]
pub enum TokenizeError {
    /// Caller-supplied data failed validation before any external call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scoring service unreachable or answered outside the 2xx range
    #[error("Scoring service unavailable: {message}")]
    ServiceUnavailable {
        /// HTTP status, when the service answered at all
        status: Option<u16>,
        message: String,
    },

    /// No asset identifier available; upload/score a document first
    #[error("No asset available: an asset must be uploaded before tokenization")]
    MissingAsset,

    /// No wallet capability in the host environment, or no accounts served
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// User declined the connection or signing prompt
    #[error("User rejected the wallet request: {0}")]
    UserRejected(String),

    /// Deployment bytecode is absent, empty, or an unusable placeholder
    #[error("Placeholder bytecode: {0}")]
    PlaceholderBytecode(String),

    /// Transaction reverted or could not be broadcast/confirmed
    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    /// Bounded confirmation wait expired before the transaction was mined
    #[error("Confirmation timed out after {waited:?}")]
    ConfirmationTimeout { waited: Duration },

    /// Transaction succeeded but the expected creation event was absent
    #[error("Expected event not found in receipt: {0}")]
    EventNotFound(String),
}

// Helper functions for common error scenarios
impl TokenizeError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a service unavailable error from an HTTP status
    pub fn service_unavailable(status: Option<u16>, msg: impl Into<String>) -> Self {
        let message = match status {
            Some(code) => format!("HTTP {}: {}", code, msg.into()),
            None => msg.into(),
        };
        Self::ServiceUnavailable { status, message }
    }

    /// Create a transaction failed error with a revert reason
    pub fn transaction_failed(reason: impl Into<String>) -> Self {
        Self::TransactionFailed {
            reason: reason.into(),
        }
    }
}
