/// Scoring API request and response types
///
/// These types match the production scoring backend's wire format so
/// clients can consume the mock transparently.

use serde::{Deserialize, Serialize};

/// Bytecode stand-in served by /tokenize
///
/// Deliberately not valid hex. Clients must refuse to deploy it and fall
/// back to their factory path.
pub const PLACEHOLDER_BYTECODE: &str = "0x6000...DEADBEEF";

/// Upload response from POST /upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub asset_id: String,
    pub filename: String,
    pub extracted_text: String,
}

/// Scoring request for POST /score
///
/// Exactly one of `asset_id` or `raw_text` is expected; `asset_id` wins
/// when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Scoring response from POST /score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
    pub breakdown: serde_json::Value,
    pub pretty: String,
}

/// Tokenization request for POST /tokenize
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizeRequest {
    pub asset_id: String,
    pub token_name: String,
    pub token_symbol: String,
    pub total_supply: u64,
    pub fraction_count: u64,
}

/// Tokenization response from POST /tokenize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub status: String,
    pub contract_abi: serde_json::Value,
    pub contract_bytecode: String,
    pub constructor_args: serde_json::Value,
}
