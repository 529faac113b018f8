//! Scoring service client
//!
//! HTTP client for the remote asset-scoring service. The service is an
//! opaque collaborator: this module owns the full wire contract
//! (`/upload`, `/score`, `/tokenize`) and classifies every transport or
//! status failure into [`TokenizeError::ServiceUnavailable`].
//!
//! The orchestrator never retries these calls automatically; a failed
//! request is reported to the caller as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::TokenizationPayload;
use crate::{Result, TokenizeError};

// ============================================================================
// Data Structures
// ============================================================================

/// An asset known to the scoring service
///
/// Created on successful upload. Immutable within a workflow run: a new
/// upload produces a new asset with a new identifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque identifier assigned by the scoring service
    ///
    /// `None` when only raw text was supplied. Such assets can be scored
    /// but not tokenized.
    pub id: Option<String>,

    /// Text extracted from the uploaded document (truncated preview)
    pub extracted_text: Option<String>,
}

impl Asset {
    /// Asset registered with the scoring service under an id
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extracted_text: None,
        }
    }

    /// Unregistered asset carrying only raw text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            extracted_text: Some(text.into()),
        }
    }
}

/// Valuation returned by the scoring service
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Composite score in the 0..=100 range
    pub score: f64,
    /// Per-criterion breakdown, opaque to the workflow
    pub breakdown: Value,
}

/// Deployment template returned by `/tokenize`
///
/// Used only by the direct-deploy fallback. The production service answers
/// with a placeholder template, which the invoker's bytecode guard rejects
/// before any wallet interaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentTemplate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contract_abi: Option<Value>,
    #[serde(default)]
    pub contract_bytecode: Option<String>,
    #[serde(default)]
    pub constructor_args: Option<Value>,
}

/// Body of `POST /score`
#[derive(Debug, Serialize)]
struct ScoreRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_text: Option<String>,
}

/// Body of `POST /tokenize`
#[derive(Debug, Serialize)]
struct TokenizeTemplateRequest {
    asset_id: String,
    token_name: String,
    token_symbol: String,
    total_supply: u64,
    fraction_count: u64,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    asset_id: String,
    #[serde(default)]
    extracted_text: Option<String>,
}

// ============================================================================
// Scoring Client
// ============================================================================

/// Client for the remote scoring service
#[derive(Clone)]
pub struct ScoringClient {
    /// Service base URL, no trailing slash
    base_url: String,

    /// HTTP client (reqwest::Client is internally Arc-based)
    http_client: reqwest::Client,
}

impl ScoringClient {
    /// Create a client for the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    /// Get the configured service base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a document and register it as an asset
    ///
    /// `POST /upload` with the document as a multipart file. On success the
    /// service assigns an asset id and returns a preview of the extracted
    /// text.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<Asset> {
        log::info!("📤 Uploading document '{}' ({} bytes)", filename, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("   ❌ Upload request failed: {}", e);
                TokenizeError::service_unavailable(None, format!("upload request failed: {}", e))
            })?;

        let body: UploadResponse = parse_success(response, "upload").await?;
        log::info!("   ✅ Asset registered: {}", body.asset_id);

        Ok(Asset {
            id: Some(body.asset_id),
            extracted_text: body.extracted_text,
        })
    }

    /// Submit an asset or raw text for scoring
    ///
    /// Exactly one input is required. When both are present the asset id
    /// wins; when neither is present this fails with `InvalidInput` without
    /// making a request.
    pub async fn submit_for_scoring(
        &self,
        asset_id: Option<&str>,
        raw_text: Option<&str>,
    ) -> Result<ScoreResult> {
        let request = match (asset_id, raw_text) {
            (Some(id), _) => ScoreRequest {
                asset_id: Some(id.to_string()),
                raw_text: None,
            },
            (None, Some(text)) => ScoreRequest {
                asset_id: None,
                raw_text: Some(text.to_string()),
            },
            (None, None) => {
                return Err(TokenizeError::invalid_input(
                    "provide an asset id or raw text to score",
                ))
            }
        };

        log::info!(
            "🎯 Requesting score ({})",
            match &request.asset_id {
                Some(id) => format!("asset {}", id),
                None => "raw text".to_string(),
            }
        );

        let response = self
            .http_client
            .post(format!("{}/score", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("   ❌ Score request failed: {}", e);
                TokenizeError::service_unavailable(None, format!("score request failed: {}", e))
            })?;

        let result: ScoreResult = parse_success(response, "score").await?;
        log::info!("   ✅ Score received: {:.3}", result.score);
        log::debug!("   Breakdown: {}", result.breakdown);

        Ok(result)
    }

    /// Fetch the deployment template for direct contract deployment
    ///
    /// `POST /tokenize` with the payload's token parameters. Only consulted
    /// when no factory is deployed; the returned bytecode still has to pass
    /// the invoker's placeholder guard.
    pub async fn fetch_deployment_template(
        &self,
        asset_id: &str,
        payload: &TokenizationPayload,
    ) -> Result<DeploymentTemplate> {
        let total_supply: u64 = payload.total_supply.try_into().map_err(|_| {
            TokenizeError::invalid_input("total supply exceeds the template wire format (u64)")
        })?;

        let request = TokenizeTemplateRequest {
            asset_id: asset_id.to_string(),
            token_name: payload.token_name.clone(),
            token_symbol: payload.token_symbol.clone(),
            total_supply,
            fraction_count: payload.fraction_count,
        };

        log::info!("🧾 Fetching deployment template for asset {}", asset_id);

        let response = self
            .http_client
            .post(format!("{}/tokenize", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("   ❌ Tokenize request failed: {}", e);
                TokenizeError::service_unavailable(None, format!("tokenize request failed: {}", e))
            })?;

        let template: DeploymentTemplate = parse_success(response, "tokenize").await?;
        log::info!(
            "   ✅ Template received (bytecode: {} chars)",
            template
                .contract_bytecode
                .as_deref()
                .map(str::len)
                .unwrap_or(0)
        );

        Ok(template)
    }
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Check the HTTP status and deserialize a 2xx body
///
/// Non-2xx bodies have no guaranteed schema and are never parsed; only the
/// status code is carried in the error.
async fn parse_success<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        log::warn!("   ⚠️  {} rejected with HTTP {}", operation, status.as_u16());
        return Err(TokenizeError::service_unavailable(
            Some(status.as_u16()),
            format!("{} rejected by scoring service", operation),
        ));
    }

    response.json::<T>().await.map_err(|e| {
        TokenizeError::service_unavailable(
            Some(status.as_u16()),
            format!("invalid {} response: {}", operation, e),
        )
    })
}
