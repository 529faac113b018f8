/// Axum HTTP handlers for the scoring API endpoints

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::scoring;
use crate::store::AssetStore;
use crate::types::*;

/// Shared application state
pub type AppState = Arc<AssetStore>;

/// Custom error type for handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// GET /
/// Returns API info and available endpoints
pub async fn api_info() -> Json<serde_json::Value> {
    Json(json!({
        "message": "RWA Scoring Engine API",
        "status": "running",
        "endpoints": {
            "health": "/health",
            "upload": "/upload",
            "score": "/score",
            "tokenize": "/tokenize"
        }
    }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /upload
/// Accepts a multipart document under the "file" field, extracts its text
/// and returns the generated asset id
pub async fn upload_asset(
    State(store): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        let extracted_text = extract_text(&bytes);
        let asset_id = store.insert(filename.clone(), extracted_text.clone());
        log::info!(
            "📄 Stored upload {} as asset {} ({} chars extracted)",
            filename,
            asset_id,
            extracted_text.chars().count()
        );

        return Ok(Json(UploadResponse {
            filename: format!("uploads/{}_{}", asset_id, filename),
            asset_id,
            extracted_text: truncate_chars(&extracted_text, 1000),
        }));
    }

    Err(ApiError::BadRequest("Missing file field".to_string()))
}

/// POST /score
/// Scores a stored asset by id, or raw text directly
pub async fn score_asset(
    State(store): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let text = if let Some(asset_id) = req.asset_id.as_deref().filter(|id| !id.is_empty()) {
        store
            .extracted_text(asset_id)
            .ok_or_else(|| ApiError::NotFound("asset_id not found".to_string()))?
    } else if let Some(raw_text) = req.raw_text.filter(|text| !text.is_empty()) {
        raw_text
    } else {
        return Err(ApiError::BadRequest(
            "Provide asset_id or raw_text".to_string(),
        ));
    };

    let (score, breakdown) = scoring::score_asset(&text, req.metadata.as_ref());
    log::info!("📊 Scored {} chars of text: {}", text.chars().count(), score);

    Ok(Json(ScoreResponse {
        score,
        pretty: scoring::pretty_breakdown(&breakdown),
        breakdown,
    }))
}

/// POST /tokenize
/// Returns the deployment template for a scored asset
///
/// The bytecode in the template is a placeholder; real deployment artifacts
/// come from the contract pipeline, not the scoring service.
pub async fn tokenize_asset(
    Json(req): Json<TokenizeRequest>,
) -> Result<Json<TokenizeResponse>, ApiError> {
    log::info!(
        "🔧 Issuing deployment template for asset {} ({} / {})",
        req.asset_id,
        req.token_name,
        req.token_symbol
    );

    Ok(Json(TokenizeResponse {
        status: "ready".to_string(),
        contract_abi: json!([
            {
                "type": "function",
                "name": "mintAsset",
                "inputs": [
                    { "name": "to", "type": "address" },
                    { "name": "tokenId", "type": "uint256" }
                ]
            }
        ]),
        contract_bytecode: PLACEHOLDER_BYTECODE.to_string(),
        constructor_args: json!({
            "name": req.token_name,
            "symbol": req.token_symbol,
            "total_supply": req.total_supply,
            "fraction_count": req.fraction_count,
            "asset_id": req.asset_id
        }),
    }))
}

/// Decode upload bytes as text, ignoring invalid sequences
fn extract_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
