/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::scoring::ASSET_TERMS;
use crate::store::AssetStore;

pub fn create_router(store: Arc<AssetStore>) -> Router {
    // Configure CORS to allow requests from the tokenization frontend/tests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Service info
        .route("/", get(api_info))
        .route("/health", get(health_check))

        // Asset endpoints
        .route("/upload", post(upload_asset))
        .route("/score", post(score_asset))

        // Tokenization endpoint
        .route("/tokenize", post(tokenize_asset))

        // Shared state
        .with_state(store)

        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(store: Arc<AssetStore>, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(store);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Scoring mock server listening on http://{}", addr);
    log::info!("📊 Heuristic scorer ready ({} asset terms)", ASSET_TERMS.len());
    log::info!("📄 Upload endpoint: POST /upload");

    axum::serve(listener, app).await?;

    Ok(())
}
