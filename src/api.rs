//! REST API server for the transaction risk analyzer
//!
//! Exposes the analyzer via HTTP endpoints
//! Browser access is limited to one configured origin

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::analyzer::TransactionAnalyzer;
use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::{TransactionAnalysis, TransactionRequest};
use crate::Result;

/// =============================
/// Error Body
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            error: message,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub analyzer: Arc<TransactionAnalyzer>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Analysis Endpoint
/// =============================

async fn analyze_transaction(
    State(state): State<ApiState>,
    Json(req): Json<TransactionRequest>,
) -> std::result::Result<Json<TransactionAnalysis>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        transaction_id = req.transaction_id.as_deref().unwrap_or("-"),
        details_len = req.details.len(),
        "Received transaction analysis request"
    );

    state.analyzer.analyze(req).await.map(Json).map_err(|e| {
        error!("Transaction analysis failed: {}", e);
        error_response(e)
    })
}

fn error_response(err: AnalysisError) -> (StatusCode, Json<ErrorResponse>) {
    (
        err.status_code(),
        Json(ErrorResponse::new(format!("Transaction analysis failed: {}", err))),
    )
}

/// =============================
/// Router
/// =============================

/// CORS for a single origin with credentials.
///
/// The request `Origin` is checked against the list; other origins get no
/// `Access-Control-Allow-Origin` header. An unparseable origin yields a
/// layer that allows no origin at all.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => layer.allow_origin(AllowOrigin::list([origin])),
        Err(_) => {
            error!("ALLOWED_ORIGIN is not a valid header value: {}", allowed_origin);
            layer
        }
    }
}

pub fn create_router(analyzer: Arc<TransactionAnalyzer>, allowed_origin: &str) -> Router {
    let state = ApiState { analyzer };

    Router::new()
        .route("/health", get(health))
        .route("/analyze_transaction", post(analyze_transaction))
        .with_state(state)
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(analyzer: Arc<TransactionAnalyzer>, config: &AppConfig) -> Result<()> {
    let router = create_router(analyzer, &config.allowed_origin);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", config.port);
    info!("Allowed origin: {}", config.allowed_origin);

    axum::serve(listener, router).await?;

    Ok(())
}
