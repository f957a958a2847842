// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Versioned endpoints live under `/api/v1/`. `POST /api/analyze` is kept as
// an alias of the versioned analyze route for older clients.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::orchestrator::normalize_tickers;
use crate::report::BatchResponse;
use crate::runtime_config::RuntimeConfig;
use crate::types::{HistoryWindow, LevelMode, MacdMode, ScoringProfile};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/analyze", post(analyze))
        .route("/api/v1/config", get(get_config).post(update_config))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    config_version: u64,
    batches_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        config_version: state.config_version(),
        batches_served: state.batches_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Analyze
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    tickers: Option<Vec<String>>,
    #[serde(default)]
    profile: Option<ScoringProfile>,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let tickers = normalize_tickers(req.tickers.unwrap_or_default());
    if tickers.is_empty() {
        return Err(ApiError::BadRequest("Please provide at least one ticker".to_string()));
    }

    let orchestrator = state.orchestrator(req.profile);
    let outcome = orchestrator.run(&tickers).await;
    Ok(Json(BatchResponse::from(&outcome)))
}

// =============================================================================
// Runtime config
// =============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config_snapshot())
}

#[derive(Debug, Deserialize)]
struct ConfigUpdate {
    #[serde(default)]
    scoring_profile: Option<ScoringProfile>,
    #[serde(default)]
    macd_mode: Option<MacdMode>,
    #[serde(default)]
    level_mode: Option<LevelMode>,
    #[serde(default)]
    history: Option<HistoryWindow>,
    #[serde(default)]
    tickers: Option<Vec<String>>,
    #[serde(default)]
    max_concurrent_fetches: Option<usize>,
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<RuntimeConfig>, ApiError> {
    if update.max_concurrent_fetches == Some(0) {
        return Err(ApiError::BadRequest("max_concurrent_fetches must be at least 1".to_string()));
    }
    let tickers = update.tickers.map(normalize_tickers);
    if matches!(&tickers, Some(t) if t.is_empty()) {
        return Err(ApiError::BadRequest("Please provide at least one ticker".to_string()));
    }

    let mut config = state.config_snapshot();
    let mut changes = Vec::new();

    macro_rules! apply {
        ($field:ident, $value:expr) => {
            if let Some(val) = $value {
                changes.push(format!("{}: {:?} -> {:?}", stringify!($field), config.$field, val));
                config.$field = val;
            }
        };
    }

    apply!(scoring_profile, update.scoring_profile);
    apply!(macd_mode, update.macd_mode.map(Some));
    apply!(level_mode, update.level_mode.map(Some));
    apply!(history, update.history.map(Some));
    apply!(tickers, tickers);
    apply!(max_concurrent_fetches, update.max_concurrent_fetches);

    if !changes.is_empty() {
        info!(changes = ?changes, "runtime config updated");
        state.replace_config(config.clone());

        // Best-effort persistence; the in-memory update already applies.
        if let Some(path) = &state.config_path {
            if let Err(e) = config.save(path) {
                warn!(error = %e, "failed to save runtime config to disk");
            }
        }
    }

    Ok(Json(config))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::orchestrator::tests::FakeProvider;

    fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(RuntimeConfig::default(), Arc::new(FakeProvider::standard()), None));
        (router(Arc::clone(&state)), state)
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app();
        let req = Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_ticker_list_is_rejected() {
        let (app, _) = app();
        let (status, body) = post_json(app, "/api/v1/analyze", serde_json::json!({ "tickers": [" ", ""] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide at least one ticker");
    }

    #[tokio::test]
    async fn missing_ticker_list_is_rejected() {
        let (app, _) = app();
        let (status, _) = post_json(app, "/api/analyze", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mixed_batch_returns_reports_and_error_record() {
        let (app, state) = app();
        let (status, body) = post_json(
            app,
            "/api/analyze",
            serde_json::json!({ "tickers": ["up", "FAIL", "wave"], "profile": "lightweight" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"], "Lightweight");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["ticker"], "UP");
        assert!(results[0]["score"].is_number());
        assert_eq!(results[1]["ticker"], "FAIL");
        assert!(results[1]["error"].as_str().unwrap().contains("503"));
        assert_eq!(results[2]["ticker"], "WAVE");
        assert_eq!(state.batches_served(), 1);
    }

    #[tokio::test]
    async fn config_update_applies_and_validates() {
        let (app, state) = app();
        let (status, body) = post_json(
            app.clone(),
            "/api/v1/config",
            serde_json::json!({ "scoring_profile": "Lightweight", "tickers": ["spy"], "max_concurrent_fetches": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tickers"], serde_json::json!(["SPY"]));
        assert_eq!(state.config_snapshot().scoring_profile, ScoringProfile::Lightweight);
        assert_eq!(state.config_snapshot().max_concurrent_fetches, 3);
        assert_eq!(state.config_version(), 1);

        let (status, _) = post_json(app, "/api/v1/config", serde_json::json!({ "max_concurrent_fetches": 0 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.config_version(), 1);
    }
}
