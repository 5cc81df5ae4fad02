//! JSON HTTP API.
//!
//! Exposes suggestion generation and feedback collection to the helpdesk
//! frontend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/suggest` | Suggestions for `{ "title", "body" }`; a blank query yields none |
//! | `POST` | `/feedback` | Record whether a suggestion helped |
//! | `GET`  | `/stats` | Feedback accuracy statistics |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "suggestion_id must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the helpdesk web
//! client can call the API from another origin.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use helpdesk_suggest_core::engine::SuggestionEngine;
use helpdesk_suggest_core::store::Store;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SuggestionEngine>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(engine: SuggestionEngine, store: Arc<dyn Store>) -> Self {
        Self {
            engine: Arc::new(engine),
            store,
        }
    }
}

/// Build the router. Separate from [`run_server`] so tests can drive it
/// without binding a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/suggest", post(handle_suggest))
        .route("/feedback", post(handle_feedback))
        .route("/stats", get(handle_stats))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind`. Runs until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    let engine = SuggestionEngine::new(config.vocabulary(), config.suggest_params());
    let state = AppState::new(engine, Arc::new(SqliteStore::new(pool)));

    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, "server listening");
    println!("Server listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Validation failures are the caller's fault; everything else is ours.
fn classify_error(err: anyhow::Error) -> AppError {
    let msg = format!("{:#}", err);
    if msg.contains("must not be empty") {
        bad_request(msg)
    } else {
        tracing::error!(error = %msg, "request failed");
        internal(msg)
    }
}

// ============ Handlers ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Deserialize)]
struct SuggestRequest {
    title: String,
    #[serde(default)]
    body: String,
}

async fn handle_suggest(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let suggestions = state
        .engine
        .generate_suggestions(state.store.as_ref(), &req.title, &req.body)
        .await;

    Ok(Json(serde_json::json!({ "suggestions": suggestions })))
}

#[derive(Deserialize)]
struct FeedbackRequest {
    suggestion_id: String,
    ticket_id: String,
    was_helpful: bool,
    #[serde(default)]
    feedback_text: Option<String>,
}

async fn handle_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state
        .engine
        .record_feedback(
            state.store.as_ref(),
            &req.suggestion_id,
            &req.ticket_id,
            req.was_helpful,
            req.feedback_text.as_deref(),
        )
        .await
        .map_err(classify_error)?;

    Ok(Json(serde_json::json!({ "feedback": record })))
}

async fn handle_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let stats = state
        .engine
        .performance_stats(state.store.as_ref(), Utc::now())
        .await
        .map_err(classify_error)?;

    Ok(Json(serde_json::json!({ "stats": stats })))
}
