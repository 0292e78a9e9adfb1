//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, OkResponse, QueuedResponse, SendMessageRequest,
    SetCompletionRequest,
};
use super::AppState;
use crate::llm::{CompletionRequest, LlmMessage};
use crate::mediation::Side;
use crate::runtime::{MediationSnapshot, SideView, SseEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Whole-session snapshot
        .route("/api/state", get(get_state))
        // Per-side views and actions
        .route("/api/sides/:side", get(get_side))
        .route("/api/sides/:side/messages", post(send_message))
        .route("/api/sides/:side/reset", post(reset_side))
        .route("/api/sides/:side/completion", post(set_completion))
        // SSE streaming
        .route("/api/stream", get(stream_state))
        // Raw completion proxy
        .route("/api/chat", post(chat))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

fn parse_side(raw: &str) -> Result<Side, AppError> {
    raw.parse::<Side>()
        .map_err(|e| AppError::NotFound(e.to_string()))
}

// ============================================================
// State
// ============================================================

async fn get_state(State(state): State<AppState>) -> Json<MediationSnapshot> {
    Json(state.mediation.snapshot().as_ref().clone())
}

async fn get_side(
    State(state): State<AppState>,
    Path(side): Path<String>,
) -> Result<Json<SideView>, AppError> {
    let side = parse_side(&side)?;
    Ok(Json(state.mediation.snapshot().side(side).clone()))
}

async fn stream_state(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe first so no change lands between the snapshot and the stream
    let broadcast_rx = state.mediation.subscribe();
    let init = SseEvent::Init {
        snapshot: state.mediation.snapshot(),
    };
    sse_stream(init, broadcast_rx)
}

// ============================================================
// Side Actions
// ============================================================

async fn send_message(
    State(state): State<AppState>,
    Path(side): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    let side = parse_side(&side)?;

    state
        .mediation
        .send_message(side, req.text)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(QueuedResponse { queued: true }))
}

async fn reset_side(
    State(state): State<AppState>,
    Path(side): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    let side = parse_side(&side)?;

    state
        .mediation
        .reset_conversation(side)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(OkResponse { ok: true }))
}

/// Marking the second side complete fires the resolution round
async fn set_completion(
    State(state): State<AppState>,
    Path(side): Path<String>,
    Json(req): Json<SetCompletionRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let side = parse_side(&side)?;

    state
        .mediation
        .set_completion(side, req.complete)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(OkResponse { ok: true }))
}

// ============================================================
// Chat Proxy
// ============================================================

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let (Some(message), Some(instructions)) = (
        req.message.filter(|m| !m.is_empty()),
        req.system_instructions.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Message and system instructions are required".to_string(),
        ));
    };

    let request = CompletionRequest {
        prompt: message,
        history: req
            .conversation_history
            .into_iter()
            .map(LlmMessage::from)
            .collect(),
        instructions,
    };
    tracing::debug!(
        history = request.history.len(),
        instructions = %request.instructions,
        "Chat proxy request"
    );

    let response = state
        .llm
        .complete(&request.to_llm_request())
        .await
        .map_err(|e| AppError::Internal(e.message))?;

    Ok(Json(ChatResponse {
        message: response.text,
    }))
}

async fn get_version() -> &'static str {
    concat!("mediator ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
