//! HTTP handlers.

use super::adapter::{self, label, require_question};
use super::error::ApiError;
use super::AppState;
use crate::agent::ContextTag;
use crate::config::verify_env;
use crate::error::TubeaskError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: String,
}

/// POST /api/youtube
pub async fn youtube_question(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    handle_question(&state, ContextTag::Youtube, &body).await
}

/// POST /api/chat
pub async fn chat_question(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    handle_question(&state, ContextTag::General, &body).await
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    info!("Health check request received");

    match verify_env(state.env.as_ref()) {
        Ok(()) => Json(HealthResponse {
            status: "ok",
            message: "All services are operational".to_string(),
        })
        .into_response(),
        Err(e) => {
            let message = match e {
                TubeaskError::Config(msg) => msg,
                other => other.to_string(),
            };
            error!("Health check failed: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error",
                    message,
                }),
            )
                .into_response()
        }
    }
}

async fn handle_question(state: &AppState, context: ContextTag, body: &[u8]) -> Response {
    let kind = label(context);
    info!("Received {} question request", kind);

    match process(state, context, body).await {
        Ok(envelope) => {
            info!("Successfully processed {} question", kind);
            Json(envelope).into_response()
        }
        Err(err) => {
            match &err {
                ApiError::Validation(_) => warn!("Question field is missing in request"),
                ApiError::Agent(_) => {}
                ApiError::Internal(msg) => error!("Unexpected error in {} question: {}", kind, msg),
            }
            err.into_response()
        }
    }
}

async fn process(
    state: &AppState,
    context: ContextTag,
    body: &[u8],
) -> Result<adapter::QuestionResponse, ApiError> {
    let parsed: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Internal(e.to_string()))?;
    let question = require_question(&parsed)?;

    adapter::answer(state.agent.as_ref(), question, context).await
}
