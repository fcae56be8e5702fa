//! Tutoring endpoints.
//!
//! Endpoints:
//! - GET /api/health - Liveness check
//! - POST /api/chat - General tutoring with rolling context
//! - POST /api/tutor/:subject - Subject-specialized tutoring

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use shared::{
    compose_chat_prompt, compose_subject_prompt, ChatRequest, ChatResponse, HealthResponse,
    TutorRequest, TutorResponse,
};
use tracing::{error, info};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;

/// Routes under `/api`; unknown methods on known paths fall through to 404.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health).fallback(not_found))
        .route("/api/chat", post(chat).fallback(not_found))
        .route("/api/tutor/:subject", post(tutor).fallback(not_found))
}

fn required_message(message: &str) -> Result<&str, ApiError> {
    if message.is_empty() {
        return Err(ApiError::MissingMessage);
    }
    Ok(message)
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "AI Tutoring Server is running".to_string(),
    })
}

async fn chat(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = required_message(&request.message)?;

    info!(
        subject = %request.subject,
        grade = %request.grade,
        context_len = request.context.len(),
        "Chat request"
    );

    let prompt = compose_chat_prompt(
        message,
        non_empty(&request.subject),
        non_empty(&request.grade),
        non_empty(&request.context),
    );

    let text = state.gateway.generate(&prompt).await.map_err(|e| {
        error!(error = %e, provider = state.gateway.name(), "Error in chat endpoint");
        ApiError::Generation(e.to_string())
    })?;

    Ok(Json(ChatResponse::success(text)))
}

async fn tutor(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    JsonBody(request): JsonBody<TutorRequest>,
) -> Result<Json<TutorResponse>, ApiError> {
    let message = required_message(&request.message)?;

    info!(subject = %subject, grade = %request.grade, "Subject tutoring request");

    let prompt = compose_subject_prompt(
        &subject,
        message,
        non_empty(&request.grade),
        non_empty(&request.difficulty),
    );

    let text = state.gateway.generate(&prompt).await.map_err(|e| {
        error!(error = %e, subject = %subject, "Error in subject tutoring endpoint");
        ApiError::Generation(e.to_string())
    })?;

    Ok(Json(TutorResponse::success(subject, text)))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
