//! Axum route handlers for the Sessions API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::artifacts::ArtifactStore;
use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::router;

use super::service::{ClarifyOutcome, FinishOutcome, FollowUpOutcome, StartOutcome};
use super::Session;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub role_text: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ClarifyRequest {
    pub answers: String,
    #[serde(default)]
    pub wants_tool_chat: bool,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Opens a session from a free-text hiring request and returns the
/// clarification questions the recruiter should answer.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartOutcome>, AppError> {
    let outcome = state.recruiting.start(&req.role_text, req.session_id).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/clarify
///
/// Records the answers and generates the job description. Without
/// `wants_tool_chat` the session is finalized in the same call.
pub async fn handle_clarify(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClarifyRequest>,
) -> Result<Json<ClarifyOutcome>, AppError> {
    let outcome = state
        .recruiting
        .clarify(id, &req.answers, req.wants_tool_chat)
        .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/follow-up
pub async fn handle_follow_up(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FollowUpRequest>,
) -> Result<Json<FollowUpOutcome>, AppError> {
    let outcome = state.recruiting.follow_up(id, &req.text).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/finish
pub async fn handle_finish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinishOutcome>, AppError> {
    let outcome = state.recruiting.finish(id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.recruiting.snapshot(id).await?))
}

/// GET /api/v1/sessions/:id/artifacts
pub async fn handle_get_artifacts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArtifactStore>, AppError> {
    Ok(Json(state.recruiting.artifacts(id).await?))
}

/// GET /api/v1/workflow/diagram
///
/// Mermaid source for the workflow graph.
pub async fn handle_diagram() -> String {
    router::mermaid()
}
