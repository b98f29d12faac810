use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::{LlmError, SearchError};

/// Errors raised while running workflow nodes or dispatching tools.
///
/// `generate_jd` is the only node that recovers locally (from `Backend`);
/// everything else surfaces to the caller.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("generation backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("unknown tool: {0}")]
    ToolNotFound(String),

    #[error("tool '{tool}' is missing required argument '{argument}'")]
    MissingArgument { tool: String, argument: String },

    #[error("question extraction produced no question lines")]
    MalformedExtraction,

    #[error("tool loop exceeded {limit} iterations")]
    ToolLoopLimit { limit: u32 },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Workflow(e) => match e {
                WorkflowError::ToolNotFound(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "TOOL_NOT_FOUND",
                    e.to_string(),
                ),
                WorkflowError::MissingArgument { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MISSING_ARGUMENT",
                    e.to_string(),
                ),
                WorkflowError::ToolLoopLimit { .. } => {
                    (StatusCode::CONFLICT, "TOOL_LOOP_LIMIT", e.to_string())
                }
                WorkflowError::Backend(_) | WorkflowError::MalformedExtraction => {
                    tracing::error!("LLM error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "LLM_ERROR",
                        "An AI processing error occurred".to_string(),
                    )
                }
                WorkflowError::Search(_) => {
                    tracing::error!("Search error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SEARCH_ERROR",
                        "The web search could not be completed".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_and_code();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_is_unprocessable() {
        let err = AppError::from(WorkflowError::MissingArgument {
            tool: "generate_offer_letter".to_string(),
            argument: "salary".to_string(),
        });
        let (status, code, message) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "MISSING_ARGUMENT");
        assert!(message.contains("salary"));
    }

    #[test]
    fn test_tool_not_found_is_unprocessable() {
        let err = AppError::from(WorkflowError::ToolNotFound("send_fax".to_string()));
        let (status, code, _) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "TOOL_NOT_FOUND");
    }

    #[test]
    fn test_backend_failure_hides_details() {
        let err = AppError::from(WorkflowError::Backend(LlmError::EmptyContent));
        let (status, code, message) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "LLM_ERROR");
        assert!(!message.contains("empty"));
    }

    #[test]
    fn test_conflict_and_not_found_statuses() {
        let (status, _, _) = AppError::Conflict("finalized".into()).status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _, _) = AppError::NotFound("session".into()).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_loop_limit_is_conflict() {
        let err = AppError::from(WorkflowError::ToolLoopLimit { limit: 3 });
        let (status, code, _) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "TOOL_LOOP_LIMIT");
    }
}
