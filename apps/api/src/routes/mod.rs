pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions API
        .route("/api/v1/sessions", post(handlers::handle_start))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/artifacts",
            get(handlers::handle_get_artifacts),
        )
        .route(
            "/api/v1/sessions/:id/clarify",
            post(handlers::handle_clarify),
        )
        .route(
            "/api/v1/sessions/:id/follow-up",
            post(handlers::handle_follow_up),
        )
        .route("/api/v1/sessions/:id/finish", post(handlers::handle_finish))
        // Workflow introspection
        .route("/api/v1/workflow/diagram", get(handlers::handle_diagram))
        .with_state(state)
}
