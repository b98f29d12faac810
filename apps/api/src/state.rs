use crate::session::RecruitingService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub recruiting: RecruitingService,
}
