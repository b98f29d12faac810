mod analytics;
mod artifacts;
mod config;
mod db;
mod errors;
mod llm_client;
mod routes;
mod session;
mod state;
mod tools;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analytics::{AnalyticsSink, FanoutSink, PgAnalyticsSink, TracingSink};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::{LlmClient, WebSearchClient};
use crate::routes::build_router;
use crate::session::RecruitingService;
use crate::state::AppState;
use crate::tools::ToolRegistry;
use crate::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruiter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM and search clients
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let search = WebSearchClient::new(llm.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let llm = Arc::new(llm);
    let tools = ToolRegistry::new(llm.clone(), Arc::new(search));
    let workflow = Arc::new(Workflow::new(llm, tools, config.max_tool_iterations.get()));
    info!(
        "Workflow ready (tool loop limit: {})",
        workflow.max_tool_iterations()
    );

    // Analytics: always logged, persisted when a database is configured
    let mut sinks: Vec<Arc<dyn AnalyticsSink>> = vec![Arc::new(TracingSink)];
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            sinks.push(Arc::new(PgAnalyticsSink::new(pool)));
        }
        None => warn!("DATABASE_URL not set; analytics events are only logged"),
    }
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(FanoutSink::new(sinks));

    // Build app state
    let state = AppState {
        recruiting: RecruitingService::new(workflow, analytics),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
