use std::num::NonZeroU32;

use anyhow::{Context, Result};

use crate::workflow::DEFAULT_MAX_TOOL_ITERATIONS;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Enables the Postgres analytics sink when set.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub max_tool_iterations: NonZeroU32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            database_url: optional_env("DATABASE_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_tool_iterations: parse_max_tool_iterations(optional_env("MAX_TOOL_ITERATIONS"))?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Unset means the default; zero is rejected since it would refuse every tool call.
fn parse_max_tool_iterations(raw: Option<String>) -> Result<NonZeroU32> {
    let limit = match raw {
        Some(raw) => raw.trim().parse::<u32>().ok(),
        None => Some(DEFAULT_MAX_TOOL_ITERATIONS),
    };
    limit
        .and_then(NonZeroU32::new)
        .context("MAX_TOOL_ITERATIONS must be a positive integer")
}
