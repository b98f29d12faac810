//! Search backend: grounded web answers for the `web_search` tool.
//!
//! Uses the Anthropic web-search server tool through the same `LlmClient`
//! transport, so retries and auth stay in one place.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use super::{to_anthropic_messages, AnthropicRequest, LlmClient, LlmError, PromptMessage, MODEL};

const SEARCH_MAX_TOKENS: u32 = 2048;
const WEB_SEARCH_TOOL_TYPE: &str = "web_search_20250305";
const WEB_SEARCH_MAX_USES: u32 = 5;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("search returned no text")]
    EmptyResult,
}

/// Opaque search capability: a query in, grounded answer text out.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, SearchError>;
}

/// `SearchBackend` backed by Claude with the web-search server tool enabled.
#[derive(Clone)]
pub struct WebSearchClient {
    llm: LlmClient,
}

impl WebSearchClient {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SearchBackend for WebSearchClient {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        let prompt = [PromptMessage::human(format!(
            "Search the web and give a real-time answer to: {query}"
        ))];
        let (system, messages) = to_anthropic_messages(&prompt);
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: SEARCH_MAX_TOKENS,
            system,
            messages,
            tools: Some(vec![json!({
                "type": WEB_SEARCH_TOOL_TYPE,
                "name": "web_search",
                "max_uses": WEB_SEARCH_MAX_USES,
            })]),
        };

        let response = self.llm.send(&request_body).await?;
        let text = response.joined_text();
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::EmptyResult);
        }

        debug!("Web search answered {} chars for query {:?}", text.len(), query);
        Ok(text.to_string())
    }
}
