//! Scripted backends for unit tests. Never compiled into the binary.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerationBackend, LlmError, PromptMessage, SearchBackend, SearchError};

/// Replays queued replies in order and records every prompt it receives.
/// An exhausted queue answers with `fallback` when set, otherwise with an API error.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    fallback: Option<String>,
    received: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that answers every call with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.into()));
        self
    }

    /// Queues a failed call with the given HTTP status.
    pub fn fail(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Err(status));
        self
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// Messages sent on call `index`.
    pub fn messages(&self, index: usize) -> Vec<PromptMessage> {
        self.received.lock().unwrap()[index].clone()
    }

    /// Concatenated content of every message sent on call `index`.
    pub fn prompt(&self, index: usize) -> String {
        self.received.lock().unwrap()[index]
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, LlmError> {
        self.received.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        match (next, &self.fallback) {
            (Some(Ok(text)), _) => Ok(text),
            (Some(Err(status)), _) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(LlmError::Api {
                status: 500,
                message: "script exhausted".to_string(),
            }),
        }
    }
}

/// Search backend that echoes the query, or fails when built with `failing()`.
pub struct StubSearch {
    fail: bool,
}

impl StubSearch {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl SearchBackend for StubSearch {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        if self.fail {
            return Err(SearchError::EmptyResult);
        }
        Ok(format!("results for: {query}"))
    }
}
