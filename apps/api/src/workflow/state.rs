//! Session State: the record threaded through every workflow node.

use serde::{Deserialize, Serialize};

use crate::tools::ToolCall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Human,
    Assistant,
    System,
    /// Result text of a dispatched tool call.
    Tool,
}

/// One entry of the conversation history.
///
/// A human follow-up carries the `ToolCall` it was resolved into; that pending
/// call is what `tool_dispatch` consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call: None,
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Tool, content)
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_call = Some(call);
        self
    }
}

/// Facts supplied by the recruiter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterInfo {
    /// Set once, from the opening hiring request.
    pub role: Option<String>,
    /// Overwritten each time clarification answers are submitted.
    pub clarifications: Option<String>,
}

impl RecruiterInfo {
    pub fn has_clarifications(&self) -> bool {
        self.clarifications
            .as_deref()
            .is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub recruiter_info: RecruiterInfo,
    pub clarification_questions: Vec<String>,
    pub wants_tool_chat: bool,
    pub done_with_tools: bool,
    /// Completed `tool_dispatch` runs; bounded by the workflow's loop guard.
    pub tool_iterations: u32,
}

impl SessionState {
    /// Fresh state for a hiring request; the request doubles as the role.
    pub fn new(role_text: &str) -> Self {
        Self {
            messages: vec![Message::human(role_text)],
            recruiter_info: RecruiterInfo {
                role: Some(role_text.to_string()),
                clarifications: None,
            },
            ..Self::default()
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The tool call attached to the most recent message, if it has one.
    pub fn pending_tool_call(&self) -> Option<&ToolCall> {
        self.last_message().and_then(|m| m.tool_call.as_ref())
    }

    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
    }
}
