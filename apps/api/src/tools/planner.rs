//! Tool planner: turns a recruiter's free-text follow-up into a `ToolCall`,
//! or into a plain answer when no tool fits.
//!
//! The choice is delegated to the generation backend, which sees the recent
//! conversation, the current artifacts and the declared tool catalogue. A JSON
//! object is a tool request; anything else is a direct reply.

use tracing::debug;

use crate::artifacts::{ArtifactKind, ArtifactStore};
use crate::errors::WorkflowError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{strip_json_fences, GenerationBackend, LlmError, PromptMessage};
use crate::tools::prompts::PLANNER_SYSTEM_TEMPLATE;
use crate::tools::{render_catalogue, RawToolCall, ToolCall};
use crate::workflow::{Message, MessageRole};

/// Number of most recent conversation messages shown to the planner.
const HISTORY_WINDOW: usize = 6;

/// What the backend made of a follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Planned {
    /// A validated tool request, ready for `tool_dispatch`.
    Tool(ToolCall),
    /// The backend answered directly; nothing is dispatched.
    Reply(String),
}

/// Asks the backend how to serve `request` and validates its answer.
///
/// For `edit_content` without an explicit target, the edited artifact is
/// inferred from the request wording, then from which slot holds `existing`.
pub async fn plan_follow_up(
    llm: &dyn GenerationBackend,
    request: &str,
    history: &[Message],
    artifacts: &ArtifactStore,
) -> Result<Planned, WorkflowError> {
    let mut messages = vec![PromptMessage::system(build_planner_prompt(artifacts))];
    messages.extend(history_window(history));
    messages.push(PromptMessage::human(request));

    let reply = llm.generate(&messages).await?;
    let body = strip_json_fences(&reply);
    if !body.starts_with('{') {
        debug!("Planner answered without a tool call");
        return Ok(Planned::Reply(reply.trim().to_string()));
    }

    let raw: RawToolCall = serde_json::from_str(body).map_err(LlmError::Parse)?;
    debug!("Planner chose tool {:?}", raw.tool);

    let mut call = ToolCall::from_raw(&raw)?;
    if let ToolCall::EditContent {
        existing, target, ..
    } = &mut call
    {
        if target.is_none() {
            *target = ArtifactKind::mentioned_in(request)
                .or_else(|| artifacts.kind_holding(existing.as_str()));
        }
    }
    Ok(Planned::Tool(call))
}

fn history_window(history: &[Message]) -> impl Iterator<Item = PromptMessage> + '_ {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..].iter().filter_map(|m| match m.role {
        MessageRole::Human => Some(PromptMessage::human(m.content.as_str())),
        MessageRole::Assistant | MessageRole::Tool => {
            Some(PromptMessage::assistant(m.content.as_str()))
        }
        MessageRole::System => None,
    })
}

fn build_planner_prompt(artifacts: &ArtifactStore) -> String {
    let rendered = ArtifactKind::ALL
        .iter()
        .map(|kind| format!("[{}] {}:\n{}", kind.as_str(), kind.label(), artifacts.get(*kind)))
        .collect::<Vec<_>>()
        .join("\n\n");

    let catalogue = render_catalogue();
    fill_template(
        PLANNER_SYSTEM_TEMPLATE,
        &[("artifacts", rendered.as_str()), ("tool_catalogue", catalogue.as_str())],
    )
}
