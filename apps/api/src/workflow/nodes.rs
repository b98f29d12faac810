//! Node implementations. Each node reads the session state, appends its
//! messages, and (for `generate_jd` / `tool_dispatch`) updates the artifact store.
//!
//! Nodes mutate state only after their backend call has resolved, so a
//! failing node leaves both the state and the artifacts as it found them.

use tracing::{debug, info, warn};

use crate::artifacts::{ArtifactKind, ArtifactStore};
use crate::errors::WorkflowError;
use crate::llm_client::prompts::{fill_template, HIRING_ASSISTANT_PERSONA};
use crate::llm_client::{GenerationBackend, PromptMessage};
use crate::tools::ToolRegistry;

use super::prompts::{
    CLARIFY_ACK, EXTRACT_PROMPT_TEMPLATE, FINAL_PLAN_HEADER, JD_FALLBACK, JD_PROMPT_TEMPLATE,
    QUESTIONS_HEADER,
};
use super::state::{Message, SessionState};

/// Asks the backend for clarification questions about the latest request.
///
/// No-op once clarifications exist, which makes re-entry idempotent.
pub async fn extract(
    llm: &dyn GenerationBackend,
    state: &mut SessionState,
) -> Result<(), WorkflowError> {
    if state.recruiter_info.has_clarifications() {
        debug!("Clarifications already present, skipping extraction");
        return Ok(());
    }

    let request = state
        .last_message()
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    let prompt = fill_template(
        EXTRACT_PROMPT_TEMPLATE,
        &[("persona", HIRING_ASSISTANT_PERSONA), ("request", request)],
    );

    let reply = llm.generate(&[PromptMessage::human(prompt)]).await?;

    let questions = match parse_questions(&reply) {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Proceeding without clarification questions: {e}");
            Vec::new()
        }
    };
    info!("Extracted {} clarification questions", questions.len());

    state.push(Message::assistant(render_questions(&questions)));
    state.clarification_questions = questions;
    Ok(())
}

/// Splits a bullet-list reply into question lines.
pub fn parse_questions(reply: &str) -> Result<Vec<String>, WorkflowError> {
    let questions: Vec<String> = reply
        .lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c == '-' || c == '•' || c.is_whitespace())
                .trim_end()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(WorkflowError::MalformedExtraction);
    }
    Ok(questions)
}

fn render_questions(questions: &[String]) -> String {
    let list = questions
        .iter()
        .map(|q| format!("- {q}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{QUESTIONS_HEADER}\n\n{list}")
}

/// Records the recruiter's answers verbatim (trimmed) and acknowledges them.
pub fn clarify(state: &mut SessionState) {
    let answers = state
        .last_message()
        .map(|m| m.content.trim().to_string())
        .unwrap_or_default();
    state.recruiter_info.clarifications = Some(answers);
    state.push(Message::system(CLARIFY_ACK));
}

/// Generates the job description. The only node that recovers from a
/// backend failure: it substitutes a fixed message and leaves the `jd` slot alone.
pub async fn generate_jd(
    llm: &dyn GenerationBackend,
    state: &mut SessionState,
    artifacts: &mut ArtifactStore,
) {
    let prompt = build_jd_prompt(state);

    match llm.generate(&[PromptMessage::human(prompt)]).await {
        Ok(jd_text) => {
            info!("Job description generated ({} chars)", jd_text.len());
            artifacts.set(ArtifactKind::Jd, jd_text.clone());
            state.push(Message::assistant(jd_text));
        }
        Err(e) => {
            warn!("Job description generation failed, using fallback: {e}");
            state.push(Message::assistant(JD_FALLBACK));
        }
    }
}

pub fn build_jd_prompt(state: &SessionState) -> String {
    let info = &state.recruiter_info;
    fill_template(
        JD_PROMPT_TEMPLATE,
        &[
            ("role", info.role.as_deref().unwrap_or_default()),
            (
                "clarifications",
                info.clarifications.as_deref().unwrap_or_default(),
            ),
        ],
    )
}

/// Runs the tool call attached to the last message and stores its result.
pub async fn tool_dispatch(
    tools: &ToolRegistry,
    max_iterations: u32,
    state: &mut SessionState,
    artifacts: &mut ArtifactStore,
) -> Result<(), WorkflowError> {
    let Some(call) = state.pending_tool_call().cloned() else {
        debug!("No pending tool call, nothing to dispatch");
        return Ok(());
    };

    if state.tool_iterations >= max_iterations {
        return Err(WorkflowError::ToolLoopLimit {
            limit: max_iterations,
        });
    }

    let result = tools.dispatch(&call).await?;

    if let Some(kind) = call.output_kind() {
        artifacts.set(kind, result.clone());
    }
    state.push(Message::tool(result));
    state.tool_iterations += 1;
    info!(
        "Tool {} completed (iteration {})",
        call.name(),
        state.tool_iterations
    );
    Ok(())
}

/// Appends the recruiting plan compiled from every assistant message.
pub fn finalize(state: &mut SessionState) {
    let plan = compile_plan(state);
    state.push(Message::assistant(plan));
}

pub fn compile_plan(state: &SessionState) -> String {
    let mut plan = format!("{FINAL_PLAN_HEADER}\n\n");
    for message in state.assistant_messages() {
        plan.push_str(&message.content);
        plan.push_str("\n\n");
    }
    plan
}
