//! Recruiting service: the inbound interface of the workflow.
//!
//! Flow: start (role → questions) → clarify (answers → job description) →
//!       follow_up* (request → tool result) → finish (recruiting plan).
//!
//! Every call works on a copy of the session's state and artifacts and
//! commits only when the workflow run succeeds, so a failed call never
//! advances the session.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, EventName};
use crate::artifacts::{ArtifactKind, ArtifactStore};
use crate::errors::AppError;
use crate::tools::planner::{plan_follow_up, Planned};
use crate::workflow::{Message, MessageRole, NodeId, RunOutcome, Workflow};

use super::{Session, SessionStore};

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub session_id: Uuid,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClarifyOutcome {
    pub job_description: String,
    /// Present when the recruiter declined the tool chat and the plan was compiled.
    pub final_plan: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUpOutcome {
    /// The dispatched tool; `None` when the backend answered directly.
    pub tool: Option<String>,
    pub artifact_kind: Option<ArtifactKind>,
    pub result_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinishOutcome {
    pub plan: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RecruitingService {
    workflow: Arc<Workflow>,
    sessions: SessionStore,
    analytics: Arc<dyn AnalyticsSink>,
}

impl RecruitingService {
    pub fn new(workflow: Arc<Workflow>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            workflow,
            sessions: SessionStore::new(),
            analytics,
        }
    }

    /// Opens (or restarts) a session and returns the clarification questions.
    pub async fn start(
        &self,
        role_text: &str,
        session_id: Option<Uuid>,
    ) -> Result<StartOutcome, AppError> {
        let role_text = role_text.trim();
        if role_text.is_empty() {
            return Err(AppError::Validation("role_text cannot be empty".to_string()));
        }

        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        self.record(
            EventName::SessionStarted,
            json!({ "session_id": session_id, "role": role_text }),
        );

        let mut session = Session::new(session_id, role_text);
        let status = self
            .workflow
            .run(NodeId::Extract, &mut session.state, &mut session.artifacts)
            .await?;
        session.status = status;

        let questions = session.state.clarification_questions.clone();
        self.sessions.insert(session).await;

        info!(
            "Session {} started with {} clarification questions",
            session_id,
            questions.len()
        );
        Ok(StartOutcome {
            session_id,
            questions,
        })
    }

    /// Submits (or resubmits) clarification answers and generates the job description.
    pub async fn clarify(
        &self,
        session_id: Uuid,
        answers: &str,
        wants_tool_chat: bool,
    ) -> Result<ClarifyOutcome, AppError> {
        if answers.trim().is_empty() {
            return Err(AppError::Validation("answers cannot be empty".to_string()));
        }

        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        if session.status == RunOutcome::Finished {
            return Err(finalized(session_id));
        }

        let mut state = session.state.clone();
        let mut artifacts = session.artifacts.clone();
        state.wants_tool_chat = wants_tool_chat;
        state.push(Message::human(answers));
        let first_new = state.messages.len();

        let status = self
            .workflow
            .run(NodeId::Clarify, &mut state, &mut artifacts)
            .await?;

        let job_description = state.messages[first_new..]
            .iter()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let final_plan = finished_plan(status, &state.messages);

        session.commit(state, artifacts, status);
        self.record(EventName::JdGenerated, json!({ "session_id": session_id }));
        if final_plan.is_some() {
            self.record(EventName::SessionFinalized, json!({ "session_id": session_id }));
        }

        Ok(ClarifyOutcome {
            job_description,
            final_plan,
        })
    }

    /// Resolves a follow-up request and, when it names a tool, runs one
    /// tool-loop iteration. A direct answer is recorded without dispatching.
    pub async fn follow_up(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<FollowUpOutcome, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("text cannot be empty".to_string()));
        }

        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        ensure_in_tool_loop(&session)?;

        self.record(
            EventName::FollowupSubmitted,
            json!({ "session_id": session_id, "text": text }),
        );

        let planned = plan_follow_up(
            self.workflow.backend(),
            text,
            &session.state.messages,
            &session.artifacts,
        )
        .await?;

        let mut state = session.state.clone();
        let mut artifacts = session.artifacts.clone();
        state.done_with_tools = false;

        let call = match planned {
            Planned::Tool(call) => call,
            Planned::Reply(reply) => {
                state.push(Message::human(text));
                state.push(Message::assistant(reply.clone()));
                let status = session.status;
                session.commit(state, artifacts, status);
                return Ok(FollowUpOutcome {
                    tool: None,
                    artifact_kind: None,
                    result_text: reply,
                });
            }
        };

        let tool = call.name().to_string();
        let artifact_kind = call.output_kind();
        self.record(
            EventName::ToolInvoked,
            json!({ "session_id": session_id, "tool": tool }),
        );
        state.push(Message::human(text).with_tool_call(call));

        let status = self
            .workflow
            .run(NodeId::ToolDispatch, &mut state, &mut artifacts)
            .await?;

        let result_text = state
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Tool)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        session.commit(state, artifacts, status);

        Ok(FollowUpOutcome {
            tool: Some(tool),
            artifact_kind,
            result_text,
        })
    }

    /// Marks the tool chat as done and compiles the final recruiting plan.
    pub async fn finish(&self, session_id: Uuid) -> Result<FinishOutcome, AppError> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        ensure_in_tool_loop(&session)?;

        let mut state = session.state.clone();
        let mut artifacts = session.artifacts.clone();
        state.done_with_tools = true;

        let status = self
            .workflow
            .continue_after(NodeId::ToolDispatch, &mut state, &mut artifacts)
            .await?;
        let plan = finished_plan(status, &state.messages).unwrap_or_default();

        session.commit(state, artifacts, status);
        self.record(EventName::SessionFinalized, json!({ "session_id": session_id }));

        Ok(FinishOutcome { plan })
    }

    pub async fn snapshot(&self, session_id: Uuid) -> Result<Session, AppError> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    pub async fn artifacts(&self, session_id: Uuid) -> Result<ArtifactStore, AppError> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        Ok(session.artifacts.clone())
    }

    async fn session(
        &self,
        session_id: Uuid,
    ) -> Result<Arc<tokio::sync::Mutex<Session>>, AppError> {
        self.sessions
            .get(session_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
    }

    fn record(&self, event_name: EventName, details: serde_json::Value) {
        self.analytics.record(AnalyticsEvent::now(event_name, details));
    }
}

fn ensure_in_tool_loop(session: &Session) -> Result<(), AppError> {
    match session.status {
        RunOutcome::Suspended(NodeId::ToolDispatch) => Ok(()),
        RunOutcome::Suspended(_) => Err(AppError::Conflict(format!(
            "Session {} has no job description yet; submit clarification answers with wants_tool_chat first",
            session.id
        ))),
        RunOutcome::Finished => Err(finalized(session.id)),
    }
}

fn finalized(session_id: Uuid) -> AppError {
    AppError::Conflict(format!("Session {session_id} is already finalized"))
}

fn finished_plan(status: RunOutcome, messages: &[Message]) -> Option<String> {
    match status {
        RunOutcome::Finished => messages.last().map(|m| m.content.clone()),
        RunOutcome::Suspended(_) => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MemorySink;
    use crate::errors::WorkflowError;
    use crate::llm_client::testing::{ScriptedBackend, StubSearch};
    use crate::tools::ToolRegistry;

    const QUESTIONS: &str = "- What are the essential skills?\n- How many years of experience?\n- Remote or on-site?";
    const JD: &str = "## Data Scientist\n\n**Location:** Remote\n\n### Responsibilities\n- Build models";

    fn service(llm: ScriptedBackend) -> (RecruitingService, Arc<MemorySink>) {
        let llm = Arc::new(llm);
        let tools = ToolRegistry::new(llm.clone(), Arc::new(StubSearch::new()));
        let workflow = Arc::new(Workflow::new(llm, tools, 10));
        let sink = Arc::new(MemorySink::new());
        (RecruitingService::new(workflow, sink.clone()), sink)
    }

    #[tokio::test]
    async fn test_scenario_role_to_job_description() {
        let (svc, sink) = service(ScriptedBackend::new().reply(QUESTIONS).reply(JD));

        let started = svc.start("I need to hire a data scientist", None).await.unwrap();
        assert!(!started.questions.is_empty());

        let clarified = svc
            .clarify(started.session_id, "5 years experience, remote, $120k", true)
            .await
            .unwrap();

        assert!(!clarified.job_description.is_empty());
        assert!(!clarified.job_description.contains("{role}"));
        assert!(!clarified.job_description.contains("{clarifications}"));
        assert!(clarified.final_plan.is_none());

        let artifacts = svc.artifacts(started.session_id).await.unwrap();
        assert_eq!(artifacts.jd, clarified.job_description);

        let session = svc.snapshot(started.session_id).await.unwrap();
        assert_eq!(
            session.state.recruiter_info.clarifications.as_deref(),
            Some("5 years experience, remote, $120k")
        );
        assert_eq!(session.status, RunOutcome::Suspended(NodeId::ToolDispatch));
        assert_eq!(
            sink.names(),
            vec![EventName::SessionStarted, EventName::JdGenerated]
        );
    }

    #[tokio::test]
    async fn test_scenario_outreach_email_updates_only_email() {
        let (svc, sink) = service(
            ScriptedBackend::new()
                .reply(QUESTIONS)
                .reply(JD)
                .reply(r#"{"tool": "write_outreach_email", "args": {"candidate": "Jane"}}"#)
                .reply("Hi Jane, we'd love to chat about a Data Scientist role."),
        );
        let id = svc.start("data scientist", None).await.unwrap().session_id;
        svc.clarify(id, "remote", true).await.unwrap();
        let before = svc.artifacts(id).await.unwrap();

        let outcome = svc
            .follow_up(id, "write an outreach email for Jane")
            .await
            .unwrap();

        assert_eq!(outcome.tool.as_deref(), Some("write_outreach_email"));
        assert_eq!(outcome.artifact_kind, Some(ArtifactKind::Email));
        let after = svc.artifacts(id).await.unwrap();
        assert_eq!(after.email, outcome.result_text);
        assert_eq!(after.jd, before.jd);
        assert_eq!(after.checklist, before.checklist);
        assert_eq!(after.offer_letter, before.offer_letter);
        assert!(sink.names().contains(&EventName::ToolInvoked));
    }

    #[tokio::test]
    async fn test_prose_follow_up_answers_without_dispatch() {
        let (svc, sink) = service(
            ScriptedBackend::new()
                .reply(QUESTIONS)
                .reply(JD)
                .reply("Sure, a typical next step is a phone screen."),
        );
        let id = svc.start("data scientist", None).await.unwrap().session_id;
        svc.clarify(id, "remote", true).await.unwrap();
        let before = svc.snapshot(id).await.unwrap();

        let outcome = svc.follow_up(id, "what should I do next?").await.unwrap();

        assert_eq!(outcome.tool, None);
        assert_eq!(outcome.artifact_kind, None);
        assert_eq!(
            outcome.result_text,
            "Sure, a typical next step is a phone screen."
        );
        let after = svc.snapshot(id).await.unwrap();
        assert_eq!(after.artifacts, before.artifacts);
        assert_eq!(after.state.tool_iterations, 0);
        assert_eq!(after.status, RunOutcome::Suspended(NodeId::ToolDispatch));
        assert_eq!(
            after.state.last_message().unwrap(),
            &Message::assistant("Sure, a typical next step is a phone screen.")
        );
        assert!(!sink.names().contains(&EventName::ToolInvoked));
    }

    #[tokio::test]
    async fn test_events_carry_session_id() {
        let (svc, sink) = service(
            ScriptedBackend::new()
                .reply(QUESTIONS)
                .reply(JD)
                .reply(r#"{"tool": "web_search", "args": {"query": "salaries"}}"#),
        );
        let id = svc.start("data scientist", None).await.unwrap().session_id;
        svc.clarify(id, "remote", true).await.unwrap();
        svc.follow_up(id, "look up salaries").await.unwrap();
        svc.finish(id).await.unwrap();

        let events = sink.events();
        assert_eq!(
            sink.names(),
            vec![
                EventName::SessionStarted,
                EventName::JdGenerated,
                EventName::FollowupSubmitted,
                EventName::ToolInvoked,
                EventName::SessionFinalized,
            ]
        );
        for event in events {
            assert_eq!(event.details["session_id"], id.to_string());
        }
    }

    #[tokio::test]
    async fn test_scenario_three_tool_iterations_then_finalize() {
        let mut llm = ScriptedBackend::new().reply(QUESTIONS).reply(JD);
        for i in 0..3 {
            llm = llm
                .reply(r#"{"tool": "generate_checklist", "args": {"context": "the JD"}}"#)
                .reply(format!("Checklist v{i}"));
        }
        let (svc, _) = service(llm);
        let id = svc.start("data scientist", None).await.unwrap().session_id;
        svc.clarify(id, "remote", true).await.unwrap();

        for i in 0..3 {
            let outcome = svc.follow_up(id, "make a hiring checklist").await.unwrap();
            assert_eq!(outcome.result_text, format!("Checklist v{i}"));
        }
        let finished = svc.finish(id).await.unwrap();

        let session = svc.snapshot(id).await.unwrap();
        assert_eq!(session.state.tool_iterations, 3);
        assert_eq!(session.status, RunOutcome::Finished);
        assert!(finished.plan.starts_with("Final Recruiting Plan:\n\n"));
        assert!(finished.plan.contains(JD));
        assert_eq!(session.artifacts.checklist, "Checklist v2");
    }

    #[tokio::test]
    async fn test_missing_argument_leaves_session_untouched() {
        let (svc, _) = service(
            ScriptedBackend::new()
                .reply(QUESTIONS)
                .reply(JD)
                .reply(r#"{"tool": "generate_offer_letter", "args": {"candidate_name": "Jane"}}"#),
        );
        let id = svc.start("data scientist", None).await.unwrap().session_id;
        svc.clarify(id, "remote", true).await.unwrap();
        let before = svc.snapshot(id).await.unwrap();

        let result = svc.follow_up(id, "offer letter for Jane").await;

        assert!(matches!(
            result,
            Err(AppError::Workflow(WorkflowError::MissingArgument { .. }))
        ));
        let after = svc.snapshot(id).await.unwrap();
        assert_eq!(after.artifacts, before.artifacts);
        assert_eq!(after.state, before.state);
    }

    #[tokio::test]
    async fn test_declining_tool_chat_finalizes_immediately() {
        let (svc, sink) = service(ScriptedBackend::new().reply(QUESTIONS).reply(JD));
        let id = svc.start("data scientist", None).await.unwrap().session_id;

        let clarified = svc.clarify(id, "remote", false).await.unwrap();

        let plan = clarified.final_plan.unwrap();
        assert!(plan.starts_with("Final Recruiting Plan:"));
        assert!(plan.contains(JD));
        assert!(sink.names().contains(&EventName::SessionFinalized));

        let follow_up = svc.follow_up(id, "write an email").await;
        assert!(matches!(follow_up, Err(AppError::Conflict(_))));
        let again = svc.clarify(id, "on-site", true).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_follow_up_before_clarification_is_conflict() {
        let (svc, _) = service(ScriptedBackend::new().reply(QUESTIONS));
        let id = svc.start("data scientist", None).await.unwrap().session_id;

        assert!(matches!(
            svc.follow_up(id, "write an email").await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(svc.finish(id).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_resubmitted_clarifications_overwrite() {
        let (svc, _) = service(
            ScriptedBackend::new()
                .reply(QUESTIONS)
                .reply("JD v1")
                .reply("JD v2"),
        );
        let id = svc.start("data scientist", None).await.unwrap().session_id;
        svc.clarify(id, "remote", true).await.unwrap();

        let second = svc.clarify(id, "on-site in Austin", true).await.unwrap();

        assert_eq!(second.job_description, "JD v2");
        let session = svc.snapshot(id).await.unwrap();
        assert_eq!(
            session.state.recruiter_info.clarifications.as_deref(),
            Some("on-site in Austin")
        );
        assert_eq!(session.artifacts.jd, "JD v2");
    }

    #[tokio::test]
    async fn test_jd_backend_failure_returns_fallback() {
        let (svc, _) = service(ScriptedBackend::new().reply(QUESTIONS).fail(503));
        let id = svc.start("data scientist", None).await.unwrap().session_id;

        let clarified = svc.clarify(id, "remote", true).await.unwrap();

        assert_eq!(
            clarified.job_description,
            "Something went wrong generating the job description."
        );
        assert_eq!(svc.artifacts(id).await.unwrap().jd, "");
    }

    #[tokio::test]
    async fn test_start_failure_creates_no_session() {
        let (svc, _) = service(ScriptedBackend::new().fail(401));
        let id = Uuid::new_v4();

        let result = svc.start("data scientist", Some(id)).await;

        assert!(matches!(
            result,
            Err(AppError::Workflow(WorkflowError::Backend(_)))
        ));
        assert!(matches!(svc.snapshot(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected() {
        let (svc, _) = service(ScriptedBackend::new());
        assert!(matches!(
            svc.start("   ", None).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            svc.clarify(Uuid::new_v4(), "", true).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            svc.follow_up(Uuid::new_v4(), "email").await,
            Err(AppError::NotFound(_))
        ));
    }
}
