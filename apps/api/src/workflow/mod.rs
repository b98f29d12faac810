//! Recruiting workflow: a finite-state machine over `SessionState`.
//!
//! Flow: extract → clarify → generate_jd → (tool_dispatch)* → finalize.
//!
//! A run executes one node at a time and consults the router after each.
//! It suspends in front of a node that needs recruiter input it does not
//! have yet (answers for `clarify`, a tool request for `tool_dispatch`);
//! the session records that node and the next inbound call resumes there.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::errors::WorkflowError;
use crate::llm_client::GenerationBackend;
use crate::tools::ToolRegistry;

pub mod nodes;
pub mod prompts;
pub mod router;
pub mod state;

pub use router::{NodeId, Next};
pub use state::{Message, MessageRole, SessionState};

/// Default upper bound on tool-loop iterations per session.
pub const DEFAULT_MAX_TOOL_ITERATIONS: u32 = 25;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "node", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Waiting for recruiter input before running this node.
    Suspended(NodeId),
    /// `finalize` ran; the workflow is over.
    Finished,
}

pub struct Workflow {
    llm: Arc<dyn GenerationBackend>,
    tools: ToolRegistry,
    max_tool_iterations: u32,
}

impl Workflow {
    pub fn new(
        llm: Arc<dyn GenerationBackend>,
        tools: ToolRegistry,
        max_tool_iterations: u32,
    ) -> Self {
        Self {
            llm,
            tools,
            max_tool_iterations,
        }
    }

    pub fn backend(&self) -> &dyn GenerationBackend {
        self.llm.as_ref()
    }

    pub fn max_tool_iterations(&self) -> u32 {
        self.max_tool_iterations
    }

    /// True when `node` cannot run until the recruiter supplies more input.
    pub fn awaits_input(node: NodeId, state: &SessionState) -> bool {
        match node {
            NodeId::Clarify => state
                .last_message()
                .map_or(true, |m| m.role != MessageRole::Human),
            NodeId::ToolDispatch => state.pending_tool_call().is_none(),
            NodeId::Extract | NodeId::GenerateJd | NodeId::Finalize => false,
        }
    }

    /// Runs from `entry` until the workflow finishes or needs input.
    pub async fn run(
        &self,
        entry: NodeId,
        state: &mut SessionState,
        artifacts: &mut ArtifactStore,
    ) -> Result<RunOutcome, WorkflowError> {
        let mut node = entry;
        loop {
            if Self::awaits_input(node, state) {
                debug!("Suspending before {}", node.as_str());
                return Ok(RunOutcome::Suspended(node));
            }

            debug!("Running node {}", node.as_str());
            self.execute(node, state, artifacts).await?;

            match router::next_node(node, state) {
                Next::Node(next) => node = next,
                Next::End => {
                    info!("Workflow finished after {}", node.as_str());
                    return Ok(RunOutcome::Finished);
                }
            }
        }
    }

    /// Re-evaluates the transition out of `node` against the current flags
    /// and continues from the chosen successor.
    pub async fn continue_after(
        &self,
        node: NodeId,
        state: &mut SessionState,
        artifacts: &mut ArtifactStore,
    ) -> Result<RunOutcome, WorkflowError> {
        match router::next_node(node, state) {
            Next::Node(next) => self.run(next, state, artifacts).await,
            Next::End => Ok(RunOutcome::Finished),
        }
    }

    async fn execute(
        &self,
        node: NodeId,
        state: &mut SessionState,
        artifacts: &mut ArtifactStore,
    ) -> Result<(), WorkflowError> {
        match node {
            NodeId::Extract => nodes::extract(self.llm.as_ref(), state).await,
            NodeId::Clarify => {
                nodes::clarify(state);
                Ok(())
            }
            NodeId::GenerateJd => {
                nodes::generate_jd(self.llm.as_ref(), state, artifacts).await;
                Ok(())
            }
            NodeId::ToolDispatch => {
                nodes::tool_dispatch(&self.tools, self.max_tool_iterations, state, artifacts).await
            }
            NodeId::Finalize => {
                nodes::finalize(state);
                Ok(())
            }
        }
    }
}
