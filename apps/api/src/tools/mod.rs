//! Tool Registry: the follow-up operations a recruiter can trigger.
//!
//! Tool calls are a closed enum with typed arguments. Loosely-typed requests
//! from the planner (`RawToolCall`) are validated against the declared
//! `ToolSpec` schemas exactly once, in `ToolCall::from_raw`. Dispatch is a
//! single exhaustive match; results are returned verbatim from the backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::artifacts::ArtifactKind;
use crate::errors::WorkflowError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{GenerationBackend, PromptMessage, SearchBackend};

pub mod planner;
pub mod prompts;

use prompts::{
    CHECKLIST_TEMPLATE, EDIT_CONTENT_TEMPLATE, OFFER_LETTER_TEMPLATE, OUTREACH_EMAIL_TEMPLATE,
};

// ────────────────────────────────────────────────────────────────────────────
// Declared schemas
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    OutreachEmail,
    Checklist,
    WebSearch,
    OfferLetter,
    EditContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRequirement {
    Required,
    Default(&'static str),
    Optional,
}

#[derive(Debug)]
pub struct ArgSpec {
    pub name: &'static str,
    pub requirement: ArgRequirement,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct ToolSpec {
    pub kind: ToolKind,
    pub name: &'static str,
    /// Older names the planner may still emit.
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub args: &'static [ArgSpec],
}

pub const TOOL_SPECS: [ToolSpec; 5] = [
    ToolSpec {
        kind: ToolKind::OutreachEmail,
        name: "write_outreach_email",
        aliases: &[],
        description: "Write a friendly outreach email for a specified purpose (e.g., interview, follow-up).",
        args: &[
            ArgSpec {
                name: "purpose",
                requirement: ArgRequirement::Default("interview"),
                description: "why the candidate is being contacted",
            },
            ArgSpec {
                name: "candidate",
                requirement: ArgRequirement::Default("the candidate"),
                description: "who the email is addressed to",
            },
        ],
    },
    ToolSpec {
        kind: ToolKind::Checklist,
        name: "generate_checklist",
        aliases: &[],
        description: "Generate a hiring checklist based on the job description.",
        args: &[ArgSpec {
            name: "context",
            requirement: ArgRequirement::Required,
            description: "the job description or hiring plan to base the checklist on",
        }],
    },
    ToolSpec {
        kind: ToolKind::WebSearch,
        name: "web_search",
        aliases: &["google_web_search"],
        description: "Perform a real-time web search (salary benchmarks, market data, competitors).",
        args: &[ArgSpec {
            name: "query",
            requirement: ArgRequirement::Required,
            description: "the search query",
        }],
    },
    ToolSpec {
        kind: ToolKind::OfferLetter,
        name: "generate_offer_letter",
        aliases: &[],
        description: "Generate a professional offer letter given a candidate's name and salary.",
        args: &[
            ArgSpec {
                name: "candidate_name",
                requirement: ArgRequirement::Required,
                description: "full name of the candidate",
            },
            ArgSpec {
                name: "salary",
                requirement: ArgRequirement::Required,
                description: "annual salary being offered",
            },
        ],
    },
    ToolSpec {
        kind: ToolKind::EditContent,
        name: "edit_content",
        aliases: &[],
        description: "Edit a piece of content (JD, email, checklist, offer letter) based on user instructions.",
        args: &[
            ArgSpec {
                name: "existing",
                requirement: ArgRequirement::Required,
                description: "the exact text being edited",
            },
            ArgSpec {
                name: "instruction",
                requirement: ArgRequirement::Required,
                description: "what to change",
            },
            ArgSpec {
                name: "target",
                requirement: ArgRequirement::Optional,
                description: "artifact key being edited: jd, email, checklist or offer_letter",
            },
        ],
    },
];

/// Looks up a tool by its name or one of its aliases.
pub fn find_spec(name: &str) -> Option<&'static ToolSpec> {
    TOOL_SPECS
        .iter()
        .find(|spec| spec.name == name || spec.aliases.contains(&name))
}

/// Renders the tool list for the planner prompt.
pub fn render_catalogue() -> String {
    TOOL_SPECS
        .iter()
        .map(|spec| {
            let args = spec
                .args
                .iter()
                .map(|arg| {
                    let requirement = match arg.requirement {
                        ArgRequirement::Required => "required".to_string(),
                        ArgRequirement::Default(d) => format!("optional, default \"{d}\""),
                        ArgRequirement::Optional => "optional".to_string(),
                    };
                    format!("    - {} ({}): {}", arg.name, requirement, arg.description)
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("- {}: {}\n{}", spec.name, spec.description, args)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Tool calls
// ────────────────────────────────────────────────────────────────────────────

/// Loosely-typed tool request as produced by the planner.
#[derive(Debug, Clone, Deserialize)]
pub struct RawToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// A validated request to run one registered tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum ToolCall {
    WriteOutreachEmail {
        purpose: String,
        candidate: String,
    },
    GenerateChecklist {
        context: String,
    },
    WebSearch {
        query: String,
    },
    GenerateOfferLetter {
        candidate_name: String,
        salary: String,
    },
    EditContent {
        existing: String,
        instruction: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<ArtifactKind>,
    },
}

impl ToolCall {
    /// Validates a raw request against the declared schema, applying defaults.
    pub fn from_raw(raw: &RawToolCall) -> Result<Self, WorkflowError> {
        let spec =
            find_spec(&raw.tool).ok_or_else(|| WorkflowError::ToolNotFound(raw.tool.clone()))?;
        let args = &raw.args;

        Ok(match spec.kind {
            ToolKind::OutreachEmail => ToolCall::WriteOutreachEmail {
                purpose: required_arg(spec, args, "purpose")?,
                candidate: required_arg(spec, args, "candidate")?,
            },
            ToolKind::Checklist => ToolCall::GenerateChecklist {
                context: required_arg(spec, args, "context")?,
            },
            ToolKind::WebSearch => ToolCall::WebSearch {
                query: required_arg(spec, args, "query")?,
            },
            ToolKind::OfferLetter => ToolCall::GenerateOfferLetter {
                candidate_name: required_arg(spec, args, "candidate_name")?,
                salary: required_arg(spec, args, "salary")?,
            },
            ToolKind::EditContent => ToolCall::EditContent {
                existing: required_arg(spec, args, "existing")?,
                instruction: required_arg(spec, args, "instruction")?,
                target: resolve_arg(spec, args, "target")?
                    .and_then(|t| serde_json::from_value(Value::String(t)).ok()),
            },
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::WriteOutreachEmail { .. } => "write_outreach_email",
            ToolCall::GenerateChecklist { .. } => "generate_checklist",
            ToolCall::WebSearch { .. } => "web_search",
            ToolCall::GenerateOfferLetter { .. } => "generate_offer_letter",
            ToolCall::EditContent { .. } => "edit_content",
        }
    }

    /// The artifact slot this call's result replaces, if any.
    pub fn output_kind(&self) -> Option<ArtifactKind> {
        match self {
            ToolCall::WriteOutreachEmail { .. } => Some(ArtifactKind::Email),
            ToolCall::GenerateChecklist { .. } => Some(ArtifactKind::Checklist),
            ToolCall::WebSearch { .. } => None,
            ToolCall::GenerateOfferLetter { .. } => Some(ArtifactKind::OfferLetter),
            ToolCall::EditContent { target, .. } => *target,
        }
    }

    /// The generation prompt for this call; `None` for calls served by search.
    pub fn prompt(&self) -> Option<String> {
        match self {
            ToolCall::WriteOutreachEmail { purpose, candidate } => Some(fill_template(
                OUTREACH_EMAIL_TEMPLATE,
                &[("candidate", candidate.as_str()), ("purpose", purpose.as_str())],
            )),
            ToolCall::GenerateChecklist { context } => {
                Some(fill_template(CHECKLIST_TEMPLATE, &[("context", context.as_str())]))
            }
            ToolCall::WebSearch { .. } => None,
            ToolCall::GenerateOfferLetter {
                candidate_name,
                salary,
            } => Some(fill_template(
                OFFER_LETTER_TEMPLATE,
                &[("candidate_name", candidate_name.as_str()), ("salary", salary.as_str())],
            )),
            ToolCall::EditContent {
                existing,
                instruction,
                ..
            } => Some(fill_template(
                EDIT_CONTENT_TEMPLATE,
                &[("existing", existing.as_str()), ("instruction", instruction.as_str())],
            )),
        }
    }
}

/// Argument value as text: strings verbatim, numbers and booleans rendered,
/// blank strings and nulls treated as absent.
fn value_as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

fn resolve_arg(
    spec: &ToolSpec,
    args: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, WorkflowError> {
    let requirement = spec
        .args
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.requirement)
        .unwrap_or(ArgRequirement::Optional);

    match (args.get(name).and_then(value_as_text), requirement) {
        (Some(value), _) => Ok(Some(value)),
        (None, ArgRequirement::Default(default)) => Ok(Some(default.to_string())),
        (None, ArgRequirement::Optional) => Ok(None),
        (None, ArgRequirement::Required) => Err(WorkflowError::MissingArgument {
            tool: spec.name.to_string(),
            argument: name.to_string(),
        }),
    }
}

fn required_arg(
    spec: &ToolSpec,
    args: &Map<String, Value>,
    name: &str,
) -> Result<String, WorkflowError> {
    resolve_arg(spec, args, name)?.ok_or_else(|| WorkflowError::MissingArgument {
        tool: spec.name.to_string(),
        argument: name.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Executes validated tool calls against the generation and search backends.
#[derive(Clone)]
pub struct ToolRegistry {
    llm: Arc<dyn GenerationBackend>,
    search: Arc<dyn SearchBackend>,
}

impl ToolRegistry {
    pub fn new(llm: Arc<dyn GenerationBackend>, search: Arc<dyn SearchBackend>) -> Self {
        Self { llm, search }
    }

    /// Runs one tool call and returns its text result unmodified.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<String, WorkflowError> {
        info!("Dispatching tool {}", call.name());

        if let ToolCall::WebSearch { query } = call {
            return Ok(self.search.search(query).await?);
        }

        match call.prompt() {
            Some(prompt) => Ok(self.llm.generate(&[PromptMessage::human(prompt)]).await?),
            None => Err(WorkflowError::ToolNotFound(call.name().to_string())),
        }
    }
}
