//! Router: the pure transition function of the recruiting workflow.
//!
//! Every node has exactly one defined successor for any state, so the
//! workflow can never stall on an undefined edge.

use serde::{Deserialize, Serialize};

use super::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Extract,
    Clarify,
    GenerateJd,
    ToolDispatch,
    Finalize,
}

impl NodeId {
    #[cfg(test)]
    pub const ALL: [NodeId; 5] = [
        NodeId::Extract,
        NodeId::Clarify,
        NodeId::GenerateJd,
        NodeId::ToolDispatch,
        NodeId::Finalize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Extract => "extract",
            NodeId::Clarify => "clarify",
            NodeId::GenerateJd => "generate_jd",
            NodeId::ToolDispatch => "tool_dispatch",
            NodeId::Finalize => "finalize",
        }
    }
}

/// Where to go after a node completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Node(NodeId),
    End,
}

/// Enter the tool loop only if the recruiter asked for it.
pub fn route_after_jd(state: &SessionState) -> NodeId {
    if state.wants_tool_chat {
        NodeId::ToolDispatch
    } else {
        NodeId::Finalize
    }
}

/// Stay in the tool loop until the recruiter says they're done.
pub fn route_after_tool(state: &SessionState) -> NodeId {
    if state.done_with_tools {
        NodeId::Finalize
    } else {
        NodeId::ToolDispatch
    }
}

pub fn next_node(current: NodeId, state: &SessionState) -> Next {
    match current {
        NodeId::Extract => Next::Node(NodeId::Clarify),
        NodeId::Clarify => Next::Node(NodeId::GenerateJd),
        NodeId::GenerateJd => Next::Node(route_after_jd(state)),
        NodeId::ToolDispatch => Next::Node(route_after_tool(state)),
        NodeId::Finalize => Next::End,
    }
}

/// Renders the graph as a Mermaid flowchart.
pub fn mermaid() -> String {
    let edges = [
        ("__start__", "extract", None),
        ("extract", "clarify", None),
        ("clarify", "generate_jd", None),
        ("generate_jd", "tool_dispatch", Some("wants_tool_chat")),
        ("generate_jd", "finalize", Some("otherwise")),
        ("tool_dispatch", "tool_dispatch", Some("more tools")),
        ("tool_dispatch", "finalize", Some("done_with_tools")),
        ("finalize", "__end__", None),
    ];

    let mut out = String::from("graph TD;\n");
    for (from, to, label) in edges {
        match label {
            Some(label) => out.push_str(&format!("    {from} -. {label} .-> {to};\n")),
            None => out.push_str(&format!("    {from} --> {to};\n")),
        }
    }
    out
}
