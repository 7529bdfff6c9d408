//! Agent variants and tool-name resolution.
//!
//! The three automation surfaces share one lifecycle core and differ only
//! in which remote tools they call and whether submission is retried.

use serde::{Deserialize, Serialize};

/// Abstract lifecycle action, resolved to a concrete remote tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentAction {
    Execute,
    GetStatus,
    Terminate,
}

impl AgentAction {
    /// Base tool name, before any variant prefix is applied.
    pub fn base_name(&self) -> &'static str {
        match self {
            AgentAction::Execute => "execute_task",
            AgentAction::GetStatus => "get_task_status",
            AgentAction::Terminate => "terminate_task",
        }
    }
}

/// One of the automation surfaces a sandbox exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentVariant {
    /// Browser automation; tool names carry the `page_use` prefix.
    Browser,
    /// Desktop ("computer use") automation; tool names carry the `flux`
    /// prefix.
    Computer,
    /// Mobile automation; unprefixed tool names, retried submission.
    Mobile,
}

impl AgentVariant {
    pub fn tool_prefix(&self) -> &'static str {
        match self {
            AgentVariant::Browser => "page_use",
            AgentVariant::Computer => "flux",
            AgentVariant::Mobile => "",
        }
    }

    /// The mobile transport drops submissions often enough that its
    /// submissions are retried; the other variants submit once.
    pub fn retries_submission(&self) -> bool {
        matches!(self, AgentVariant::Mobile)
    }

    /// Resolve an action to the concrete remote tool name.
    pub fn tool_name(&self, action: AgentAction) -> String {
        let prefix = self.tool_prefix();
        if prefix.is_empty() {
            action.base_name().to_string()
        } else {
            format!("{}_{}", prefix, action.base_name())
        }
    }
}
