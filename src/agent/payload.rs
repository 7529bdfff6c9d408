//! Wire payloads exchanged with the task tools.
//!
//! The control plane has used both `taskId` and `task_id` spellings for the
//! identifier field over time; serde aliases accept either. All response
//! fields are optional so partially-populated payloads still parse.

use serde::Deserialize;

/// Response payload from `execute_task`, carrying the minted identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskIdPayload {
    #[serde(default, alias = "taskId")]
    pub task_id: Option<String>,
}

/// Response payload from `get_task_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    #[serde(default, alias = "taskId")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

impl StatusPayload {
    /// Resolve the result payload: `result` takes precedence over the
    /// legacy `product` key when present and non-empty.
    pub fn resolved_product(&self) -> &str {
        match self.result.as_deref() {
            Some(result) if !result.is_empty() => result,
            _ => self.product.as_deref().unwrap_or(""),
        }
    }
}

/// Response payload from `terminate_task`. The remote system may echo a
/// different canonical id and an authoritative status.
#[derive(Debug, Clone, Deserialize)]
pub struct TerminatePayload {
    #[serde(default, alias = "taskId")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
