//! Client-facing lifecycle types.

use std::fmt;

/// Status of a remote task, as reported by the sandbox control plane.
///
/// # State machine (remote side)
/// ```text
/// running -> completed
///         \-> failed
///         \-> cancelling -> cancelled
///         \-> unsupported
/// ```
///
/// Labels this client does not recognize are carried through as
/// [`TaskStatus::Other`] and treated as still in progress, so the control
/// plane can introduce new transient states without breaking callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Submitted, in progress
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
    /// Terminated by the caller before completion
    Cancelled,
    /// The remote system declined to run the task
    Unsupported,
    /// Cancellation requested, not yet confirmed
    Cancelling,
    /// Unrecognized label; non-terminal
    Other(String),
}

impl TaskStatus {
    /// Parse a wire label. Never fails; unknown labels become `Other`.
    pub fn parse(label: &str) -> Self {
        match label {
            "running" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            "cancelled" => TaskStatus::Cancelled,
            "unsupported" => TaskStatus::Unsupported,
            "cancelling" => TaskStatus::Cancelling,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Unsupported => "unsupported",
            TaskStatus::Cancelling => "cancelling",
            TaskStatus::Other(label) => label,
        }
    }

    /// Check if no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed
                | TaskStatus::Failed
                | TaskStatus::Cancelled
                | TaskStatus::Unsupported
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a submit, wait, or terminate call.
///
/// Constructed fresh by every call and never mutated afterwards; the
/// caller owns it. Terminal task outcomes are regular values here, not
/// errors, so callers branch on `task_status` without error handling.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    /// Opaque correlation key minted by the remote system
    pub task_id: String,
    pub task_status: TaskStatus,
    /// Free-form output; only meaningful when `task_status` is completed
    pub task_result: String,
    pub error_message: String,
    /// Per-RPC trace id, not per-task
    pub request_id: String,
}

impl ExecutionResult {
    /// A failed result with no task attached.
    pub(crate) fn failed(error_message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            success: false,
            task_id: String::new(),
            task_status: TaskStatus::Failed,
            task_result: String::new(),
            error_message: error_message.into(),
            request_id: request_id.into(),
        }
    }
}

/// Snapshot of a task's state from one status query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub success: bool,
    pub task_id: String,
    pub task_status: TaskStatus,
    /// Human-readable description of the current step, for progress
    /// reporting only
    pub task_action: String,
    /// Raw result payload; populated from `result`, falling back to the
    /// legacy `product` key
    pub task_product: String,
    pub error_message: String,
    pub request_id: String,
}

impl QueryResult {
    pub(crate) fn failed(error_message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            success: false,
            task_id: String::new(),
            task_status: TaskStatus::Failed,
            task_action: String::new(),
            task_product: String::new(),
            error_message: error_message.into(),
            request_id: request_id.into(),
        }
    }
}
