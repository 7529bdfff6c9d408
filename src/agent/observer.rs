//! Progress observation during the wait loop.

use tracing::info;

/// Receives per-iteration progress while a task is being polled.
///
/// Injected into the agent so callers (and tests) control the side effect;
/// the default implementation logs through `tracing`.
pub trait TaskObserver: Send + Sync {
    fn on_progress(&self, task_id: &str, action: &str);
}

/// Default observer: logs task progress at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TaskObserver for TracingObserver {
    fn on_progress(&self, task_id: &str, action: &str) {
        if action.is_empty() {
            info!(task_id, "task still running");
        } else {
            info!(task_id, action, "task progress");
        }
    }
}
