//! Remote task lifecycle: submit, poll, terminate.
//!
//! A task is a human-language instruction ("find the weather in NYC",
//! "open Chrome") executed by an automation agent inside a remote sandbox.
//! The client never holds authoritative task state; every read is a fresh
//! round trip keyed by the opaque `task_id` the remote system minted at
//! submission.
//!
//! ## Flow
//! ```text
//! execute_task ──▶ task_id ──▶ get_task_status ──▶ terminal status
//!      │                            ▲    │
//!      └── execute_task_and_wait ───┘    └── terminate_task (any time)
//! ```
//!
//! Expected outcomes are returned as [`ExecutionResult`] / [`QueryResult`]
//! values, never as errors; callers branch on `task_status`.

mod observer;
mod payload;
mod types;
mod variant;

pub use observer::{TaskObserver, TracingObserver};
pub use payload::{StatusPayload, TaskIdPayload, TerminatePayload};
pub use types::{ExecutionResult, QueryResult, TaskStatus};
pub use variant::{AgentAction, AgentVariant};

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::invoker::ToolInvoker;

/// Default interval between status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default interval between mobile submission retries.
const SUBMIT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
/// Default submission attempt budget for retrying variants.
const DEFAULT_STEP_RETRIES: u32 = 3;

/// Client for one automation surface of a sandbox.
///
/// One shared lifecycle core; the variant only selects tool names and the
/// submission-retry policy. Agents hold no per-task state, so one agent
/// may drive any number of concurrent task lifecycles.
pub struct Agent {
    variant: AgentVariant,
    invoker: Arc<dyn ToolInvoker>,
    observer: Arc<dyn TaskObserver>,
    poll_interval: Duration,
    retry_interval: Duration,
    /// Forwarded to the remote system to bound its own step budget
    max_steps: Option<u32>,
    /// Client-side submission attempt budget (retrying variants only)
    max_step_retries: u32,
}

impl Agent {
    pub fn new(variant: AgentVariant, invoker: Arc<dyn ToolInvoker>) -> Self {
        Self {
            variant,
            invoker,
            observer: Arc::new(TracingObserver),
            poll_interval: POLL_INTERVAL,
            retry_interval: SUBMIT_RETRY_INTERVAL,
            max_steps: None,
            max_step_retries: DEFAULT_STEP_RETRIES,
        }
    }

    /// Browser-automation agent (`page_use_*` tools).
    pub fn browser(invoker: Arc<dyn ToolInvoker>) -> Self {
        Self::new(AgentVariant::Browser, invoker)
    }

    /// Desktop-automation agent (`flux_*` tools).
    pub fn computer(invoker: Arc<dyn ToolInvoker>) -> Self {
        Self::new(AgentVariant::Computer, invoker)
    }

    /// Mobile-automation agent (unprefixed tools, retried submission).
    pub fn mobile(invoker: Arc<dyn ToolInvoker>) -> Self {
        Self::new(AgentVariant::Mobile, invoker)
    }

    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Bound the remote system's own step budget (mobile).
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Client-side submission attempt budget (mobile). Clamped to at
    /// least one attempt.
    pub fn with_max_step_retries(mut self, retries: u32) -> Self {
        self.max_step_retries = retries.max(1);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn variant(&self) -> AgentVariant {
        self.variant
    }

    /// Submit a task described in human language.
    ///
    /// Returns as soon as the remote system has accepted (or rejected) the
    /// submission; the task keeps running remotely. On success the result
    /// carries the minted `task_id` with status `running`.
    pub async fn execute_task(&self, task: &str) -> ExecutionResult {
        let tool = self.variant.tool_name(AgentAction::Execute);
        let mut args = serde_json::json!({ "task": task });
        if let Some(max_steps) = self.max_steps {
            args["max_steps"] = max_steps.into();
        }

        let invocation = match self.invoker.invoke(&tool, args).await {
            Ok(invocation) => invocation,
            Err(e) => {
                return ExecutionResult::failed(format!("Failed to execute: {}", e), "");
            }
        };

        if !invocation.success {
            let message = if invocation.error_message.is_empty() {
                "Failed to execute task".to_string()
            } else {
                invocation.error_message
            };
            return ExecutionResult::failed(message, invocation.request_id);
        }

        match serde_json::from_str::<TaskIdPayload>(&invocation.data) {
            Ok(payload) => match payload.task_id {
                Some(task_id) if !task_id.is_empty() => {
                    debug!(%task_id, tool, "task submitted");
                    ExecutionResult {
                        success: true,
                        task_id,
                        task_status: TaskStatus::Running,
                        task_result: String::new(),
                        error_message: String::new(),
                        request_id: invocation.request_id,
                    }
                }
                _ => ExecutionResult::failed(
                    "No task ID found in response",
                    invocation.request_id,
                ),
            },
            Err(e) => ExecutionResult::failed(
                format!("Failed to parse task response: {}", e),
                invocation.request_id,
            ),
        }
    }

    /// Query the current status of a task.
    ///
    /// Pure read; idempotent and safe to call at any cadence. Missing
    /// response fields are defaulted rather than rejected.
    pub async fn get_task_status(&self, task_id: &str) -> QueryResult {
        let tool = self.variant.tool_name(AgentAction::GetStatus);
        let args = serde_json::json!({ "task_id": task_id });

        let invocation = match self.invoker.invoke(&tool, args).await {
            Ok(invocation) => invocation,
            Err(e) => {
                return QueryResult::failed(format!("Failed to get task status: {}", e), "");
            }
        };

        if !invocation.success {
            let message = if invocation.error_message.is_empty() {
                "Failed to get task status".to_string()
            } else {
                invocation.error_message
            };
            return QueryResult::failed(message, invocation.request_id);
        }

        match serde_json::from_str::<StatusPayload>(&invocation.data) {
            Ok(payload) => QueryResult {
                success: true,
                task_id: payload
                    .task_id
                    .clone()
                    .unwrap_or_else(|| task_id.to_string()),
                // The control plane omits the status field once a task has
                // finished; treating absence as completed is best-effort
                // compatibility with that behavior, not a contract.
                task_status: payload
                    .status
                    .as_deref()
                    .map(TaskStatus::parse)
                    .unwrap_or(TaskStatus::Completed),
                task_action: payload.action.clone().unwrap_or_default(),
                task_product: payload.resolved_product().to_string(),
                error_message: String::new(),
                request_id: invocation.request_id,
            },
            Err(e) => QueryResult::failed(
                format!("Failed to parse status response: {}", e),
                invocation.request_id,
            ),
        }
    }

    /// Submit a task and block until it reaches a terminal state or the
    /// attempt budget runs out.
    ///
    /// The budget is counted in status-query attempts, not wall-clock
    /// time: total wait grows with per-call latency. Callers that need a
    /// hard deadline must size `max_try_times` accordingly. An exhausted
    /// budget is reported as a failed result whose `error_message` is
    /// exactly `"Task timeout."`.
    pub async fn execute_task_and_wait(&self, task: &str, max_try_times: u32) -> ExecutionResult {
        self.execute_task_and_wait_cancellable(task, max_try_times, &CancellationToken::new())
            .await
    }

    /// Like [`Agent::execute_task_and_wait`], interruptible via `cancel`.
    ///
    /// Cancellation stops the client-side wait only; the remote task keeps
    /// running until [`Agent::terminate_task`] is called or it finishes on
    /// its own. A cancelled wait reports `cancelled` with the submitted
    /// `task_id` so the caller can still terminate or re-poll.
    pub async fn execute_task_and_wait_cancellable(
        &self,
        task: &str,
        max_try_times: u32,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let submitted = if self.variant.retries_submission() {
            self.execute_task_with_retry(task, cancel).await
        } else {
            self.execute_task(task).await
        };
        if !submitted.success || submitted.task_id.is_empty() {
            return submitted;
        }
        let task_id = submitted.task_id;

        for attempt in 0..max_try_times {
            let query = self.get_task_status(&task_id).await;
            // A polling-layer error is fatal, not retried.
            if !query.success {
                return ExecutionResult {
                    task_id,
                    ..ExecutionResult::failed(query.error_message, query.request_id)
                };
            }

            match query.task_status {
                TaskStatus::Completed => {
                    return ExecutionResult {
                        success: true,
                        task_id,
                        task_status: TaskStatus::Completed,
                        task_result: query.task_product,
                        error_message: String::new(),
                        request_id: query.request_id,
                    };
                }
                TaskStatus::Failed => {
                    return ExecutionResult {
                        task_id,
                        ..ExecutionResult::failed("Failed to execute task.", query.request_id)
                    };
                }
                TaskStatus::Cancelled => {
                    return ExecutionResult {
                        success: false,
                        task_id,
                        task_status: TaskStatus::Cancelled,
                        task_result: String::new(),
                        error_message: "Task was cancelled.".to_string(),
                        request_id: query.request_id,
                    };
                }
                TaskStatus::Unsupported => {
                    return ExecutionResult {
                        success: false,
                        task_id,
                        task_status: TaskStatus::Unsupported,
                        task_result: String::new(),
                        error_message: "Unsupported task.".to_string(),
                        request_id: query.request_id,
                    };
                }
                // Anything else, including labels this client does not
                // know, counts as still running.
                _ => {
                    debug!(%task_id, attempt, status = %query.task_status, "task not yet terminal");
                    self.observer.on_progress(&task_id, &query.task_action);
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return ExecutionResult {
                                success: false,
                                task_id,
                                task_status: TaskStatus::Cancelled,
                                task_result: String::new(),
                                error_message: "Polling cancelled by caller.".to_string(),
                                request_id: query.request_id,
                            };
                        }
                        _ = sleep(self.poll_interval) => {}
                    }
                }
            }
        }

        warn!(%task_id, max_try_times, "task did not reach a terminal state within the attempt budget");
        ExecutionResult {
            success: false,
            task_id,
            task_status: TaskStatus::Failed,
            task_result: "Task timeout.".to_string(),
            error_message: "Task timeout.".to_string(),
            request_id: String::new(),
        }
    }

    /// Request cancellation of a running task.
    ///
    /// Acknowledgement is optimistic: unless the payload carries an
    /// authoritative status, a successful result reports `cancelling`.
    /// Callers that need the final state poll [`Agent::get_task_status`].
    pub async fn terminate_task(&self, task_id: &str) -> ExecutionResult {
        let tool = self.variant.tool_name(AgentAction::Terminate);
        let args = serde_json::json!({ "task_id": task_id });

        let invocation = match self.invoker.invoke(&tool, args).await {
            Ok(invocation) => invocation,
            Err(e) => {
                return ExecutionResult {
                    task_id: task_id.to_string(),
                    ..ExecutionResult::failed(format!("Failed to terminate: {}", e), "")
                };
            }
        };

        // The payload may echo a corrected canonical id and an
        // authoritative status; both override the caller-supplied values.
        let payload: Option<TerminatePayload> = serde_json::from_str(&invocation.data).ok();
        let resolved_id = payload
            .as_ref()
            .and_then(|p| p.task_id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| task_id.to_string());
        let parsed_status = payload
            .as_ref()
            .and_then(|p| p.status.as_deref())
            .map(TaskStatus::parse);

        if invocation.success {
            ExecutionResult {
                success: true,
                task_id: resolved_id,
                task_status: parsed_status.unwrap_or(TaskStatus::Cancelling),
                task_result: String::new(),
                error_message: String::new(),
                request_id: invocation.request_id,
            }
        } else {
            let message = if invocation.error_message.is_empty() {
                "Failed to terminate task".to_string()
            } else {
                invocation.error_message
            };
            ExecutionResult {
                success: false,
                task_id: resolved_id,
                task_status: parsed_status.unwrap_or(TaskStatus::Failed),
                task_result: String::new(),
                error_message: message,
                request_id: invocation.request_id,
            }
        }
    }

    /// Bounded submission-retry loop for the mobile transport, which drops
    /// submissions at the network layer often enough to be worth it.
    /// Transport and application failures are retried uniformly; polling
    /// failures never are.
    async fn execute_task_with_retry(
        &self,
        task: &str,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let attempts = self.max_step_retries.max(1);
        let mut last = ExecutionResult::failed("Failed to execute task", "");

        for attempt in 0..attempts {
            last = self.execute_task(task).await;
            if last.success && !last.task_id.is_empty() {
                return last;
            }
            warn!(attempt, error = %last.error_message, "task submission failed");

            if attempt + 1 < attempts {
                tokio::select! {
                    // No task_id to report: nothing was minted yet.
                    _ = cancel.cancelled() => {
                        return ExecutionResult {
                            success: false,
                            task_id: String::new(),
                            task_status: TaskStatus::Cancelled,
                            task_result: String::new(),
                            error_message: "Polling cancelled by caller.".to_string(),
                            request_id: String::new(),
                        };
                    }
                    _ = sleep(self.retry_interval) => {}
                }
            }
        }

        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{InvokeError, InvokeResult};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted invoker: pops one canned response per call and records
    /// every (tool, args) pair.
    struct MockInvoker {
        responses: Mutex<VecDeque<Result<InvokeResult, InvokeError>>>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl MockInvoker {
        fn new(responses: Vec<Result<InvokeResult, InvokeError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }

        fn calls_to(&self, tool: &str) -> usize {
            self.calls()
                .iter()
                .filter(|(name, _)| name.as_str() == tool)
                .count()
        }
    }

    #[async_trait]
    impl ToolInvoker for MockInvoker {
        async fn invoke(&self, tool: &str, args: Value) -> Result<InvokeResult, InvokeError> {
            self.calls.lock().unwrap().push((tool.to_string(), args));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock invoker ran out of scripted responses")
        }
    }

    fn ok(data: &str) -> Result<InvokeResult, InvokeError> {
        Ok(InvokeResult {
            success: true,
            data: data.to_string(),
            error_message: String::new(),
            request_id: "req-1".to_string(),
        })
    }

    fn app_error(message: &str) -> Result<InvokeResult, InvokeError> {
        Ok(InvokeResult {
            success: false,
            data: String::new(),
            error_message: message.to_string(),
            request_id: "req-err".to_string(),
        })
    }

    fn transport_error() -> Result<InvokeResult, InvokeError> {
        Err(InvokeError::Network("connection refused".to_string()))
    }

    fn submit_ok(task_id: &str) -> Result<InvokeResult, InvokeError> {
        ok(&format!(r#"{{"taskId":"{}"}}"#, task_id))
    }

    fn status(status: &str) -> Result<InvokeResult, InvokeError> {
        ok(&format!(r#"{{"status":"{}","action":"step"}}"#, status))
    }

    struct RecordingObserver {
        events: Mutex<Vec<(String, String)>>,
    }

    impl TaskObserver for RecordingObserver {
        fn on_progress(&self, task_id: &str, action: &str) {
            self.events
                .lock()
                .unwrap()
                .push((task_id.to_string(), action.to_string()));
        }
    }

    #[tokio::test]
    async fn test_submit_accepts_either_task_id_spelling() {
        for data in [r#"{"taskId":"t-1"}"#, r#"{"task_id":"t-1"}"#] {
            let invoker = MockInvoker::new(vec![ok(data)]);
            let agent = Agent::browser(invoker.clone());
            let result = agent.execute_task("open chrome").await;
            assert!(result.success);
            assert_eq!(result.task_id, "t-1");
            assert_eq!(result.task_status, TaskStatus::Running);
            assert_eq!(
                invoker.calls()[0].0, "page_use_execute_task",
                "browser submit must go through the prefixed tool"
            );
        }
    }

    #[tokio::test]
    async fn test_submit_transport_failure() {
        let invoker = MockInvoker::new(vec![transport_error()]);
        let agent = Agent::computer(invoker);
        let result = agent.execute_task("open chrome").await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Failed);
        assert!(result.error_message.starts_with("Failed to execute:"));
        assert!(result.request_id.is_empty());
    }

    #[tokio::test]
    async fn test_submit_application_failure_keeps_request_id() {
        let invoker = MockInvoker::new(vec![app_error("quota exceeded")]);
        let agent = Agent::computer(invoker);
        let result = agent.execute_task("open chrome").await;
        assert!(!result.success);
        assert_eq!(result.error_message, "quota exceeded");
        assert_eq!(result.request_id, "req-err");
    }

    #[tokio::test]
    async fn test_submit_malformed_payload() {
        let invoker = MockInvoker::new(vec![ok("not json")]);
        let agent = Agent::computer(invoker);
        let result = agent.execute_task("open chrome").await;
        assert!(!result.success);
        assert!(result.error_message.starts_with("Failed to parse task response:"));

        let invoker = MockInvoker::new(vec![ok(r#"{"unrelated":1}"#)]);
        let agent = Agent::computer(invoker);
        let result = agent.execute_task("open chrome").await;
        assert!(!result.success);
        assert_eq!(result.error_message, "No task ID found in response");
    }

    #[tokio::test]
    async fn test_status_defaults_missing_fields() {
        let invoker = MockInvoker::new(vec![ok(r#"{"result":"done"}"#)]);
        let agent = Agent::browser(invoker);
        let query = agent.get_task_status("t-1").await;
        assert!(query.success);
        // Absent status means the task already finished remotely.
        assert_eq!(query.task_status, TaskStatus::Completed);
        assert_eq!(query.task_action, "");
        assert_eq!(query.task_product, "done");
        assert_eq!(query.task_id, "t-1");
    }

    #[tokio::test]
    async fn test_status_product_resolution() {
        let invoker = MockInvoker::new(vec![
            ok(r#"{"status":"completed","result":"A","product":"B"}"#),
            ok(r#"{"status":"completed","product":"B"}"#),
            ok(r#"{"status":"completed"}"#),
        ]);
        let agent = Agent::browser(invoker);
        assert_eq!(agent.get_task_status("t").await.task_product, "A");
        assert_eq!(agent.get_task_status("t").await.task_product, "B");
        assert_eq!(agent.get_task_status("t").await.task_product, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_terminal_statuses_resolve_on_first_poll() {
        let cases = [
            ("completed", true, TaskStatus::Completed, ""),
            ("failed", false, TaskStatus::Failed, "Failed to execute task."),
            ("cancelled", false, TaskStatus::Cancelled, "Task was cancelled."),
            ("unsupported", false, TaskStatus::Unsupported, "Unsupported task."),
        ];
        for (label, success, expected_status, message) in cases {
            let invoker = MockInvoker::new(vec![submit_ok("t-9"), status(label)]);
            let agent = Agent::browser(invoker.clone());
            let result = agent.execute_task_and_wait("do it", 10).await;
            assert_eq!(result.success, success, "status {}", label);
            assert_eq!(result.task_status, expected_status);
            assert_eq!(result.error_message, message);
            assert_eq!(result.task_id, "t-9");
            assert_eq!(invoker.calls_to("page_use_get_task_status"), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_product_on_completion() {
        let invoker = MockInvoker::new(vec![
            submit_ok("t-2"),
            status("running"),
            status("running"),
            ok(r#"{"status":"completed","result":"ok"}"#),
        ]);
        let agent = Agent::browser(invoker.clone());
        let result = agent.execute_task_and_wait("Open Chrome browser", 3).await;
        assert!(result.success);
        assert_eq!(result.task_status, TaskStatus::Completed);
        assert_eq!(result.task_result, "ok");
        assert_eq!(invoker.calls_to("page_use_get_task_status"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout_after_exact_budget() {
        let mut responses = vec![submit_ok("t-3")];
        responses.extend((0..5).map(|_| status("running")));
        let invoker = MockInvoker::new(responses);
        let agent = Agent::browser(invoker.clone());

        let result = agent.execute_task_and_wait("slow task", 5).await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Failed);
        assert_eq!(result.error_message, "Task timeout.");
        assert_eq!(result.task_result, "Task timeout.");
        assert_eq!(invoker.calls_to("page_use_get_task_status"), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_query_error_short_circuits() {
        let invoker = MockInvoker::new(vec![
            submit_ok("t-4"),
            status("running"),
            app_error("task not found"),
        ]);
        let agent = Agent::browser(invoker.clone());
        let result = agent.execute_task_and_wait("task", 10).await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Failed);
        assert_eq!(result.error_message, "task not found");
        assert_eq!(result.task_id, "t-4");
        assert_eq!(invoker.calls_to("page_use_get_task_status"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_unknown_status_counts_as_running() {
        let invoker = MockInvoker::new(vec![
            submit_ok("t-5"),
            status("warming_up"),
            status("completed"),
        ]);
        let agent = Agent::browser(invoker.clone());
        let result = agent.execute_task_and_wait("task", 5).await;
        assert!(result.success);
        assert_eq!(invoker.calls_to("page_use_get_task_status"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_failed_submission_never_polls() {
        let invoker = MockInvoker::new(vec![app_error("bad task")]);
        let agent = Agent::browser(invoker.clone());
        let result = agent.execute_task_and_wait("task", 5).await;
        assert!(!result.success);
        assert_eq!(result.error_message, "bad task");
        assert_eq!(invoker.calls_to("page_use_get_task_status"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mobile_submission_retry_succeeds_on_later_attempt() {
        let invoker = MockInvoker::new(vec![
            transport_error(),
            transport_error(),
            submit_ok("t-6"),
            status("completed"),
        ]);
        let agent = Agent::mobile(invoker.clone()).with_max_step_retries(3);
        let result = agent.execute_task_and_wait("tap the button", 5).await;
        assert!(result.success);
        assert_eq!(result.task_id, "t-6");
        assert_eq!(invoker.calls_to("execute_task"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mobile_submission_retry_exhaustion() {
        let invoker = MockInvoker::new(vec![
            transport_error(),
            app_error("rejected"),
            transport_error(),
        ]);
        let agent = Agent::mobile(invoker.clone()).with_max_step_retries(3);
        let result = agent.execute_task_and_wait("tap", 5).await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Failed);
        assert_eq!(invoker.calls_to("execute_task"), 3);
        assert_eq!(invoker.calls_to("get_task_status"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mobile_retry_sleep_observes_cancellation() {
        let invoker = MockInvoker::new(vec![transport_error()]);
        let agent = Agent::mobile(invoker.clone()).with_max_step_retries(3);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = agent
            .execute_task_and_wait_cancellable("tap", 5, &cancel)
            .await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Cancelled);
        assert_eq!(result.error_message, "Polling cancelled by caller.");
        assert!(result.task_id.is_empty());
        assert_eq!(invoker.calls_to("execute_task"), 1);
        assert_eq!(invoker.calls_to("get_task_status"), 0);
    }

    #[tokio::test]
    async fn test_mobile_forwards_max_steps() {
        let invoker = MockInvoker::new(vec![submit_ok("t-7")]);
        let agent = Agent::mobile(invoker.clone()).with_max_steps(25);
        let result = agent.execute_task("swipe up").await;
        assert!(result.success);
        let (tool, args) = invoker.calls()[0].clone();
        assert_eq!(tool, "execute_task");
        assert_eq!(args["task"], "swipe up");
        assert_eq!(args["max_steps"], 25);
    }

    #[tokio::test]
    async fn test_browser_submit_omits_max_steps() {
        let invoker = MockInvoker::new(vec![submit_ok("t-8")]);
        let agent = Agent::browser(invoker.clone());
        agent.execute_task("click").await;
        let (_, args) = invoker.calls()[0].clone();
        assert!(args.get("max_steps").is_none());
    }

    #[tokio::test]
    async fn test_terminate_defaults_to_cancelling() {
        let invoker = MockInvoker::new(vec![ok("{}")]);
        let agent = Agent::computer(invoker);
        let result = agent.terminate_task("t-10").await;
        assert!(result.success);
        assert_eq!(result.task_status, TaskStatus::Cancelling);
        assert_eq!(result.task_id, "t-10");
    }

    #[tokio::test]
    async fn test_terminate_payload_overrides_status_and_id() {
        let invoker = MockInvoker::new(vec![ok(
            r#"{"taskId":"canonical-10","status":"cancelled"}"#,
        )]);
        let agent = Agent::computer(invoker);
        let result = agent.terminate_task("t-10").await;
        assert!(result.success);
        assert_eq!(result.task_status, TaskStatus::Cancelled);
        assert_eq!(result.task_id, "canonical-10");
    }

    #[tokio::test]
    async fn test_terminate_application_failure() {
        let invoker = MockInvoker::new(vec![app_error("")]);
        let agent = Agent::computer(invoker);
        let result = agent.terminate_task("t-11").await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Failed);
        assert_eq!(result.error_message, "Failed to terminate task");
    }

    #[tokio::test]
    async fn test_terminate_transport_failure() {
        let invoker = MockInvoker::new(vec![transport_error()]);
        let agent = Agent::computer(invoker);
        let result = agent.terminate_task("t-12").await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Failed);
        assert_eq!(result.task_id, "t-12");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_stops_polling() {
        let invoker = MockInvoker::new(vec![submit_ok("t-13"), status("running")]);
        let agent = Agent::browser(invoker.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = agent
            .execute_task_and_wait_cancellable("task", 10, &cancel)
            .await;
        assert!(!result.success);
        assert_eq!(result.task_status, TaskStatus::Cancelled);
        assert_eq!(result.error_message, "Polling cancelled by caller.");
        assert_eq!(result.task_id, "t-13");
        assert_eq!(invoker.calls_to("page_use_get_task_status"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_notified_per_non_terminal_poll() {
        let invoker = MockInvoker::new(vec![
            submit_ok("t-14"),
            status("running"),
            status("running"),
            status("completed"),
        ]);
        let observer = Arc::new(RecordingObserver {
            events: Mutex::new(Vec::new()),
        });
        let agent = Agent::browser(invoker).with_observer(observer.clone());
        let result = agent.execute_task_and_wait("task", 5).await;
        assert!(result.success);
        let events = observer.events.lock().unwrap().clone();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ("t-14".to_string(), "step".to_string()));
    }
}
