//! # sandbox-tasks
//!
//! Client for driving long-running automation tasks inside remote cloud
//! sandboxes: submit a human-language task, poll it to a terminal state,
//! terminate it early if needed.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │                 Agent                   │
//!   │  (browser / computer / mobile variant)  │
//!   │   submit ──▶ poll ──▶ resolve/terminate │
//!   └───────────────────┬─────────────────────┘
//!                       │ ToolInvoker
//!                       ▼
//!            ┌──────────────────────┐
//!            │  control plane or    │
//!            │  local sandbox proxy │
//!            └──────────────────────┘
//! ```
//!
//! The three agent variants share one lifecycle state machine and differ
//! only in tool naming and submission-retry policy. All remote calls go
//! through the [`ToolInvoker`] seam; [`HttpToolInvoker`] is the bundled
//! JSON-RPC implementation, and tests substitute their own.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sandbox_tasks::{Agent, ClientConfig, HttpToolInvoker};
//!
//! # async fn run() -> Result<(), sandbox_tasks::ConfigError> {
//! let config = ClientConfig::from_env()?;
//! let invoker = Arc::new(HttpToolInvoker::new(config.clone()));
//! let agent = Agent::browser(invoker).with_poll_interval(config.poll_interval);
//!
//! let result = agent.execute_task_and_wait("Open Chrome browser", 100).await;
//! if result.success {
//!     println!("{}", result.task_result);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - `agent`: the task lifecycle core and its result types
//! - `invoker`: the tool-invocation seam and the HTTP implementation
//! - `config`: client configuration with environment loading

pub mod agent;
pub mod config;
pub mod invoker;

pub use agent::{
    Agent, AgentVariant, ExecutionResult, QueryResult, TaskObserver, TaskStatus, TracingObserver,
};
pub use config::{ClientConfig, ConfigError};
pub use invoker::{HttpToolInvoker, InvokeError, InvokeResult, ToolInvoker};
