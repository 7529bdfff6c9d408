//! Transport seam: invoke a named remote tool and get back a generic
//! envelope.
//!
//! Every lifecycle operation reduces to one RPC shape: call a tool by name
//! with a JSON argument map, receive `{success, data, errorMessage,
//! requestId}`. The transport behind the seam may be a directly
//! authenticated control-plane call or a local HTTP proxy inside a
//! network-isolated sandbox; the lifecycle core does not care which.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpToolInvoker;

/// Normalized outcome of an invocation that reached the remote side.
///
/// `success == false` means the remote system rejected the action
/// (application error). Failures of the invocation itself surface as
/// [`InvokeError`] instead, so callers can distinguish the two tiers.
#[derive(Debug, Clone, Default)]
pub struct InvokeResult {
    pub success: bool,
    /// Opaque payload; callers parse it as JSON-object-shaped content.
    pub data: String,
    pub error_message: String,
    /// Per-RPC trace id, not per-task.
    pub request_id: String,
}

/// Failure of the invocation itself, before any application-level verdict.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Capability to invoke a named remote tool.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, tool: &str, args: Value) -> Result<InvokeResult, InvokeError>;
}
