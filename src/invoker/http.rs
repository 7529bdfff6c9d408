//! JSON-RPC tool invoker over HTTP.
//!
//! Speaks JSON-RPC 2.0 `tools/call` against either the control plane
//! directly (with a bearer key) or a local proxy endpoint that routes the
//! tool name to whichever backend server owns it.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{InvokeError, InvokeResult, ToolInvoker};
use crate::config::ClientConfig;

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// The tool-call envelope inside a JSON-RPC result. Field names come from
/// the control plane and are tolerated in both spellings.
#[derive(Debug, Deserialize)]
struct ToolCallEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: String,
    #[serde(default, rename = "errorMessage", alias = "error_message")]
    error_message: String,
    #[serde(default, rename = "requestId", alias = "request_id")]
    request_id: String,
}

/// [`ToolInvoker`] backed by an HTTP JSON-RPC endpoint.
pub struct HttpToolInvoker {
    config: ClientConfig,
    client: reqwest::Client,
    request_id: AtomicU64,
}

impl HttpToolInvoker {
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_default();

        Self {
            config,
            client,
            request_id: AtomicU64::new(1),
        }
    }

    /// Get the next request ID for JSON-RPC
    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolInvoker for HttpToolInvoker {
    async fn invoke(&self, tool: &str, args: Value) -> Result<InvokeResult, InvokeError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_request_id(),
            method: "tools/call",
            params: serde_json::json!({
                "name": tool,
                "arguments": args,
            }),
        };

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvokeError::HttpStatus(status.as_u16()));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| InvokeError::Malformed(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(InvokeError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = body
            .result
            .ok_or_else(|| InvokeError::Malformed("no result in response".to_string()))?;

        // Application-level rejections stay inside the envelope so the
        // lifecycle core sees them as a distinct failure tier.
        let envelope: ToolCallEnvelope =
            serde_json::from_value(result).map_err(|e| InvokeError::Malformed(e.to_string()))?;

        debug!(
            tool,
            request_id = %envelope.request_id,
            success = envelope.success,
            "tool call returned"
        );

        Ok(InvokeResult {
            success: envelope.success,
            data: envelope.data,
            error_message: envelope.error_message,
            request_id: envelope.request_id,
        })
    }
}
