//! Method routing for decoded requests
//!
//! [`route`] turns every decoded [`Request`] into exactly one [`Response`].
//! The method set is closed: [`Method`] enumerates it and [`dispatch`]
//! matches on it exhaustively. Servers plug in through [`McpHandler`].

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{
    CallToolResult, Implementation, ListResourcesResult, ListToolsResult, ReadResourceResult,
    Resource, ServerCapabilities, Tool,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{internal_error, method_not_found, with_context, McpResult, ResultExt};
use crate::jsonrpc::{Request, Response};
use crate::model::{initialize_result, tools_and_resources};

/// Prefix for every `tools/call` failure
pub const TOOL_ERROR_CONTEXT: &str = "Tool execution error";

/// Prefix for every `resources/read` failure
pub const RESOURCE_ERROR_CONTEXT: &str = "Resource read error";

/// Prefix for faults caught at the router boundary
pub const INTERNAL_ERROR_CONTEXT: &str = "Internal error";

/// The methods a server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Initialize,
    ListTools,
    CallTool,
    ListResources,
    ReadResource,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Initialize,
        Method::ListTools,
        Method::CallTool,
        Method::ListResources,
        Method::ReadResource,
    ];

    /// Wire name of the method
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::ListTools => "tools/list",
            Method::CallTool => "tools/call",
            Method::ListResources => "resources/list",
            Method::ReadResource => "resources/read",
        }
    }

    /// Exact, case-sensitive lookup by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server plugged into the router
///
/// Catalog methods are synchronous and infallible: tools and resources are
/// fixed when the server is built. The two lookups are async because they
/// reach the backing capability.
///
/// # Thread Safety
///
/// Handlers run on a spawned task per request, so implementations must be
/// `Send + Sync + 'static`.
#[async_trait]
pub trait McpHandler: Send + Sync + 'static {
    /// Name and version reported by `initialize`
    fn server_info(&self) -> Implementation;

    /// Capabilities reported by `initialize`
    fn capabilities(&self) -> ServerCapabilities {
        tools_and_resources()
    }

    /// The tool catalog
    fn tools(&self) -> &[Tool];

    /// The resource catalog
    fn resources(&self) -> &[Resource];

    /// Run a tool. `arguments` is the raw `params.arguments` value, if any.
    async fn call_tool(&self, name: &str, arguments: Option<&Value>) -> McpResult<CallToolResult>;

    /// Read a resource by uri
    async fn read_resource(&self, uri: &str) -> McpResult<ReadResourceResult>;
}

/// Route a request, converting any handler panic into an internal error
///
/// The handler runs on its own task so that a panic surfaces as a
/// [`tokio::task::JoinError`] instead of unwinding through the session. The
/// task is awaited before returning, so requests still complete in order.
pub async fn route<H: McpHandler>(handler: Arc<H>, request: Request) -> Response {
    let id = request.response_id();
    let method = request.method.clone();

    match tokio::spawn(async move { dispatch(handler.as_ref(), request).await }).await {
        Ok(response) => response,
        Err(join_error) => {
            let reason = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                join_error.to_string()
            };
            tracing::error!(method = %method, reason = %reason, "Handler failed");
            Response::error(
                id,
                internal_error(format!("{}: {}", INTERNAL_ERROR_CONTEXT, reason)),
            )
        }
    }
}

/// Dispatch a request on the current task
pub async fn dispatch<H: McpHandler + ?Sized>(handler: &H, request: Request) -> Response {
    let id = request.response_id();

    let Some(method) = Method::from_name(&request.method) else {
        tracing::debug!(method = %request.method, "Unknown method");
        return Response::error(id, method_not_found(&request.method));
    };

    tracing::debug!(method = %method, id = %id, "Dispatching request");

    let outcome = match method {
        Method::Initialize => to_result(&initialize_result(
            handler.capabilities(),
            handler.server_info(),
        )),
        Method::ListTools => to_result(&ListToolsResult::with_all_items(handler.tools().to_vec())),
        Method::ListResources => to_result(&ListResourcesResult::with_all_items(
            handler.resources().to_vec(),
        )),
        Method::CallTool => call_tool(handler, request.params.as_ref())
            .await
            .map_err(|e| with_context(TOOL_ERROR_CONTEXT, e)),
        Method::ReadResource => read_resource(handler, request.params.as_ref())
            .await
            .map_err(|e| with_context(RESOURCE_ERROR_CONTEXT, e)),
    };

    match outcome {
        Ok(result) => Response::success(id, result),
        Err(err) => Response::error(id, err),
    }
}

async fn call_tool<H: McpHandler + ?Sized>(handler: &H, params: Option<&Value>) -> McpResult<Value> {
    let params = params
        .filter(|p| !p.is_null())
        .ok_or_else(|| internal_error("params is required for tool calls"))?;

    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| internal_error("tool name is required"))?;

    let arguments = params.get("arguments").filter(|a| !a.is_null());

    let result = handler.call_tool(name, arguments).await?;
    to_result(&result)
}

async fn read_resource<H: McpHandler + ?Sized>(
    handler: &H,
    params: Option<&Value>,
) -> McpResult<Value> {
    let params = params
        .filter(|p| !p.is_null())
        .ok_or_else(|| internal_error("params is required for resource reads"))?;

    let uri = params
        .get("uri")
        .and_then(Value::as_str)
        .ok_or_else(|| internal_error("resource uri is required"))?;

    let result = handler.read_resource(uri).await?;
    to_result(&result)
}

fn to_result<T: Serialize>(result: &T) -> McpResult<Value> {
    serde_json::to_value(result).to_mcp_err()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
