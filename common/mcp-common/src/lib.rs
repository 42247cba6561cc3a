//! MCP Common - Shared protocol core for MCP servers
//!
//! This crate provides the pieces every stdio MCP server in the workspace
//! shares:
//!
//! - **JSON-RPC**: request decoding and response encoding, one message per line
//! - **Routing**: the closed [`Method`] set and the [`McpHandler`] trait
//! - **Session**: the read-answer-flush loop over stdin/stdout
//! - **Initialization**: tracing setup, diagnostic log and `serve_stdio!`
//! - **Results / Errors**: helpers for tool results and coded MCP errors
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{serve_stdio, text_success};
//!
//! // In main.rs
//! serve_stdio!(MyServer, "my_mcp", "my-mcp");
//!
//! // In a tool implementation
//! async fn call_tool(&self, name: &str, arguments: Option<&Value>) -> McpResult<CallToolResult> {
//!     Ok(text_success("done"))
//! }
//! ```

pub mod error;
pub mod init;
pub mod jsonrpc;
pub mod model;
pub mod result;
pub mod router;
pub mod session;

// Re-export commonly used items at crate root
pub use error::{
    internal_error, method_not_found, with_context, IntoMcpError, McpError, McpResult, ResultExt,
};
pub use init::{diagnostic_path, init_tracing, record_diagnostic, DiagnosticKind};
pub use jsonrpc::{decode_line, encode_response, DecodeError, Request, Response};
pub use model::{
    implementation, initialize_result, required_arguments, resource, text_resource,
    tools_and_resources, PROTOCOL_VERSION,
};
pub use result::text_success;
pub use router::{route, McpHandler, Method};
pub use session::{run_session, serve_stdio, SessionSummary};

// Re-export rmcp model types that handlers build and return
pub use rmcp::model::{
    CallToolResult, Content, Implementation, JsonObject, ReadResourceResult, Resource,
    ServerCapabilities, Tool,
};

// Re-export async_trait for implementing McpHandler
pub use async_trait::async_trait;
