//! Error handling utilities for MCP servers
//!
//! Every failure that reaches the wire is an [`McpError`] carrying one of the
//! JSON-RPC codes below. Handlers build them with the helpers in this module
//! and never let a fault escape as a panic or a transport error.

use rmcp::model::ErrorCode;
pub use rmcp::ErrorData as McpError;

/// Type alias for results produced by protocol handlers
pub type McpResult<T> = Result<T, McpError>;

/// Code for an unrecognized top-level method (-32601)
pub const METHOD_NOT_FOUND: ErrorCode = ErrorCode::METHOD_NOT_FOUND;

/// Code for every other failure after a request was decoded (-32603)
pub const INTERNAL_ERROR: ErrorCode = ErrorCode::INTERNAL_ERROR;

/// Trait for converting errors into MCP-compatible errors
///
/// Implement this trait for external error types to enable the `?` operator
/// in handler implementations.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::{IntoMcpError, McpError};
///
/// impl IntoMcpError for ProviderError {
///     fn into_mcp_error(self) -> McpError {
///         mcp_common::internal_error(self.to_string())
///     }
/// }
/// ```
pub trait IntoMcpError {
    /// Convert this error into an MCP error
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for std::io::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(format!("IO error: {}", self))
    }
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(format!("JSON error: {}", self))
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(self.to_string())
    }
}

impl IntoMcpError for String {
    fn into_mcp_error(self) -> McpError {
        internal_error(self)
    }
}

impl IntoMcpError for &str {
    fn into_mcp_error(self) -> McpError {
        internal_error(self.to_string())
    }
}

/// Extension trait for Result types to convert to MCP errors
///
/// ```rust,ignore
/// use mcp_common::ResultExt;
///
/// let payload = serde_json::to_value(&info).to_mcp_err()?;
/// ```
pub trait ResultExt<T> {
    /// Convert the error to an MCP error
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}

/// Create an internal error (-32603) with a message
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::new(INTERNAL_ERROR, message.into(), None)
}

/// Create a "method not found" error (-32601) naming the offending method
pub fn method_not_found(method: &str) -> McpError {
    McpError::new(METHOD_NOT_FOUND, format!("Method not found: {}", method), None)
}

/// Re-wrap an error as an internal error whose message starts with `context`
///
/// Keeps the auxiliary data of the original error. Used at handler
/// boundaries so the caller can tell which stage failed.
pub fn with_context(context: &str, err: McpError) -> McpError {
    McpError::new(
        INTERNAL_ERROR,
        format!("{}: {}", context, err.message),
        err.data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_mcp_error_string() {
        let err = "test error".into_mcp_error();
        assert!(err.message.contains("test error"));
        assert_eq!(err.code, INTERNAL_ERROR);
    }

    #[test]
    fn test_result_ext() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"));
        let err = result.to_mcp_err().unwrap_err();
        assert!(err.message.starts_with("IO error"));
    }

    #[test]
    fn test_method_not_found_names_method() {
        let err = method_not_found("prompts/list");
        assert_eq!(err.code.0, -32601);
        assert_eq!(err.message, "Method not found: prompts/list");
    }

    #[test]
    fn test_with_context_keeps_data() {
        let inner = McpError::new(
            METHOD_NOT_FOUND,
            "boom",
            Some(serde_json::json!({"hint": 1})),
        );
        let err = with_context("Tool execution error", inner);
        assert_eq!(err.code.0, -32603);
        assert_eq!(err.message, "Tool execution error: boom");
        assert_eq!(err.data, Some(serde_json::json!({"hint": 1})));
    }

    #[test]
    fn test_error_serializes_without_data() {
        let value = serde_json::to_value(internal_error("x")).unwrap();
        assert_eq!(value, serde_json::json!({"code": -32603, "message": "x"}));
    }
}
