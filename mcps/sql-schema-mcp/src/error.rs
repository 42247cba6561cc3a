//! Capability provider errors

use mcp_common::{internal_error, IntoMcpError, McpError};

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure of a capability provider operation
///
/// Every variant surfaces to the client as an internal error whose message
/// is this error's `Display` output.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The named table, view, procedure or trigger does not exist
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// The query would modify the database
    #[error("only SELECT queries are permitted")]
    ReadOnlyViolation,

    /// No code generator exists for the requested framework
    #[error("framework '{0}' is not supported (expected aspnet, fastapi or express)")]
    UnsupportedFramework(String),

    /// A tool argument has the wrong type
    #[error("argument '{0}' must be a string")]
    InvalidArgument(&'static str),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        ProviderError::NotFound {
            kind,
            name: name.into(),
        }
    }
}

impl IntoMcpError for ProviderError {
    fn into_mcp_error(self) -> McpError {
        internal_error(self.to_string())
    }
}

impl From<ProviderError> for McpError {
    fn from(err: ProviderError) -> Self {
        err.into_mcp_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ProviderError::not_found("table", "users").to_string(),
            "table 'users' not found"
        );
        assert_eq!(
            ProviderError::ReadOnlyViolation.to_string(),
            "only SELECT queries are permitted"
        );
        assert!(ProviderError::UnsupportedFramework("rails".into())
            .to_string()
            .contains("'rails'"));
    }

    #[test]
    fn test_into_mcp_error_is_internal() {
        let err: McpError = ProviderError::InvalidArgument("query").into();
        assert_eq!(err.code.0, -32603);
        assert_eq!(err.message, "argument 'query' must be a string");
    }
}
