//! SQL schema MCP server implementation

use std::time::Instant;

use mcp_common::{
    async_trait, implementation, text_success, CallToolResult, Implementation, McpHandler, McpResult,
    ReadResourceResult, Resource, Tool,
};
use serde_json::Value;

use crate::config::SqlConfig;
use crate::provider::{CapabilityProvider, SqliteProvider};
use crate::resources::{self, RESOURCES};
use crate::tools::{ToolCall, TOOLS};

pub const SERVER_NAME: &str = "sql-schema-mcp";

/// SQL schema MCP server
///
/// Exposes database metadata from a [`CapabilityProvider`] as tools and the
/// `database://schema` resource.
pub struct SqlSchemaServer<P: CapabilityProvider = SqliteProvider> {
    provider: P,
}

impl SqlSchemaServer {
    /// Create a server over the configured SQLite database
    ///
    /// A database that cannot be opened is replaced by an empty in-memory one
    /// so the protocol stays available.
    pub fn new() -> anyhow::Result<Self> {
        let config = SqlConfig::resolve();

        let provider = match SqliteProvider::open(&config.database) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::error!("{:#}. Falling back to an in-memory database.", e);
                SqliteProvider::in_memory()?
            }
        };

        Ok(Self::with_provider(provider))
    }
}

impl<P: CapabilityProvider> SqlSchemaServer<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: CapabilityProvider> McpHandler for SqlSchemaServer<P> {
    fn server_info(&self) -> Implementation {
        implementation(SERVER_NAME, env!("CARGO_PKG_VERSION"))
    }

    fn tools(&self) -> &[Tool] {
        &TOOLS
    }

    fn resources(&self) -> &[Resource] {
        &RESOURCES
    }

    async fn call_tool(&self, name: &str, arguments: Option<&Value>) -> McpResult<CallToolResult> {
        let call = ToolCall::parse(name, arguments)?;
        let started = Instant::now();

        let outcome = call.run(&self.provider).await;
        tracing::debug!(
            tool = name,
            ok = outcome.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool finished"
        );

        Ok(text_success(outcome?))
    }

    async fn read_resource(&self, uri: &str) -> McpResult<ReadResourceResult> {
        resources::read(&self.provider, uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderResult};
    use mcp_common::router::dispatch;
    use mcp_common::Request;
    use serde_json::json;

    /// Provider with canned answers
    struct FakeProvider;

    #[async_trait]
    impl CapabilityProvider for FakeProvider {
        async fn list_tables(&self) -> ProviderResult<String> {
            Ok("[]".into())
        }
        async fn describe_table(&self, table_name: &str) -> ProviderResult<String> {
            Ok(format!("table:{table_name}"))
        }
        async fn execute_query(&self, _query: &str) -> ProviderResult<String> {
            Err(ProviderError::ReadOnlyViolation)
        }
        async fn list_stored_procedures(&self) -> ProviderResult<String> {
            Ok("[]".into())
        }
        async fn describe_stored_procedure(&self, name: &str) -> ProviderResult<String> {
            Err(ProviderError::not_found("stored procedure", name))
        }
        async fn list_views(&self) -> ProviderResult<String> {
            Ok("[]".into())
        }
        async fn describe_view(&self, name: &str) -> ProviderResult<String> {
            Ok(format!("view:{name}"))
        }
        async fn list_triggers(&self) -> ProviderResult<String> {
            Ok("[]".into())
        }
        async fn describe_trigger(&self, name: &str) -> ProviderResult<String> {
            Ok(format!("trigger:{name}"))
        }
        async fn generate_crud_endpoints(&self, table: &str, framework: &str) -> ProviderResult<String> {
            Ok(format!("{framework}:{table}"))
        }
        async fn get_complete_schema(&self) -> ProviderResult<String> {
            Ok("{\"tables\":[]}".into())
        }
    }

    async fn call(server: &SqlSchemaServer<FakeProvider>, request: Value) -> Value {
        let request: Request = serde_json::from_value(request).unwrap();
        serde_json::to_value(dispatch(server, request).await).unwrap()
    }

    fn server() -> SqlSchemaServer<FakeProvider> {
        SqlSchemaServer::with_provider(FakeProvider)
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let response = call(&server(), json!({"id": 1, "method": "initialize"})).await;
        assert_eq!(response["result"]["serverInfo"]["name"], "sql-schema-mcp");
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert!(response["result"]["capabilities"]["tools"].is_object());
        assert!(response["result"]["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_tool_result_is_single_text_item() {
        let response = call(
            &server(),
            json!({"id": 2, "method": "tools/call", "params": {
                "name": "generate_crud_endpoints",
                "arguments": {"tableName": "users", "framework": "rails"}
            }}),
        )
        .await;
        let content = response["result"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "rails:users");
    }

    #[tokio::test]
    async fn test_provider_fault_is_tool_error() {
        let response = call(
            &server(),
            json!({"id": 3, "method": "tools/call", "params": {
                "name": "execute_query", "arguments": {"query": "DROP TABLE x"}
            }}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32603);
        assert_eq!(
            response["error"]["message"],
            "Tool execution error: only SELECT queries are permitted"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_named() {
        let response = call(
            &server(),
            json!({"id": 4, "method": "tools/call", "params": {"name": "foo"}}),
        )
        .await;
        assert_eq!(response["error"]["message"], "Tool execution error: unknown tool: foo");
    }

    #[tokio::test]
    async fn test_read_schema_resource() {
        let response = call(
            &server(),
            json!({"id": 5, "method": "resources/read", "params": {"uri": "database://schema"}}),
        )
        .await;
        let contents = &response["result"]["contents"][0];
        assert_eq!(contents["uri"], "database://schema");
        assert_eq!(contents["mimeType"], "application/json");
        assert_eq!(contents["text"], "{\"tables\":[]}");
    }

    #[tokio::test]
    async fn test_read_unknown_resource() {
        let response = call(
            &server(),
            json!({"id": 6, "method": "resources/read", "params": {"uri": "database://other"}}),
        )
        .await;
        assert_eq!(
            response["error"]["message"],
            "Resource read error: unknown resource: database://other"
        );
    }

    #[tokio::test]
    async fn test_resources_list() {
        let response = call(&server(), json!({"id": 7, "method": "resources/list"})).await;
        assert_eq!(
            response["result"]["resources"],
            json!([{
                "uri": "database://schema",
                "name": "Database Schema",
                "description": "Complete database schema information",
                "mimeType": "application/json"
            }])
        );
    }
}
