//! SQL Schema MCP Server
//!
//! Serves database metadata tools over line-delimited JSON-RPC on stdio.

use sql_schema_mcp::SqlSchemaServer;

mcp_common::serve_stdio!(SqlSchemaServer, "sql_schema_mcp", "sql-schema-mcp");
