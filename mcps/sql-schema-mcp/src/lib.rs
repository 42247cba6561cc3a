//! SQL Schema MCP Library
//!
//! Read-only relational database metadata over MCP: tables, views, stored
//! procedures, triggers, SELECT queries, CRUD endpoint generation and a
//! whole-schema resource.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use sql_schema_mcp::{SqlSchemaServer, SqliteProvider};
//!
//! let server = SqlSchemaServer::with_provider(SqliteProvider::in_memory()?);
//! mcp_common::run_session(reader, writer, std::sync::Arc::new(server)).await?;
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod introspect;
pub mod provider;
pub mod resources;
pub mod server;
pub mod tools;
pub mod types;

pub use config::SqlConfig;
pub use error::{ProviderError, ProviderResult};
pub use provider::{CapabilityProvider, SqliteProvider};
pub use server::SqlSchemaServer;
