//! Capability provider
//!
//! The [`CapabilityProvider`] trait is the seam between the protocol layer
//! and a concrete database. Every operation yields the text payload of a
//! tool result or a [`ProviderError`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::codegen::{self, Framework};
use crate::config::DatabaseConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::introspect;

/// Database metadata operations exposed as tools
#[async_trait]
pub trait CapabilityProvider: Send + Sync + 'static {
    async fn list_tables(&self) -> ProviderResult<String>;

    async fn describe_table(&self, table_name: &str) -> ProviderResult<String>;

    /// Run a read-only query; anything other than a SELECT is rejected
    async fn execute_query(&self, query: &str) -> ProviderResult<String>;

    async fn list_stored_procedures(&self) -> ProviderResult<String>;

    async fn describe_stored_procedure(&self, procedure_name: &str) -> ProviderResult<String>;

    async fn list_views(&self) -> ProviderResult<String>;

    async fn describe_view(&self, view_name: &str) -> ProviderResult<String>;

    async fn list_triggers(&self) -> ProviderResult<String>;

    async fn describe_trigger(&self, trigger_name: &str) -> ProviderResult<String>;

    /// Source code for CRUD endpoints over `table_name`
    async fn generate_crud_endpoints(&self, table_name: &str, framework: &str) -> ProviderResult<String>;

    /// Tables, procedures, views and triggers in one document
    async fn get_complete_schema(&self) -> ProviderResult<String>;
}

/// SQLite-backed provider
#[derive(Clone)]
pub struct SqliteProvider {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProvider {
    /// Open the configured database file
    pub fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        };

        let conn = Connection::open_with_flags(&config.path, flags)
            .with_context(|| format!("Failed to open database at {:?}", config.path))?;
        conn.busy_timeout(Duration::from_secs(config.timeout_secs))
            .context("Failed to set busy timeout")?;

        tracing::info!(path = ?config.path, read_only = config.read_only, "Opened database");
        Ok(Self::from_connection(conn))
    }

    /// Empty in-memory database
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` under the connection lock and render its value as JSON
    async fn with_conn<T, F>(&self, f: F) -> ProviderResult<String>
    where
        T: Serialize,
        F: FnOnce(&Connection) -> ProviderResult<T>,
    {
        let conn = self.conn.lock().await;
        let value = f(&conn)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[async_trait]
impl CapabilityProvider for SqliteProvider {
    async fn list_tables(&self) -> ProviderResult<String> {
        self.with_conn(introspect::list_tables).await
    }

    async fn describe_table(&self, table_name: &str) -> ProviderResult<String> {
        self.with_conn(|conn| introspect::describe_table(conn, table_name)).await
    }

    async fn execute_query(&self, query: &str) -> ProviderResult<String> {
        self.with_conn(|conn| introspect::execute_query(conn, query)).await
    }

    async fn list_stored_procedures(&self) -> ProviderResult<String> {
        self.with_conn(introspect::list_stored_procedures).await
    }

    async fn describe_stored_procedure(&self, procedure_name: &str) -> ProviderResult<String> {
        Err(ProviderError::not_found("stored procedure", procedure_name))
    }

    async fn list_views(&self) -> ProviderResult<String> {
        self.with_conn(introspect::list_views).await
    }

    async fn describe_view(&self, view_name: &str) -> ProviderResult<String> {
        self.with_conn(|conn| introspect::describe_view(conn, view_name)).await
    }

    async fn list_triggers(&self) -> ProviderResult<String> {
        self.with_conn(introspect::list_triggers).await
    }

    async fn describe_trigger(&self, trigger_name: &str) -> ProviderResult<String> {
        self.with_conn(|conn| introspect::describe_trigger(conn, trigger_name)).await
    }

    async fn generate_crud_endpoints(&self, table_name: &str, framework: &str) -> ProviderResult<String> {
        let table = {
            let conn = self.conn.lock().await;
            introspect::describe_table(&conn, table_name)?
        };
        let framework: Framework = framework.parse()?;
        Ok(codegen::generate(&table, framework))
    }

    async fn get_complete_schema(&self) -> ProviderResult<String> {
        self.with_conn(introspect::complete_schema).await
    }
}
