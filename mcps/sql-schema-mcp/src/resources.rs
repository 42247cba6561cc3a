//! Resource catalog

use std::sync::LazyLock;

use mcp_common::{internal_error, resource, text_resource, McpResult, ReadResourceResult, Resource};

use crate::provider::CapabilityProvider;

pub const SCHEMA_URI: &str = "database://schema";

const JSON_MIME: &str = "application/json";

pub static RESOURCES: LazyLock<Vec<Resource>> = LazyLock::new(|| {
    vec![resource(
        SCHEMA_URI,
        "Database Schema",
        "Complete database schema information",
        JSON_MIME,
    )]
});

/// Read a resource from the provider
pub async fn read<P: CapabilityProvider + ?Sized>(provider: &P, uri: &str) -> McpResult<ReadResourceResult> {
    match uri {
        SCHEMA_URI => {
            let schema = provider.get_complete_schema().await?;
            Ok(text_resource(SCHEMA_URI, JSON_MIME, schema))
        }
        _ => Err(internal_error(format!("unknown resource: {}", uri))),
    }
}
