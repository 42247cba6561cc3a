//! Builders for the rmcp model payloads served by [`crate::router`]
//!
//! Catalog entries and results are plain `rmcp::model` types; only the
//! JSON-RPC envelope in [`crate::jsonrpc`] is local.

use rmcp::model::{
    AnnotateAble, Implementation, InitializeResult, JsonObject, ProtocolVersion, RawResource,
    ReadResourceResult, Resource, ResourceContents, ServerCapabilities, Tool,
};
use serde_json::Value;

/// MCP protocol revision announced by `initialize`
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::V_2024_11_05;

/// Name and version reported to the client
pub fn implementation(name: impl Into<String>, version: impl Into<String>) -> Implementation {
    Implementation {
        name: name.into(),
        title: None,
        version: version.into(),
        icons: None,
        website_url: None,
    }
}

/// Capabilities of a server exposing both tools and resources
pub fn tools_and_resources() -> ServerCapabilities {
    ServerCapabilities::builder()
        .enable_tools()
        .enable_resources()
        .build()
}

/// Result of `initialize`
pub fn initialize_result(capabilities: ServerCapabilities, server_info: Implementation) -> InitializeResult {
    InitializeResult {
        protocol_version: PROTOCOL_VERSION,
        capabilities,
        server_info,
        instructions: None,
    }
}

/// A catalog resource with description and mime type
pub fn resource(uri: &str, name: &str, description: &str, mime_type: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some(mime_type.to_string());
    raw.no_annotation()
}

/// A single text document
pub fn text_resource(uri: impl Into<String>, mime_type: impl Into<String>, text: impl Into<String>) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.into(),
            mime_type: Some(mime_type.into()),
            text: text.into(),
            meta: None,
        }],
    }
}

/// Names listed in a tool schema's `required` array
pub fn required_arguments(tool: &Tool) -> Vec<&str> {
    schema_required(&tool.input_schema)
}

fn schema_required(schema: &JsonObject) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|required| required.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_initialize_result_shape() {
        let result = initialize_result(tools_and_resources(), implementation("demo", "1.0.0"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}, "resources": {}},
                "serverInfo": {"name": "demo", "version": "1.0.0"}
            })
        );
    }

    #[test]
    fn test_required_arguments() {
        let tool = Tool::new(
            "t",
            "d",
            object(json!({"type": "object", "properties": {}, "required": ["a", "b"]})),
        );
        assert_eq!(required_arguments(&tool), vec!["a", "b"]);

        let bare = Tool::new("t", "d", object(json!({"type": "object"})));
        assert!(required_arguments(&bare).is_empty());
    }

    #[test]
    fn test_resource_wire_shape() {
        let value = serde_json::to_value(resource("db://x", "X", "An x", "application/json")).unwrap();
        assert_eq!(
            value,
            json!({"uri": "db://x", "name": "X", "description": "An x", "mimeType": "application/json"})
        );
    }

    #[test]
    fn test_text_resource_uses_mime_type_key() {
        let value = serde_json::to_value(text_resource("db://x", "application/json", "{}")).unwrap();
        assert_eq!(value["contents"][0]["mimeType"], json!("application/json"));
        assert_eq!(value["contents"][0]["uri"], json!("db://x"));
        assert_eq!(value["contents"][0]["text"], json!("{}"));
    }
}
