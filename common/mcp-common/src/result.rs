//! Result helpers for MCP tool responses
//!
//! Tool results travel as a `content` list; every tool in this workspace
//! answers with a single text item.

use rmcp::model::{CallToolResult, Content};

/// Create a successful plain text response
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_success_is_not_error() {
        let result = text_success("ok");
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_text_success_wire_shape() {
        let value = serde_json::to_value(text_success("hello world")).unwrap();
        assert_eq!(value["content"].as_array().unwrap().len(), 1);
        assert_eq!(value["content"][0]["type"], json!("text"));
        assert_eq!(value["content"][0]["text"], json!("hello world"));
    }
}
