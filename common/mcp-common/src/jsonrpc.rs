//! JSON-RPC 2.0 framing for line-oriented MCP sessions
//!
//! One request per line in, one response per line out. This module owns the
//! request decoder, the response type and the response encoder; routing
//! lives in [`crate::router`] and the read/write loop in [`crate::session`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::McpError;

/// Protocol version tag carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Id used when a request carries no id, or a null one
pub const DEFAULT_ID: i64 = 1;

/// Id used for errors raised before a request could be decoded
pub const UNDECODED_ID: i64 = 0;

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// A decoded JSON-RPC request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    #[serde(default = "default_version")]
    pub jsonrpc: String,

    /// Correlation id. `null` deserializes to `None`.
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// The id a response to this request must carry
    pub fn response_id(&self) -> Value {
        response_id(self.id.as_ref())
    }
}

/// Resolve the outgoing id for an incoming one
///
/// Present, non-null ids are echoed verbatim; anything else becomes
/// [`DEFAULT_ID`].
pub fn response_id(id: Option<&Value>) -> Value {
    match id {
        Some(id) if !id.is_null() => id.clone(),
        _ => Value::from(DEFAULT_ID),
    }
}

/// Why a line could not be turned into a [`Request`]
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Noise on the channel; the line is dropped without an answer
    #[error("ignored line: {0}")]
    Ignorable(String),

    /// A JSON object that does not have the request shape
    #[error("malformed request: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl DecodeError {
    /// Whether the session should stay silent about this line
    pub fn is_ignorable(&self) -> bool {
        matches!(self, DecodeError::Ignorable(_))
    }
}

/// Decode one line of input
///
/// Lines that are not JSON, or JSON that is not an object (scalars, `null`,
/// batches), are [`DecodeError::Ignorable`]. Objects with ill-typed fields
/// are [`DecodeError::Malformed`] and get an answer addressed to
/// [`UNDECODED_ID`].
pub fn decode_line(line: &str) -> Result<Request, DecodeError> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| DecodeError::Ignorable(format!("invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(DecodeError::Ignorable(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(DecodeError::Malformed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Either half of a response; never both, never neither
#[derive(Debug, Clone, Serialize)]
pub enum Payload {
    #[serde(rename = "result")]
    Result(Value),
    #[serde(rename = "error")]
    Error(McpError),
}

/// A JSON-RPC response
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Response {
    /// Successful response with an opaque result
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: Payload::Result(result),
        }
    }

    /// Error response
    pub fn error(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: Payload::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, Payload::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Result(value) => Some(value),
            Payload::Error(_) => None,
        }
    }

    pub fn error_data(&self) -> Option<&McpError> {
        match &self.payload {
            Payload::Result(_) => None,
            Payload::Error(err) => Some(err),
        }
    }
}

/// Encode a response as a single line (no trailing newline)
pub fn encode_response(response: &Response) -> Result<String, serde_json::Error> {
    serde_json::to_string(response)
}
