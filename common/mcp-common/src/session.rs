//! Line-oriented stdio session
//!
//! Reads one line, answers it, flushes, then reads the next. A response for
//! line N is always fully written before line N+1 is read.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::internal_error;
use crate::init::{record_diagnostic, DiagnosticKind};
use crate::jsonrpc::{decode_line, encode_response, DecodeError, Response, UNDECODED_ID};
use crate::router::{route, McpHandler, INTERNAL_ERROR_CONTEXT};

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Non-blank lines read
    pub lines: usize,
    /// Response lines written
    pub responses: usize,
    /// Lines dropped without a response
    pub ignored: usize,
}

/// Serve requests from `reader` until end of input
///
/// Blank lines and lines that are not JSON objects are skipped. Every other
/// line gets exactly one response line. Only transport failures end the
/// session early; they are returned to the caller.
pub async fn run_session<R, W, H>(reader: R, mut writer: W, handler: Arc<H>) -> std::io::Result<SessionSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    H: McpHandler,
{
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();
    let mut summary = SessionSummary::default();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&buffer);
        let line = text.trim();
        if line.is_empty() {
            continue;
        }
        summary.lines += 1;

        let response = match decode_line(line) {
            Ok(request) => route(Arc::clone(&handler), request).await,
            Err(DecodeError::Ignorable(reason)) => {
                tracing::warn!(reason = %reason, "Ignoring line");
                summary.ignored += 1;
                continue;
            }
            Err(err @ DecodeError::Malformed(_)) => {
                tracing::warn!(error = %err, "Rejecting request");
                undecoded_error(&err)
            }
        };

        write_response(&mut writer, &response).await?;
        summary.responses += 1;
    }

    tracing::info!(
        lines = summary.lines,
        responses = summary.responses,
        ignored = summary.ignored,
        "Input closed"
    );
    Ok(summary)
}

/// Serve on the process's stdin/stdout
///
/// A transport failure is recorded to the diagnostic log for `server_name`
/// and returned; the caller is expected to exit.
pub async fn serve_stdio<H: McpHandler>(handler: H, server_name: &str) -> anyhow::Result<SessionSummary> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    match run_session(stdin, stdout, Arc::new(handler)).await {
        Ok(summary) => Ok(summary),
        Err(err) => {
            tracing::error!(error = %err, "Session transport failed");
            record_diagnostic(server_name, DiagnosticKind::Session, &err);
            Err(err.into())
        }
    }
}

fn undecoded_error(err: &DecodeError) -> Response {
    Response::error(
        Value::from(UNDECODED_ID),
        internal_error(format!("{}: {}", INTERNAL_ERROR_CONTEXT, err)),
    )
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> std::io::Result<()> {
    let line = match encode_response(response) {
        Ok(line) => line,
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode response");
            let fallback = Response::error(
                Value::from(UNDECODED_ID),
                internal_error(format!("{}: {}", INTERNAL_ERROR_CONTEXT, err)),
            );
            encode_response(&fallback).map_err(std::io::Error::other)?
        }
    };

    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
