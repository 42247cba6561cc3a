//! Server initialization utilities
//!
//! Provides standardized tracing setup, the best-effort diagnostic log and
//! the `serve_stdio!` macro for consistent MCP server startup.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for MCP servers
///
/// Sets up logging to stderr (stdout is reserved for MCP protocol) with:
/// - Formatted output without ANSI colors (for clean logs)
/// - Environment-based filtering via RUST_LOG
/// - Default log level of `info` for the specified crate and for this one
///
/// Set `LOG_FORMAT=json` for structured JSON output (useful for production/log aggregation).
/// Default is human-readable text output.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("my_mcp");
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("{}=info", crate_name).parse()?)
        .add_directive("mcp_common=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Which diagnostic log a failure goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The server could not be built
    Startup,
    /// The stdio transport broke mid-session
    Session,
}

/// Path of the diagnostic log for a server
///
/// `<temp>/<server>-startup-error.log` or `<temp>/<server>-error.log`.
pub fn diagnostic_path(server_name: &str, kind: DiagnosticKind) -> PathBuf {
    let file_name = match kind {
        DiagnosticKind::Startup => format!("{}-startup-error.log", server_name),
        DiagnosticKind::Session => format!("{}-error.log", server_name),
    };
    std::env::temp_dir().join(file_name)
}

/// Append a timestamped failure line to the diagnostic log
///
/// Best effort: a log that cannot be written is silently skipped, since the
/// process is already on its way out and stdout must stay clean.
pub fn record_diagnostic(server_name: &str, kind: DiagnosticKind, error: &dyn Display) {
    let path = diagnostic_path(server_name, kind);
    let _ = append_line(&path, &format_diagnostic(kind, error));
}

fn format_diagnostic(kind: DiagnosticKind, error: &dyn Display) -> String {
    let stage = match kind {
        DiagnosticKind::Startup => "Startup error",
        DiagnosticKind::Session => "Session error",
    };
    format!("{}: {}: {}", chrono::Local::now().to_rfc3339(), stage, error)
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}", line)
}

/// Macro for standardized MCP server initialization
///
/// Expands to a complete `#[tokio::main] async fn main()` that:
/// 1. Initializes tracing to stderr
/// 2. Creates the server with `::new()`, which returns `anyhow::Result<Self>`
/// 3. Serves line-delimited JSON-RPC on stdin/stdout until input closes
///
/// Startup failures are recorded to the startup diagnostic log before the
/// process exits with an error.
///
/// # Example
///
/// ```rust,ignore
/// mod server;
/// use server::MyMcpServer;
///
/// mcp_common::serve_stdio!(MyMcpServer, "my_mcp", "my-mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr, $server_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = match <$server_type>::new() {
                Ok(server) => server,
                Err(err) => {
                    tracing::error!(error = %err, "Failed to start server");
                    $crate::record_diagnostic(
                        $server_name,
                        $crate::DiagnosticKind::Startup,
                        &format!("{:#}", err),
                    );
                    return Err(err);
                }
            };

            tracing::info!("Server running, waiting for requests...");

            $crate::serve_stdio(server, $server_name).await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tracing initialization is global and can only run once per process,
    // so only the diagnostic sink is covered here.

    #[test]
    fn test_diagnostic_paths() {
        let startup = diagnostic_path("demo-mcp", DiagnosticKind::Startup);
        let session = diagnostic_path("demo-mcp", DiagnosticKind::Session);
        assert!(startup.ends_with("demo-mcp-startup-error.log"));
        assert!(session.ends_with("demo-mcp-error.log"));
        assert!(startup.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_format_diagnostic() {
        let line = format_diagnostic(DiagnosticKind::Session, &"broken pipe");
        assert!(line.ends_with("Session error: broken pipe"));
    }

    #[test]
    fn test_append_line_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diag.log");
        append_line(&path, "first").unwrap();
        append_line(&path, "second").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
