//! Configuration for the SQL schema MCP server

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SQL_SCHEMA_CONFIG_PATH";

/// Environment variable overriding `database.path`
pub const DATABASE_PATH_ENV: &str = "SQL_DATABASE_PATH";

/// SQL schema MCP configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SqlConfig {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Open the file with SQLITE_OPEN_READ_ONLY
    /// Default: true
    #[serde(default = "default_read_only")]
    pub read_only: bool,

    /// Busy timeout in seconds
    /// Default: 30
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_path() -> PathBuf {
    PathBuf::from("database.db")
}

fn default_read_only() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            read_only: default_read_only(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SqlConfig {
    /// Load configuration from file
    ///
    /// Looks for config in:
    /// 1. `SQL_SCHEMA_CONFIG_PATH` environment variable
    /// 2. `~/.binks/sql-schema.toml`
    pub fn load() -> Result<Self> {
        let config_path = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".binks")
                .join("sql-schema.toml"),
        };

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// [`SqlConfig::load`], falling back to defaults, then environment overrides
    pub fn resolve() -> Self {
        let config = Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {:#}. Using default.", e);
            Self::default()
        });
        config.with_env_overrides(std::env::var(DATABASE_PATH_ENV).ok())
    }

    fn with_env_overrides(mut self, database_path: Option<String>) -> Self {
        if let Some(path) = database_path.filter(|p| !p.is_empty()) {
            self.database.path = PathBuf::from(path);
        }
        self
    }

    /// Create a default config pointing to a specific database
    pub fn with_database(path: PathBuf) -> Self {
        Self {
            database: DatabaseConfig {
                path,
                ..DatabaseConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = SqlConfig::default();
        assert_eq!(config.database.path, PathBuf::from("database.db"));
        assert!(config.database.read_only);
        assert_eq!(config.database.timeout_secs, 30);
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            r#"
            [database]
            path = "/var/lib/app.db"
            read_only = false
            timeout_secs = 5
            "#,
        );
        let config = SqlConfig::load_from(file.path()).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/app.db"));
        assert!(!config.database.read_only);
        assert_eq!(config.database.timeout_secs, 5);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let file = write_config("[database]\npath = \"other.db\"\n");
        let config = SqlConfig::load_from(file.path()).unwrap();
        assert_eq!(config, SqlConfig::with_database(PathBuf::from("other.db")));

        let empty = write_config("");
        assert_eq!(SqlConfig::load_from(empty.path()).unwrap(), SqlConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SqlConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{:#}", missing).contains("Failed to read config"));

        let file = write_config("[database]\ntimeout_secs = \"soon\"\n");
        let invalid = SqlConfig::load_from(file.path()).unwrap_err();
        assert!(format!("{:#}", invalid).contains("Failed to parse config"));
    }

    #[test]
    fn test_database_path_override() {
        let config = SqlConfig::default().with_env_overrides(Some("/tmp/x.db".into()));
        assert_eq!(config.database.path, PathBuf::from("/tmp/x.db"));

        let untouched = SqlConfig::default().with_env_overrides(Some(String::new()));
        assert_eq!(untouched.database.path, PathBuf::from("database.db"));

        assert_eq!(SqlConfig::default().with_env_overrides(None), SqlConfig::default());
    }
}
