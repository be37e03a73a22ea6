//! Optional TOML configuration file for the `reversi-client` binary.
//!
//! Example:
//!
//! ```toml
//! [server]
//! host = "game.example.org"
//! port = 55555
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field has a serde default, so an empty file (or no file at all) is a
//! valid configuration.  Command-line arguments override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the Reversi server listens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset, e.g. `"info"` or
    /// `"reversi_client=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    55555
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the text is not valid TOML or a field has the
    /// wrong type.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Renders the configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Reads and parses the file at `path`.
///
/// Unlike a platform default location, an explicitly named file must exist.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`] if
/// the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ClientConfig::from_toml(&content)
}

/// Loads `path` if given, otherwise returns the defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ClientConfig::default()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let cfg = ClientConfig::from_toml("").unwrap();

        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 55555);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let text = "[server]\nport = 6000\n";

        // Act
        let cfg = ClientConfig::from_toml(text).unwrap();

        // Assert
        assert_eq!(cfg.server.port, 6000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_full_document_parses_every_field() {
        let text = r#"
            [server]
            host = "game.example.org"
            port = 7000

            [logging]
            level = "debug"
        "#;

        let cfg = ClientConfig::from_toml(text).unwrap();

        assert_eq!(cfg.server.host, "game.example.org");
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_port_out_of_range_is_a_parse_error() {
        let result = ClientConfig::from_toml("[server]\nport = 70000\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_to_toml_output_parses_back_to_same_config() {
        let mut cfg = ClientConfig::default();
        cfg.server.host = "10.0.0.7".to_string();

        let text = cfg.to_toml().unwrap();

        assert!(text.contains("[server]"));
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        // Arrange
        let path = std::env::temp_dir().join(format!("reversi-missing-{}.toml", uuid::Uuid::new_v4()));

        // Act
        let result = load_config(&path);

        // Assert
        match result {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_or_default_without_path_needs_no_file() {
        assert_eq!(load_or_default(None).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("reversi-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let cfg = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.logging.level, "warn");
    }
}
