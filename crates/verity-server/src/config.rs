//! Server configuration.
//!
//! Resolution order (later wins): built-in defaults, YAML config file,
//! command-line flags / environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// Fixture table replacing the built-in one
    pub fixtures: Option<PathBuf>,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Allow cross-origin requests from any origin
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            fixtures: None,
            log_filter: "info".to_string(),
            cors_allow_any: true,
        }
    }
}

impl ServerConfig {
    /// Parse configuration from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind.port(), 8000);
        assert!(config.cors_allow_any);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ServerConfig::from_yaml("bind: \"127.0.0.1:9100\"\n").unwrap();
        assert_eq!(config.bind, "127.0.0.1:9100".parse().unwrap());
        assert!(config.fixtures.is_none());
        assert!(config.cors_allow_any);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
bind: "0.0.0.0:8080"
fixtures: "/etc/verity/providers.yaml"
log_filter: "verity_runtime=debug,info"
cors_allow_any: false
"#;
        let config = ServerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.fixtures, Some(PathBuf::from("/etc/verity/providers.yaml")));
        assert_eq!(config.log_filter, "verity_runtime=debug,info");
        assert!(!config.cors_allow_any);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ServerConfig::from_yaml("port: 8000\n").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ServerConfig::from_yaml_file("/nonexistent/verity.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/verity.yaml"));
    }
}
