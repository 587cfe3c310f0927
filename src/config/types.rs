//! Configuration types for mcp-gitlab
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::util::SecretString;
use serde::Deserialize;

/// Instructions advertised to MCP clients during initialization
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant that can help with GitLab. \
You can query the GitLab and retrieve the data.";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitLab connection settings
    pub gitlab: GitLabConfig,

    /// MCP server identity
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// GitLab connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// GitLab instance URL (e.g., `https://gitlab.com`); required
    pub url: String,

    /// Bearer token (prefer env var GITLAB_TOKEN); required
    #[serde(default)]
    pub token: Option<SecretString>,

    /// API version (default: "v4")
    pub api_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether to verify TLS certificates
    pub verify_ssl: bool,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            api_version: "v4".to_string(),
            timeout_secs: 30,
            verify_ssl: true,
        }
    }
}

impl GitLabConfig {
    /// Config for `url` authenticated with `token`, everything else defaulted
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: Some(SecretString::new(token)),
            ..Default::default()
        }
    }

    /// Get the full API base URL
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.url.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// MCP server identity
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name for MCP
    pub name: String,

    /// Server version for MCP
    pub version: String,

    /// Instructions sent to the client on initialize
    pub instructions: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "mcp-gitlab".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
