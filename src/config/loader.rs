//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. `GITLAB_URL` / `GITLAB_TOKEN`
//! 2. Environment variables (MCP_GITLAB__*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "mcp-gitlab.toml",
    ".mcp-gitlab.toml",
    "~/.config/mcp-gitlab/config.toml",
];

/// Environment variable holding the GitLab instance URL
pub const GITLAB_URL_ENV: &str = "GITLAB_URL";

/// Environment variable holding the GitLab bearer token
pub const GITLAB_TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Load configuration from a TOML string (useful for testing)
///
/// The token requirement is skipped so fixtures don't need credentials.
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_connection(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        let expanded = shellexpand::tilde(path);
        if !Path::new(expanded.as_ref()).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., MCP_GITLAB__GITLAB__TIMEOUT_SECS, MCP_GITLAB__LOGGING__FORMAT
    builder = builder.add_source(
        Environment::with_prefix("MCP_GITLAB")
            .separator("__")
            .try_parsing(true),
    );

    if let Ok(url) = std::env::var(GITLAB_URL_ENV) {
        builder = builder
            .set_override("gitlab.url", url)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    if let Ok(token) = std::env::var(GITLAB_TOKEN_ENV) {
        builder = builder
            .set_override("gitlab.token", token)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate everything except the token
fn validate_connection(config: &AppConfig) -> Result<(), ConfigError> {
    if config.gitlab.url.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: format!("gitlab.url (set {} environment variable)", GITLAB_URL_ENV),
        });
    }

    if !config.gitlab.url.starts_with("http://") && !config.gitlab.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "gitlab.url must start with http:// or https://, got: {}",
                config.gitlab.url
            ),
        });
    }

    if config.gitlab.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "gitlab.timeout_secs must be greater than 0".to_string(),
        });
    }

    Ok(())
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_connection(config)?;

    let has_token = config
        .gitlab
        .token
        .as_ref()
        .is_some_and(|token| !token.is_blank());

    if !has_token {
        return Err(ConfigError::Missing {
            field: format!(
                "gitlab.token (set {} environment variable)",
                GITLAB_TOKEN_ENV
            ),
        });
    }

    Ok(())
}
