//! Error types for mcp-gitlab
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to MCP responses at the server boundary.
//!
//! Client failures are layered: [`GitLabError`] describes what went wrong on the
//! wire, [`OperationError`] tags it with the client operation that was running.

pub mod mcp_mapper;

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// GitLab API specific errors
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitLab API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by GitLab (HTTP 429)")]
    RateLimited,

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    #[error("Forbidden: insufficient permissions for {action}")]
    Forbidden { action: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Request timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl GitLabError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => GitLabError::Unauthorized,
            403 => GitLabError::Forbidden {
                action: "this operation".into(),
            },
            404 => GitLabError::NotFound {
                resource: "requested resource".into(),
            },
            429 => GitLabError::RateLimited,
            _ => GitLabError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }

    /// HTTP status behind this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            GitLabError::Api { status, .. } => Some(*status),
            GitLabError::Unauthorized => Some(401),
            GitLabError::Forbidden { .. } => Some(403),
            GitLabError::NotFound { .. } => Some(404),
            GitLabError::RateLimited => Some(429),
            GitLabError::Request(e) => e.status().map(|s| s.as_u16()),
            GitLabError::MalformedResponse(_) | GitLabError::Timeout { .. } => None,
        }
    }

    /// Tag this error with the client operation that produced it
    pub fn during(self, operation: &'static str) -> OperationError {
        OperationError {
            operation,
            source: self,
        }
    }
}

/// A failed client operation
///
/// Displays as `Failed to {operation}: {cause}` while keeping the structured
/// cause available for callers that need to tell failures apart.
#[derive(Error, Debug)]
#[error("Failed to {operation}: {source}")]
pub struct OperationError {
    /// Short description of the operation, e.g. "get merge requests"
    pub operation: &'static str,
    #[source]
    pub source: GitLabError,
}

impl OperationError {
    /// HTTP status of the underlying failure, if any
    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.source, GitLabError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.source, GitLabError::NotFound { .. })
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self.source, GitLabError::MalformedResponse(_))
    }
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No authentication configured")]
    NotConfigured,

    #[error("Invalid token format")]
    InvalidToken,
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for GitLab API operations
pub type GitLabResult<T> = std::result::Result<T, GitLabError>;

/// Result type alias for typed client operations
pub type OperationResult<T> = std::result::Result<T, OperationError>;
