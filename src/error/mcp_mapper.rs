//! MCP error code mapping.
//!
//! Maps tool errors to MCP protocol errors with appropriate JSON-RPC error codes.
//!
//! # Strategy
//! - Protocol-level errors (tool not found, invalid params) → `Err(McpError)`
//! - Tool execution errors → `Ok(CallToolResult { is_error: true })`
//!
//! This lets MCP clients distinguish a malformed request from a GitLab call
//! that failed while the tool was running.

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde_json::json;
use std::borrow::Cow;

use super::{GitLabError, OperationError, ToolError};

/// Whether an error describes a bad request rather than a failed execution.
pub fn is_protocol_error(error: &ToolError) -> bool {
    matches!(
        error,
        ToolError::NotFound(_) | ToolError::InvalidArguments(_)
    )
}

/// Maps a `ToolError` to an MCP protocol error.
///
/// Execution failures are normally reported as flagged tool results instead; this
/// mapping is still total so callers can use it for logging or error data.
pub fn map_tool_error(error: &ToolError) -> McpError {
    match error {
        ToolError::NotFound(name) => McpError {
            code: ErrorCode::METHOD_NOT_FOUND,
            message: Cow::Owned(format!("Tool '{}' not found", name)),
            data: Some(json!({
                "tool": name,
                "error_type": "ToolNotFound"
            })),
        },

        ToolError::InvalidArguments(msg) => McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::Owned(msg.clone()),
            data: Some(json!({
                "error_type": "InvalidArguments"
            })),
        },

        ToolError::Serialization(e) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Failed to serialize tool output: {}", e)),
            data: Some(json!({
                "error_type": "SerializationError"
            })),
        },

        ToolError::Operation(op_err) => map_operation_error(op_err),
    }
}

/// Maps a failed client operation to an MCP protocol error.
pub fn map_operation_error(error: &OperationError) -> McpError {
    let code = match error.source {
        GitLabError::NotFound { .. } => ErrorCode::RESOURCE_NOT_FOUND,
        _ => ErrorCode::INTERNAL_ERROR,
    };

    McpError {
        code,
        message: Cow::Owned(error.to_string()),
        data: Some(json!({
            "error_type": error_type(&error.source),
            "operation": error.operation,
            "status": error.status(),
        })),
    }
}

/// Stable name for the kind of GitLab failure
fn error_type(error: &GitLabError) -> &'static str {
    match error {
        GitLabError::Request(_) => "RequestError",
        GitLabError::Api { .. } => "ApiError",
        GitLabError::RateLimited => "RateLimited",
        GitLabError::NotFound { .. } => "NotFound",
        GitLabError::Unauthorized => "Unauthorized",
        GitLabError::Forbidden { .. } => "Forbidden",
        GitLabError::MalformedResponse(_) => "MalformedResponse",
        GitLabError::Timeout { .. } => "Timeout",
    }
}
