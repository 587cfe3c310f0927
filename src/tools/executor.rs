//! Tool execution primitives
//!
//! Defines what a tool is (`ToolInfo` + `ToolExecutor`), what it gets to work
//! with (`ToolContext`) and what it hands back (`ToolOutput`).

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Static metadata generated by `#[gitlab_tool]`
pub trait ToolInfo {
    /// Tool name as exposed over MCP
    fn name() -> &'static str;

    /// Human-readable title
    fn title() -> &'static str;

    /// Description shown to the model
    fn description() -> &'static str;
}

/// Per-call context handed to every tool
#[derive(Clone)]
pub struct ToolContext {
    /// Shared GitLab client
    pub gitlab: Arc<GitLabClient>,
    /// Identifier used to correlate log lines of a single call
    pub request_id: String,
}

impl ToolContext {
    pub fn new(gitlab: Arc<GitLabClient>, request_id: impl Into<String>) -> Self {
        Self {
            gitlab,
            request_id: request_id.into(),
        }
    }
}

/// A single piece of tool output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    /// Text of this block
    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Result of running a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    /// Set when the tool ran but its operation failed
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output with a single text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Failed output; the message is shown to the model as-is
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Successful output rendering `value` as pretty-printed JSON
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }

    /// Successful output for an already-untyped JSON value
    pub fn json_value(value: Value) -> Result<Self, ToolError> {
        Self::json(&value)
    }

    /// All text blocks joined by newlines
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Behavior of a tool once its arguments are decoded
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}
