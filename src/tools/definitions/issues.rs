//! Issue tools

use crate::error::ToolError;
use crate::gitlab::CreateIssueOptions;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use mcp_gitlab_macros::gitlab_tool;

/// Register all issue tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<CreateIssue>();
}

/// Create an issue
#[gitlab_tool(
    name = "create-issue",
    title = "Create Issue",
    description = "Create a new issue in a GitLab project"
)]
pub struct CreateIssue {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Issue title
    pub title: String,
    /// Issue description (Markdown)
    #[serde(default)]
    pub description: Option<String>,
    /// User IDs to assign
    #[serde(default)]
    pub assignee_ids: Option<Vec<u64>>,
    /// Label names
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Milestone ID
    #[serde(default)]
    pub milestone_id: Option<u64>,
}

#[async_trait]
impl ToolExecutor for CreateIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = CreateIssueOptions {
            title: self.title.clone(),
            description: self.description.clone(),
            assignee_ids: self.assignee_ids.clone(),
            milestone_id: self.milestone_id,
            labels: self.labels.clone(),
        };

        let issue = ctx.gitlab.create_issue(&self.project_id, &options).await?;
        ToolOutput::json(&issue)
    }
}
