//! Branch tools

use crate::error::ToolError;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use mcp_gitlab_macros::gitlab_tool;

/// Register all branch tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<CreateBranch>();
}

/// Create a branch
#[gitlab_tool(
    name = "create-branch",
    title = "Create Branch",
    description = "Create a new branch in a GitLab project"
)]
pub struct CreateBranch {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Name of the new branch
    pub branch: String,
    /// Source branch or commit (default: the project's default branch)
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateBranch {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let branch = ctx
            .gitlab
            .create_branch(&self.project_id, &self.branch, self.ref_name.as_deref())
            .await?;

        ToolOutput::json(&branch)
    }
}
