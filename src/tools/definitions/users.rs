//! User tools

use crate::error::ToolError;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use mcp_gitlab_macros::gitlab_tool;

/// Register all user tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetCurrentUser>();
}

/// Get current user
#[gitlab_tool(
    name = "get-current-user",
    title = "Get Current User",
    description = "Get the current user"
)]
pub struct GetCurrentUser {}

#[async_trait]
impl ToolExecutor for GetCurrentUser {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let user = match ctx.gitlab.current_user().await {
            Ok(user) => user,
            Err(e) => {
                return Ok(ToolOutput::error(format!(
                    "Error fetching current user: {}",
                    e
                )));
            }
        };

        Ok(ToolOutput::text(format!(
            "# Current User\n\nFound {} ({}) : {}",
            user.name,
            user.username,
            serde_json::to_string(&user)?
        )))
    }
}
