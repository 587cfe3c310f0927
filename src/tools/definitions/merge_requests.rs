//! Merge Request tools
//!
//! Tools for listing, inspecting and acting on GitLab merge requests.

use crate::error::ToolError;
use crate::gitlab::{CreateMergeRequestOptions, MergeRequestState, MergeRequestUpdate, StateEvent};
use crate::tools::format::{format_merge_request, format_merge_request_list};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use mcp_gitlab_macros::gitlab_tool;
use tracing::debug;

/// Register all merge request tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetMyMergeRequests>();
    registry.register::<GetMergeRequestsForReview>();
    registry.register::<GetMergeRequest>();
    registry.register::<UpdateMergeRequest>();
    registry.register::<ApproveMergeRequest>();
    registry.register::<UnapproveMergeRequest>();
    registry.register::<CreateMergeRequest>();
}

// ============================================================================
// get-my-merge-requests
// ============================================================================

/// Merge requests authored by the current user
#[gitlab_tool(
    name = "get-my-merge-requests",
    title = "Get My Merge Requests",
    description = "Get merge requests created by the current user"
)]
pub struct GetMyMergeRequests {
    /// Filter by state (default: opened)
    #[serde(default)]
    pub state: Option<MergeRequestState>,
}

#[async_trait]
impl ToolExecutor for GetMyMergeRequests {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let state = self.state.unwrap_or_default();

        match ctx.gitlab.my_merge_requests(state).await {
            Ok(mrs) if mrs.is_empty() => Ok(ToolOutput::text(format!(
                "No merge requests found with state: {}",
                state
            ))),
            Ok(mrs) => {
                debug!(count = mrs.len(), %state, "Fetched own merge requests");
                Ok(ToolOutput::text(format_merge_request_list(
                    &format!("My Merge Requests ({})", state),
                    &mrs,
                )))
            }
            Err(e) => Ok(ToolOutput::error(format!(
                "Error fetching merge requests: {}",
                e
            ))),
        }
    }
}

// ============================================================================
// get-merge-requests-for-review
// ============================================================================

/// Merge requests waiting on the current user's review
#[gitlab_tool(
    name = "get-merge-requests-for-review",
    title = "Get Merge Requests for Review",
    description = "Get merge requests assigned to the current user for review"
)]
pub struct GetMergeRequestsForReview {
    /// Filter by state (default: opened)
    #[serde(default)]
    pub state: Option<MergeRequestState>,
}

#[async_trait]
impl ToolExecutor for GetMergeRequestsForReview {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let state = self.state.unwrap_or_default();

        match ctx.gitlab.merge_requests_for_review(state).await {
            Ok(mrs) if mrs.is_empty() => Ok(ToolOutput::text(format!(
                "No merge requests found for review with state: {}",
                state
            ))),
            Ok(mrs) => Ok(ToolOutput::text(format_merge_request_list(
                &format!("Merge Requests for Review ({})", state),
                &mrs,
            ))),
            Err(e) => Ok(ToolOutput::error(format!(
                "Error fetching merge requests for review: {}",
                e
            ))),
        }
    }
}

// ============================================================================
// get-merge-request
// ============================================================================

/// A single merge request
#[gitlab_tool(
    name = "get-merge-request",
    title = "Get Merge Request",
    description = "Get details of a specific merge request, including its formatted summary"
)]
pub struct GetMergeRequest {
    /// Project ID or URL-encoded path (e.g., 'group/project')
    pub project_id: String,
    /// Merge request IID (project-scoped number)
    pub merge_request_iid: u64,
}

#[async_trait]
impl ToolExecutor for GetMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let mr = ctx
            .gitlab
            .merge_request(&self.project_id, self.merge_request_iid)
            .await?;

        let details = serde_json::to_string_pretty(&mr)?;
        Ok(ToolOutput::text(format!(
            "{}\n\n{}",
            format_merge_request(&mr),
            details
        )))
    }
}

// ============================================================================
// update-merge-request
// ============================================================================

/// Update a merge request
#[gitlab_tool(
    name = "update-merge-request",
    title = "Update Merge Request",
    description = "Update the title or description of a merge request, or close, reopen or merge it"
)]
pub struct UpdateMergeRequest {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Merge request IID
    pub merge_request_iid: u64,
    /// State transition to apply: close, reopen or merge
    #[serde(default)]
    pub state_event: Option<StateEvent>,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New description (Markdown)
    #[serde(default)]
    pub description: Option<String>,
}

#[async_trait]
impl ToolExecutor for UpdateMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let update = MergeRequestUpdate {
            state_event: self.state_event,
            title: self.title.clone(),
            description: self.description.clone(),
        };

        if update.is_empty() {
            return Err(ToolError::InvalidArguments(
                "Provide at least one of state_event, title or description".to_string(),
            ));
        }

        let mr = ctx
            .gitlab
            .update_merge_request(&self.project_id, self.merge_request_iid, &update)
            .await?;

        ToolOutput::json(&mr)
    }
}

// ============================================================================
// approve-merge-request / unapprove-merge-request
// ============================================================================

/// Approve a merge request
#[gitlab_tool(
    name = "approve-merge-request",
    title = "Approve Merge Request",
    description = "Approve a merge request as the current user"
)]
pub struct ApproveMergeRequest {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Merge request IID
    pub merge_request_iid: u64,
}

#[async_trait]
impl ToolExecutor for ApproveMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let result = ctx
            .gitlab
            .approve_merge_request(&self.project_id, self.merge_request_iid)
            .await?;

        ToolOutput::json_value(result)
    }
}

/// Withdraw approval of a merge request
#[gitlab_tool(
    name = "unapprove-merge-request",
    title = "Unapprove Merge Request",
    description = "Remove the current user's approval from a merge request"
)]
pub struct UnapproveMergeRequest {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Merge request IID
    pub merge_request_iid: u64,
}

#[async_trait]
impl ToolExecutor for UnapproveMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let result = ctx
            .gitlab
            .unapprove_merge_request(&self.project_id, self.merge_request_iid)
            .await?;

        ToolOutput::json_value(result)
    }
}

// ============================================================================
// create-merge-request
// ============================================================================

/// Create a merge request
#[gitlab_tool(
    name = "create-merge-request",
    title = "Create Merge Request",
    description = "Create a new merge request in a GitLab project"
)]
pub struct CreateMergeRequest {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Merge request title
    pub title: String,
    /// Merge request description (Markdown)
    #[serde(default)]
    pub description: Option<String>,
    /// Branch containing the changes
    pub source_branch: String,
    /// Branch to merge into
    pub target_branch: String,
    /// Create the merge request as a draft
    #[serde(default)]
    pub draft: Option<bool>,
    /// Allow commits from members who can merge to the target branch
    #[serde(default)]
    pub allow_collaboration: Option<bool>,
}

#[async_trait]
impl ToolExecutor for CreateMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = CreateMergeRequestOptions {
            title: self.title.clone(),
            description: self.description.clone(),
            source_branch: self.source_branch.clone(),
            target_branch: self.target_branch.clone(),
            allow_collaboration: self.allow_collaboration,
            draft: self.draft,
        };

        let mr = ctx
            .gitlab
            .create_merge_request(&self.project_id, &options)
            .await?;

        ToolOutput::json(&mr)
    }
}
