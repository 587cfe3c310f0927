//! Project tools
//!
//! Listing, searching, creating and forking projects.

use crate::error::ToolError;
use crate::gitlab::{CreateRepositoryOptions, Visibility};
use crate::tools::format::format_project_list;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use mcp_gitlab_macros::gitlab_tool;

/// Register all project tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetProjects>();
    registry.register::<SearchRepositories>();
    registry.register::<CreateRepository>();
    registry.register::<ForkRepository>();
}

/// Projects the current user is a member of
#[gitlab_tool(
    name = "get-projects",
    title = "Get Projects",
    description = "Get the projects the current user is a member of, most recently active first"
)]
pub struct GetProjects {}

#[async_trait]
impl ToolExecutor for GetProjects {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let projects = ctx.gitlab.projects().await?;
        Ok(ToolOutput::text(format_project_list(&projects)))
    }
}

/// Search projects
#[gitlab_tool(
    name = "search-repositories",
    title = "Search Repositories",
    description = "Search for GitLab projects by name"
)]
pub struct SearchRepositories {
    /// Search query
    pub search: String,
    /// Page number for pagination (default: 1)
    #[serde(default)]
    pub page: Option<u32>,
    /// Number of results per page (default: 20, max 100)
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[async_trait]
impl ToolExecutor for SearchRepositories {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        if self.search.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "search must not be empty".to_string(),
            ));
        }

        let results = ctx
            .gitlab
            .search_repositories(&self.search, self.page, self.per_page)
            .await?;

        ToolOutput::json(&results)
    }
}

/// Create a new project
#[gitlab_tool(
    name = "create-repository",
    title = "Create Repository",
    description = "Create a new GitLab project in the current user's namespace"
)]
pub struct CreateRepository {
    /// Repository name
    pub name: String,
    /// Repository description
    #[serde(default)]
    pub description: Option<String>,
    /// Repository visibility level
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// Initialize with README.md
    #[serde(default)]
    pub initialize_with_readme: Option<bool>,
}

#[async_trait]
impl ToolExecutor for CreateRepository {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = CreateRepositoryOptions {
            name: self.name.clone(),
            description: self.description.clone(),
            visibility: self.visibility,
            initialize_with_readme: self.initialize_with_readme,
        };

        let project = ctx.gitlab.create_repository(&options).await?;
        ToolOutput::json(&project)
    }
}

/// Fork a project
#[gitlab_tool(
    name = "fork-repository",
    title = "Fork Repository",
    description = "Fork a GitLab project to your account or a specified namespace"
)]
pub struct ForkRepository {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Namespace to fork into (defaults to the current user's namespace)
    #[serde(default)]
    pub namespace: Option<String>,
}

#[async_trait]
impl ToolExecutor for ForkRepository {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let fork = ctx
            .gitlab
            .fork_repository(&self.project_id, self.namespace.as_deref())
            .await?;

        ToolOutput::json(&fork)
    }
}
