//! Repository tools
//!
//! Reading and writing repository files and browsing the tree.

use crate::error::ToolError;
use crate::gitlab::{FileOperation, TreeOptions};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use mcp_gitlab_macros::gitlab_tool;

/// Register all repository tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetFileContents>();
    registry.register::<CreateOrUpdateFile>();
    registry.register::<PushFiles>();
    registry.register::<GetRepositoryTree>();
}

// ============================================================================
// get-file-contents
// ============================================================================

/// Get file contents
#[gitlab_tool(
    name = "get-file-contents",
    title = "Get File Contents",
    description = "Get the contents of a file from a GitLab project"
)]
pub struct GetFileContents {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Path to the file in the repository
    pub file_path: String,
    /// Branch, tag, or commit to read from (default: HEAD)
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
}

#[async_trait]
impl ToolExecutor for GetFileContents {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let file = ctx
            .gitlab
            .file_contents(&self.project_id, &self.file_path, self.ref_name.as_deref())
            .await?;

        ToolOutput::json(&file)
    }
}

// ============================================================================
// create-or-update-file
// ============================================================================

/// Create or update a single file
#[gitlab_tool(
    name = "create-or-update-file",
    title = "Create or Update File",
    description = "Create or update a single file in a GitLab project"
)]
pub struct CreateOrUpdateFile {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Path where to create or update the file
    pub file_path: String,
    /// Content of the file
    pub content: String,
    /// Commit message
    pub commit_message: String,
    /// Branch to create or update the file in
    pub branch: String,
    /// Path of the file to move or rename
    #[serde(default)]
    pub previous_path: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateOrUpdateFile {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let result = ctx
            .gitlab
            .create_or_update_file(
                &self.project_id,
                &self.file_path,
                &self.content,
                &self.commit_message,
                &self.branch,
                self.previous_path.as_deref(),
            )
            .await?;

        ToolOutput::json(&result)
    }
}

// ============================================================================
// push-files
// ============================================================================

/// Commit several new files at once
#[gitlab_tool(
    name = "push-files",
    title = "Push Files",
    description = "Push multiple files to a GitLab project in a single commit"
)]
pub struct PushFiles {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Branch to push to
    pub branch: String,
    /// Files to push
    pub files: Vec<FileOperation>,
    /// Commit message
    pub commit_message: String,
}

#[async_trait]
impl ToolExecutor for PushFiles {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        if self.files.is_empty() {
            return Err(ToolError::InvalidArguments(
                "files must contain at least one file".to_string(),
            ));
        }

        let commit = ctx
            .gitlab
            .push_files(
                &self.project_id,
                &self.branch,
                &self.files,
                &self.commit_message,
            )
            .await?;

        ToolOutput::json(&commit)
    }
}

// ============================================================================
// get-repository-tree
// ============================================================================

/// List the repository tree
#[gitlab_tool(
    name = "get-repository-tree",
    title = "Get Repository Tree",
    description = "List files and directories in a GitLab project repository"
)]
pub struct GetRepositoryTree {
    /// Project ID or URL-encoded path
    pub project_id: String,
    /// Path inside the repository (default: root)
    #[serde(default)]
    pub path: Option<String>,
    /// Branch, tag, or commit (default: the default branch)
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
    /// List the tree recursively
    #[serde(default)]
    pub recursive: bool,
    /// Page number
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page (max 100)
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[async_trait]
impl ToolExecutor for GetRepositoryTree {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = TreeOptions {
            path: self.path.clone(),
            ref_name: self.ref_name.clone(),
            recursive: self.recursive,
            page: self.page,
            per_page: self.per_page,
        };

        let entries = ctx
            .gitlab
            .repository_tree(&self.project_id, &options)
            .await?;

        ToolOutput::json(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_argument_name() {
        let tool: GetFileContents = serde_json::from_value(json!({
            "project_id": "acme/web",
            "file_path": "README.md",
            "ref": "develop"
        }))
        .unwrap();
        assert_eq!(tool.ref_name.as_deref(), Some("develop"));
    }

    #[test]
    fn test_push_files_decodes_file_list() {
        let tool: PushFiles = serde_json::from_value(json!({
            "project_id": "42",
            "branch": "main",
            "commit_message": "Add docs",
            "files": [
                {"file_path": "docs/a.md", "content": "A"},
                {"file_path": "docs/b.md", "content": "B"}
            ]
        }))
        .unwrap();
        assert_eq!(tool.files.len(), 2);
        assert_eq!(tool.files[1].file_path, "docs/b.md");
    }
}
