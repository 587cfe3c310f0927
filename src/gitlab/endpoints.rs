//! Typed GitLab operations
//!
//! One method per supported REST endpoint. Each decodes the response into the
//! shapes from [`super::types`] and tags failures with the operation name, so a
//! caller always sees `Failed to {operation}: {cause}`.

use crate::error::{GitLabError, GitLabResult, OperationResult};
use crate::gitlab::client::GitLabClient;
use crate::gitlab::types::{
    BranchReference, Commit, CreateIssueOptions, CreateMergeRequestOptions,
    CreateRepositoryOptions, FileCommitResponse, FileContent, FileOperation, ForkedProject, Issue,
    MergeRequest, MergeRequestState, MergeRequestUpdate, Project, SearchResponse, TreeEntry, User,
};
use crate::util::QueryBuilder;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Ref used when a caller does not name one
pub const DEFAULT_REF: &str = "HEAD";

/// Branch used for new branches when the project reports no default branch
const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// Options for listing a repository tree
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub path: Option<String>,
    pub ref_name: Option<String>,
    pub recursive: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Body of the single-file create/update endpoints
#[derive(Debug, Serialize)]
struct FileCommitPayload<'a> {
    branch: &'a str,
    content: &'a str,
    commit_message: &'a str,
    encoding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_path: Option<&'a str>,
}

/// Body of the multi-action commits endpoint
#[derive(Debug, Serialize)]
struct CommitPayload<'a> {
    branch: &'a str,
    commit_message: &'a str,
    actions: Vec<CommitAction<'a>>,
}

#[derive(Debug, Serialize)]
struct CommitAction<'a> {
    action: &'static str,
    file_path: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateBranchPayload<'a> {
    branch: &'a str,
    #[serde(rename = "ref")]
    ref_name: &'a str,
}

#[derive(Debug, Serialize)]
struct ForkPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace_path: Option<&'a str>,
}

impl GitLabClient {
    fn merge_request_path(project: &str, iid: u64) -> String {
        format!(
            "/projects/{}/merge_requests/{}",
            Self::encode_project(project),
            iid
        )
    }

    fn file_path(project: &str, file_path: &str) -> String {
        format!(
            "/projects/{}/repository/files/{}",
            Self::encode_project(project),
            urlencoding::encode(file_path)
        )
    }

    async fn fetch_current_user(&self) -> GitLabResult<User> {
        self.get("/user").await
    }

    /// The authenticated user
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> OperationResult<User> {
        self.fetch_current_user()
            .await
            .map_err(|e| e.during("get current user"))
    }

    /// Merge requests created by the authenticated user, most recently updated first
    #[instrument(skip(self))]
    pub async fn my_merge_requests(
        &self,
        state: MergeRequestState,
    ) -> OperationResult<Vec<MergeRequest>> {
        let query = QueryBuilder::new()
            .param("scope", "created_by_me")
            .param("state", state)
            .param("order_by", "updated_at")
            .param("sort", "desc")
            .build();

        self.get(&format!("/merge_requests{}", query))
            .await
            .map_err(|e| e.during("get merge requests"))
    }

    /// Merge requests where the authenticated user is a reviewer
    ///
    /// Resolves the current user first; the reviewer query depends on its id.
    #[instrument(skip(self))]
    pub async fn merge_requests_for_review(
        &self,
        state: MergeRequestState,
    ) -> OperationResult<Vec<MergeRequest>> {
        let operation = "get merge requests for review";

        let user = self
            .fetch_current_user()
            .await
            .map_err(|e| e.during(operation))?;
        debug!(user_id = user.id, "Resolved reviewer identity");

        let query = QueryBuilder::new()
            .param("reviewer_id", user.id)
            .param("state", state)
            .param("scope", "all")
            .param("order_by", "updated_at")
            .param("sort", "desc")
            .build();

        self.get(&format!("/merge_requests{}", query))
            .await
            .map_err(|e| e.during(operation))
    }

    /// A single merge request by project and IID
    #[instrument(skip(self))]
    pub async fn merge_request(&self, project: &str, iid: u64) -> OperationResult<MergeRequest> {
        self.get(&Self::merge_request_path(project, iid))
            .await
            .map_err(|e| e.during("get merge request"))
    }

    /// Apply a partial update and return the updated merge request
    #[instrument(skip(self, update))]
    pub async fn update_merge_request(
        &self,
        project: &str,
        iid: u64,
        update: &MergeRequestUpdate,
    ) -> OperationResult<MergeRequest> {
        self.put(&Self::merge_request_path(project, iid), update)
            .await
            .map_err(|e| e.during("update merge request"))
    }

    /// Approve as the authenticated user; returns GitLab's approval state verbatim
    #[instrument(skip(self))]
    pub async fn approve_merge_request(&self, project: &str, iid: u64) -> OperationResult<Value> {
        let endpoint = format!("{}/approve", Self::merge_request_path(project, iid));
        self.post_empty(&endpoint)
            .await
            .map_err(|e| e.during("approve merge request"))
    }

    /// Withdraw the authenticated user's approval; returns the raw response
    #[instrument(skip(self))]
    pub async fn unapprove_merge_request(
        &self,
        project: &str,
        iid: u64,
    ) -> OperationResult<Value> {
        let endpoint = format!("{}/unapprove", Self::merge_request_path(project, iid));
        self.post_empty(&endpoint)
            .await
            .map_err(|e| e.during("unapprove merge request"))
    }

    /// Projects the authenticated user is a member of, most recently active first
    #[instrument(skip(self))]
    pub async fn projects(&self) -> OperationResult<Vec<Project>> {
        let query = QueryBuilder::new()
            .param("membership", true)
            .param("order_by", "last_activity_at")
            .param("sort", "desc")
            .build();

        self.get(&format!("/projects{}", query))
            .await
            .map_err(|e| e.during("get projects"))
    }

    /// A repository file; base64 content is decoded when it is UTF-8 text
    #[instrument(skip(self))]
    pub async fn file_contents(
        &self,
        project: &str,
        file_path: &str,
        ref_name: Option<&str>,
    ) -> OperationResult<FileContent> {
        let query = QueryBuilder::new()
            .param("ref", ref_name.unwrap_or(DEFAULT_REF))
            .build();
        let endpoint = format!("{}{}", Self::file_path(project, file_path), query);

        let file: FileContent = self
            .get(&endpoint)
            .await
            .map_err(|e| e.during("get file contents"))?;

        Ok(decode_file_content(file))
    }

    /// Create `file_path` on `branch`, or update it when it already exists there
    #[instrument(skip(self, content))]
    pub async fn create_or_update_file(
        &self,
        project: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
        branch: &str,
        previous_path: Option<&str>,
    ) -> OperationResult<FileCommitResponse> {
        let operation = "create or update file";
        let endpoint = Self::file_path(project, file_path);

        let lookup = format!(
            "{}{}",
            endpoint,
            QueryBuilder::new().param("ref", branch).build()
        );
        let exists = match self.get::<Value>(&lookup).await {
            Ok(_) => true,
            Err(GitLabError::NotFound { .. }) => false,
            Err(e) => return Err(e.during(operation)),
        };

        let payload = FileCommitPayload {
            branch,
            content,
            commit_message,
            encoding: "text",
            previous_path,
        };

        let result = if exists {
            debug!(file_path, "File exists, updating");
            self.put(&endpoint, &payload).await
        } else {
            debug!(file_path, "File does not exist, creating");
            self.post(&endpoint, &payload).await
        };

        result.map_err(|e| e.during(operation))
    }

    /// Create several files in one commit
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn push_files(
        &self,
        project: &str,
        branch: &str,
        files: &[FileOperation],
        commit_message: &str,
    ) -> OperationResult<Commit> {
        let payload = CommitPayload {
            branch,
            commit_message,
            actions: files
                .iter()
                .map(|file| CommitAction {
                    action: "create",
                    file_path: &file.file_path,
                    content: &file.content,
                })
                .collect(),
        };

        let endpoint = format!(
            "/projects/{}/repository/commits",
            Self::encode_project(project)
        );
        self.post(&endpoint, &payload)
            .await
            .map_err(|e| e.during("push files"))
    }

    /// Files and directories under a path
    #[instrument(skip(self))]
    pub async fn repository_tree(
        &self,
        project: &str,
        options: &TreeOptions,
    ) -> OperationResult<Vec<TreeEntry>> {
        let query = QueryBuilder::new()
            .optional("path", options.path.as_deref())
            .optional("ref", options.ref_name.as_deref())
            .flag("recursive", options.recursive)
            .optional("page", options.page)
            .per_page(options.per_page)
            .build();

        let endpoint = format!(
            "/projects/{}/repository/tree{}",
            Self::encode_project(project),
            query
        );
        self.get(&endpoint)
            .await
            .map_err(|e| e.during("get repository tree"))
    }

    /// Create a branch from `ref_name`, or from the project's default branch
    #[instrument(skip(self))]
    pub async fn create_branch(
        &self,
        project: &str,
        branch: &str,
        ref_name: Option<&str>,
    ) -> OperationResult<BranchReference> {
        let operation = "create branch";
        let encoded = Self::encode_project(project);

        let source = match ref_name {
            Some(ref_name) => ref_name.to_string(),
            None => {
                let project: Project = self
                    .get(&format!("/projects/{}", encoded))
                    .await
                    .map_err(|e| e.during(operation))?;
                project
                    .default_branch
                    .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string())
            }
        };

        let payload = CreateBranchPayload {
            branch,
            ref_name: &source,
        };
        self.post(&format!("/projects/{}/repository/branches", encoded), &payload)
            .await
            .map_err(|e| e.during(operation))
    }

    #[instrument(skip(self, options), fields(title = %options.title))]
    pub async fn create_issue(
        &self,
        project: &str,
        options: &CreateIssueOptions,
    ) -> OperationResult<Issue> {
        let endpoint = format!("/projects/{}/issues", Self::encode_project(project));
        self.post(&endpoint, options)
            .await
            .map_err(|e| e.during("create issue"))
    }

    #[instrument(skip(self, options), fields(title = %options.title))]
    pub async fn create_merge_request(
        &self,
        project: &str,
        options: &CreateMergeRequestOptions,
    ) -> OperationResult<MergeRequest> {
        let endpoint = format!("/projects/{}/merge_requests", Self::encode_project(project));
        self.post(&endpoint, options)
            .await
            .map_err(|e| e.during("create merge request"))
    }

    /// Search projects visible to the authenticated user
    #[instrument(skip(self))]
    pub async fn search_repositories(
        &self,
        search: &str,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> OperationResult<SearchResponse> {
        let query = QueryBuilder::new()
            .param("search", search)
            .optional("page", page)
            .per_page(per_page)
            .build();

        let page = self
            .get_page::<Project>(&format!("/projects{}", query))
            .await
            .map_err(|e| e.during("search repositories"))?;

        Ok(SearchResponse {
            count: page.total.unwrap_or(page.items.len() as u64),
            items: page.items,
        })
    }

    /// Create a project in the authenticated user's namespace
    #[instrument(skip(self, options), fields(name = %options.name))]
    pub async fn create_repository(
        &self,
        options: &CreateRepositoryOptions,
    ) -> OperationResult<Project> {
        let project: Project = self
            .post("/projects", options)
            .await
            .map_err(|e| e.during("create repository"))?;

        info!(project = %project.path_with_namespace, "Created project");
        Ok(project)
    }

    /// Fork a project, optionally into another namespace
    #[instrument(skip(self))]
    pub async fn fork_repository(
        &self,
        project: &str,
        namespace: Option<&str>,
    ) -> OperationResult<ForkedProject> {
        let endpoint = format!("/projects/{}/fork", Self::encode_project(project));
        let payload = ForkPayload {
            namespace_path: namespace,
        };

        self.post(&endpoint, &payload)
            .await
            .map_err(|e| e.during("fork repository"))
    }
}

/// Replace base64 content with its text, leaving binary files untouched
fn decode_file_content(mut file: FileContent) -> FileContent {
    if file.encoding != "base64" {
        return file;
    }

    // GitLab wraps long base64 payloads
    let compact: String = file.content.split_whitespace().collect();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());

    if let Some(text) = decoded {
        file.content = text;
        file.encoding = "text".to_string();
    }
    file
}
