//! GitLab API types
//!
//! Response shapes decoded from the GitLab REST API and the request bodies sent
//! to it. Decoding is the validation step: fields not declared here are ignored,
//! and a missing required field fails the decode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Users and projects
// ============================================================================

/// GitLab user (author, assignee, reviewer, current user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

/// GitLab project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    pub web_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub fork: Option<bool>,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Owner summary embedded in a fork parent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkOwner {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// The project a fork was created from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkParent {
    pub name: String,
    pub path_with_namespace: String,
    pub web_url: String,
    #[serde(default)]
    pub owner: Option<ForkOwner>,
}

/// A newly forked project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkedProject {
    #[serde(flatten)]
    pub project: Project,
    pub forked_from_project: ForkParent,
}

/// One page of project search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of matches (`X-Total`), or the page length when GitLab omits it
    pub count: u64,
    pub items: Vec<Project>,
}

// ============================================================================
// Merge requests
// ============================================================================

/// State filter for merge request listings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    #[default]
    Opened,
    Closed,
    Merged,
    All,
}

impl MergeRequestState {
    pub const ALL: [MergeRequestState; 4] = [
        MergeRequestState::Opened,
        MergeRequestState::Closed,
        MergeRequestState::Merged,
        MergeRequestState::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeRequestState::Opened => "opened",
            MergeRequestState::Closed => "closed",
            MergeRequestState::Merged => "merged",
            MergeRequestState::All => "all",
        }
    }
}

impl fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project summary embedded in a merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
}

/// Latest pipeline of a merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub id: u64,
    pub status: String,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Cross-reference strings of a merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequestReferences {
    /// e.g. `group/project!12`
    pub full: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffRefs {
    pub base_sha: String,
    pub head_sha: String,
    pub start_sha: String,
}

/// GitLab merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// opened, closed, merged or locked
    pub state: String,
    pub author: User,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub reviewers: Vec<User>,
    pub source_branch: String,
    pub target_branch: String,
    pub web_url: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub pipeline: Option<PipelineSummary>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub references: Option<MergeRequestReferences>,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub detailed_merge_status: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub work_in_progress: bool,
    #[serde(default)]
    pub diff_refs: Option<DiffRefs>,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
}

impl MergeRequest {
    /// Namespaced path of the owning project
    ///
    /// The global `/merge_requests` listing does not embed `project`, so fall back
    /// to the `group/project` prefix of `references.full`.
    pub fn project_path(&self) -> &str {
        if let Some(project) = &self.project {
            return &project.path_with_namespace;
        }

        self.references
            .as_ref()
            .and_then(|r| r.full.split('!').next())
            .filter(|path| !path.is_empty())
            .unwrap_or("unknown")
    }

    /// Most specific mergeability status GitLab reported
    pub fn merge_status_label(&self) -> &str {
        self.detailed_merge_status
            .as_deref()
            .or(self.merge_status.as_deref())
            .unwrap_or("unknown")
    }
}

/// `state_event` values accepted by the merge request update endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StateEvent {
    Close,
    Reopen,
    Merge,
}

/// Partial merge request update; only provided fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<StateEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MergeRequestUpdate {
    pub fn is_empty(&self) -> bool {
        self.state_event.is_none() && self.title.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMergeRequestOptions {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_branch: String,
    pub target_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_collaboration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

// ============================================================================
// Issues, labels and milestones
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Issues list labels by name unless `with_labels_details` was requested
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelRef {
    Name(String),
    Detailed(Label),
}

impl LabelRef {
    pub fn name(&self) -> &str {
        match self {
            LabelRef::Name(name) => name,
            LabelRef::Detailed(label) => &label.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    pub web_url: String,
}

/// GitLab issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    pub author: User,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    pub web_url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssueOptions {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    /// Sent as GitLab's comma-separated label list
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_label_list"
    )]
    pub labels: Option<Vec<String>>,
}

fn serialize_label_list<S: Serializer>(
    labels: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match labels {
        Some(labels) => serializer.serialize_str(&labels.join(",")),
        None => serializer.serialize_none(),
    }
}

// ============================================================================
// Repository content
// ============================================================================

/// GitLab commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub authored_date: String,
    pub committer_name: String,
    pub committer_email: String,
    pub committed_date: String,
    pub web_url: String,
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub id: String,
    pub web_url: String,
}

/// A branch and the commit it points at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchReference {
    pub name: String,
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryType {
    Blob,
    Tree,
    /// Submodule
    Commit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: TreeEntryType,
    pub path: String,
    pub mode: String,
}

/// File fetched from the repository files API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub file_name: String,
    pub file_path: String,
    pub size: u64,
    /// `base64` as sent by GitLab, `text` once decoded
    pub encoding: String,
    pub content: String,
    pub content_sha256: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub blob_id: String,
    pub last_commit_id: String,
}

/// Result of creating or updating a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCommitResponse {
    pub file_path: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
}

/// A file to write as part of a multi-file commit
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileOperation {
    /// Path where to create the file
    pub file_path: String,
    /// Content of the file
    pub content: String,
}

/// Project visibility level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Internal,
    Public,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRepositoryOptions {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_with_readme: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_mr() -> serde_json::Value {
        json!({
            "id": 1001,
            "iid": 7,
            "project_id": 42,
            "title": "Add login page",
            "description": null,
            "state": "opened",
            "author": {"id": 3, "username": "alice", "name": "Alice"},
            "source_branch": "feature/login",
            "target_branch": "main",
            "web_url": "https://gitlab.example.com/acme/web/-/merge_requests/7",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-02T10:00:00Z",
            "some_field_we_ignore": {"nested": true}
        })
    }

    #[test]
    fn test_merge_request_minimal_decode() {
        let mr: MergeRequest = serde_json::from_value(minimal_mr()).unwrap();
        assert_eq!(mr.iid, 7);
        assert!(mr.pipeline.is_none());
        assert!(!mr.draft);
        assert!(mr.reviewers.is_empty());
        assert_eq!(mr.project_path(), "unknown");
        assert_eq!(mr.merge_status_label(), "unknown");
    }

    #[test]
    fn test_merge_request_missing_required_field_fails() {
        let mut value = minimal_mr();
        value.as_object_mut().unwrap().remove("author");
        assert!(serde_json::from_value::<MergeRequest>(value).is_err());
    }

    #[test]
    fn test_project_path_prefers_embedded_project() {
        let mut value = minimal_mr();
        value["references"] = json!({"full": "acme/web!7", "short": "!7"});
        let mr: MergeRequest = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(mr.project_path(), "acme/web");

        value["project"] = json!({"id": 42, "name": "Web", "path_with_namespace": "acme/web-app"});
        let mr: MergeRequest = serde_json::from_value(value).unwrap();
        assert_eq!(mr.project_path(), "acme/web-app");
    }

    #[test]
    fn test_merge_status_label_fallback() {
        let mut value = minimal_mr();
        value["merge_status"] = json!("can_be_merged");
        let mr: MergeRequest = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(mr.merge_status_label(), "can_be_merged");

        value["detailed_merge_status"] = json!("mergeable");
        let mr: MergeRequest = serde_json::from_value(value).unwrap();
        assert_eq!(mr.merge_status_label(), "mergeable");
    }

    #[test]
    fn test_state_serialization() {
        for state in MergeRequestState::ALL {
            let json = serde_json::to_value(state).unwrap();
            assert_eq!(json, json!(state.as_str()));
        }
        assert_eq!(MergeRequestState::default(), MergeRequestState::Opened);
        assert!(serde_json::from_value::<MergeRequestState>(json!("draft")).is_err());
    }

    #[test]
    fn test_merge_request_update_skips_absent_fields() {
        let update = MergeRequestUpdate {
            state_event: Some(StateEvent::Close),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"state_event": "close"})
        );
        assert!(MergeRequestUpdate::default().is_empty());
    }

    #[test]
    fn test_issue_labels_as_names_or_objects() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 1, "iid": 2, "project_id": 3,
            "title": "Bug", "description": null, "state": "opened",
            "author": {"id": 1, "username": "bob", "name": "Bob"},
            "labels": ["bug", {"id": 9, "name": "urgent", "color": "#ff0000"}],
            "milestone": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "closed_at": null,
            "web_url": "https://gitlab.example.com/acme/web/-/issues/2"
        }))
        .unwrap();

        let names: Vec<&str> = issue.labels.iter().map(LabelRef::name).collect();
        assert_eq!(names, vec!["bug", "urgent"]);
    }

    #[test]
    fn test_create_issue_labels_are_comma_joined() {
        let options = CreateIssueOptions {
            title: "Crash on start".into(),
            labels: Some(vec!["bug".into(), "p1".into()]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"title": "Crash on start", "labels": "bug,p1"})
        );
    }

    #[test]
    fn test_tree_entry_type() {
        let entry: TreeEntry = serde_json::from_value(json!({
            "id": "a1b2", "name": "src", "type": "tree", "path": "src", "mode": "040000"
        }))
        .unwrap();
        assert_eq!(entry.entry_type, TreeEntryType::Tree);
    }

    #[test]
    fn test_forked_project_flattens_project() {
        let fork: ForkedProject = serde_json::from_value(json!({
            "id": 77, "name": "web", "path_with_namespace": "me/web",
            "web_url": "https://gitlab.example.com/me/web",
            "forked_from_project": {
                "name": "web", "path_with_namespace": "acme/web",
                "web_url": "https://gitlab.example.com/acme/web"
            }
        }))
        .unwrap();
        assert_eq!(fork.project.id, 77);
        assert_eq!(fork.forked_from_project.path_with_namespace, "acme/web");
    }
}
