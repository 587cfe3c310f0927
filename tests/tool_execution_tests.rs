//! Tool execution integration tests
//!
//! Tests individual tools with mocked GitLab API responses.

use mcp_gitlab::auth::BearerTokenProvider;
use mcp_gitlab::config::GitLabConfig;
use mcp_gitlab::error::ToolError;
use mcp_gitlab::gitlab::GitLabClient;
use mcp_gitlab::tools::{ToolContext, ToolOutput, ToolRegistry, definitions};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test GitLab client
fn create_test_gitlab(mock_server: &MockServer) -> Arc<GitLabClient> {
    let config = GitLabConfig::new(mock_server.uri(), "test-token");
    let auth = BearerTokenProvider::new("test-token").unwrap();
    Arc::new(GitLabClient::new(&config, Box::new(auth)).unwrap())
}

/// Create a tool context for testing
fn create_test_context(gitlab: Arc<GitLabClient>) -> ToolContext {
    ToolContext::new(gitlab, "test-request-123")
}

/// Create a registry with all tools
fn create_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    definitions::register_all_tools(&mut registry);
    registry
}

async fn run(mock_server: &MockServer, tool: &str, args: Value) -> ToolOutput {
    let ctx = create_test_context(create_test_gitlab(mock_server));
    create_registry().execute(tool, &ctx, args).await.unwrap()
}

fn merge_request_json(iid: u64, title: &str) -> Value {
    json!({
        "id": 1000 + iid,
        "iid": iid,
        "project_id": 42,
        "title": title,
        "description": null,
        "state": "opened",
        "author": {"id": 3, "username": "alice", "name": "Alice Doe"},
        "source_branch": "feature/login",
        "target_branch": "main",
        "web_url": format!("https://gitlab.example.com/acme/web/-/merge_requests/{}", iid),
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-02T10:00:00Z",
        "merged_at": null,
        "closed_at": null,
        "project": {"id": 42, "name": "web", "path_with_namespace": "acme/web"},
        "detailed_merge_status": "mergeable",
        "draft": false,
        "work_in_progress": false
    })
}

fn user_json(id: u64) -> Value {
    json!({"id": id, "username": "alice", "name": "Alice Doe", "state": "active"})
}

// ============================================================================
// get-my-merge-requests
// ============================================================================

#[tokio::test]
async fn test_my_merge_requests_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .and(query_param("state", "merged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-my-merge-requests", json!({"state": "merged"})).await;

    assert!(!output.is_error);
    assert_eq!(
        output.text_content(),
        "No merge requests found with state: merged"
    );
}

#[tokio::test]
async fn test_my_merge_requests_lists_each_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .and(query_param("scope", "created_by_me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            merge_request_json(1, "First change"),
            merge_request_json(2, "Second change"),
            merge_request_json(3, "Third change")
        ])))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-my-merge-requests", json!({})).await;
    let text = output.text_content();

    assert!(!output.is_error);
    assert!(text.starts_with("# My Merge Requests (opened)\n\nFound 3 merge request(s):\n\n"));
    assert_eq!(text.matches("\n---").count(), 3);
    assert!(text.contains("🟢 Open ⚪ **Second change**"));
    assert!(text.contains("Project: acme/web"));
    assert!(text.contains("Branch: feature/login → main"));
    assert!(text.contains("Created: 3/1/2024"));
}

#[tokio::test]
async fn test_draft_merge_request_block() {
    let mock_server = MockServer::start().await;

    let mut mr = merge_request_json(1, "Draft: new login");
    mr["draft"] = json!(true);

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([mr])))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-my-merge-requests", json!({})).await;
    let text = output.text_content();
    let block = text.split("\n\n").skip(2).collect::<Vec<_>>().join("\n\n");

    assert!(block.starts_with("🟢 Open ⚪ **Draft: new login**"));
    assert!(block.contains("📝 Draft"));
    assert!(!block.contains("🚧 WIP"));
}

#[tokio::test]
async fn test_my_merge_requests_error_is_flagged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-my-merge-requests", json!({})).await;
    let text = output.text_content();

    assert!(output.is_error);
    assert!(text.starts_with("Error fetching merge requests: Failed to get merge requests"));
    assert!(text.contains("boom"));
}

#[rstest]
#[case("opened")]
#[case("closed")]
#[case("merged")]
#[case("all")]
#[tokio::test]
async fn test_state_is_forwarded(#[case] state: &str) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .and(query_param("state", state))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-my-merge-requests", json!({"state": state})).await;

    assert_eq!(
        output.text_content(),
        format!("No merge requests found with state: {}", state)
    );
}

#[rstest]
#[case(json!({}))]
#[case(json!({"state": null}))]
#[case(json!({"state": "opened"}))]
#[tokio::test]
async fn test_omitted_state_means_opened(#[case] args: Value) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .and(query_param("state", "opened"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-my-merge-requests", args).await;

    assert_eq!(
        output.text_content(),
        "No merge requests found with state: opened"
    );
}

#[tokio::test]
async fn test_invalid_state_is_rejected() {
    let mock_server = MockServer::start().await;
    let ctx = create_test_context(create_test_gitlab(&mock_server));

    let result = create_registry()
        .execute("get-my-merge-requests", &ctx, json!({"state": "draft"}))
        .await;

    assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
}

// ============================================================================
// get-merge-requests-for-review
// ============================================================================

#[tokio::test]
async fn test_review_uses_current_user_as_reviewer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(42)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .and(query_param("reviewer_id", "42"))
        .and(query_param("state", "opened"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([merge_request_json(9, "Review me")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-merge-requests-for-review", json!({})).await;
    let text = output.text_content();

    assert!(!output.is_error);
    assert!(text.starts_with("# Merge Requests for Review (opened)\n\nFound 1 merge request(s):"));
    assert!(text.contains("**Review me**"));
}

#[tokio::test]
async fn test_review_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(42)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/merge_requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "get-merge-requests-for-review",
        json!({"state": "closed"}),
    )
    .await;

    assert_eq!(
        output.text_content(),
        "No merge requests found for review with state: closed"
    );
}

#[tokio::test]
async fn test_review_identity_failure_is_flagged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-merge-requests-for-review", json!({})).await;

    assert!(output.is_error);
    assert!(output.text_content().starts_with(
        "Error fetching merge requests for review: Failed to get merge requests for review"
    ));
}

// ============================================================================
// get-current-user
// ============================================================================

#[tokio::test]
async fn test_current_user_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "username": "alice",
            "name": "Alice Doe",
            "state": "active",
            "is_admin": false
        })))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-current-user", json!({})).await;

    assert!(!output.is_error);
    assert_eq!(
        output.text_content(),
        r#"# Current User

Found Alice Doe (alice) : {"id":7,"username":"alice","name":"Alice Doe","state":"active"}"#
    );
}

#[tokio::test]
async fn test_current_user_error_is_flagged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-current-user", json!({})).await;

    assert!(output.is_error);
    assert!(output
        .text_content()
        .starts_with("Error fetching current user: Failed to get current user"));
}

// ============================================================================
// Other tools
// ============================================================================

#[tokio::test]
async fn test_get_merge_request_has_block_and_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/acme%2Fweb/merge_requests/4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(merge_request_json(4, "Single one")),
        )
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "get-merge-request",
        json!({"project_id": "acme/web", "merge_request_iid": 4}),
    )
    .await;
    let text = output.text_content();

    assert!(text.starts_with("🟢 Open ⚪ **Single one**"));
    assert!(text.contains("---\n\n{"));
    assert!(text.contains("\"iid\": 4"));
}

#[tokio::test]
async fn test_get_merge_request_not_found_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/acme%2Fweb/merge_requests/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let ctx = create_test_context(create_test_gitlab(&mock_server));
    let result = create_registry()
        .execute(
            "get-merge-request",
            &ctx,
            json!({"project_id": "acme/web", "merge_request_iid": 4}),
        )
        .await;

    match result {
        Err(ToolError::Operation(e)) => assert!(e.is_not_found()),
        other => panic!("Expected operation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_merge_request_requires_a_change() {
    let mock_server = MockServer::start().await;
    let ctx = create_test_context(create_test_gitlab(&mock_server));

    let result = create_registry()
        .execute(
            "update-merge-request",
            &ctx,
            json!({"project_id": "acme/web", "merge_request_iid": 4}),
        )
        .await;

    assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
}

#[tokio::test]
async fn test_approve_merge_request_returns_raw_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/merge_requests/3/approve"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "approved": true,
            "approved_by": [{"user": {"id": 7, "username": "alice"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "approve-merge-request",
        json!({"project_id": "42", "merge_request_iid": 3}),
    )
    .await;

    let value: Value = serde_json::from_str(&output.text_content()).unwrap();
    assert_eq!(value["approved"], true);
}

#[tokio::test]
async fn test_unapprove_merge_request_with_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/merge_requests/7/unapprove"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "unapprove-merge-request",
        json!({"project_id": "42", "merge_request_iid": 7}),
    )
    .await;

    assert!(!output.is_error);
    assert_eq!(output.text_content(), "null");
}

#[tokio::test]
async fn test_get_projects_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("membership", "true"))
        .and(query_param("order_by", "last_activity_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "web", "path_with_namespace": "acme/web",
             "web_url": "https://gitlab.example.com/acme/web"},
            {"id": 2, "name": "api", "path_with_namespace": "acme/api",
             "web_url": "https://gitlab.example.com/acme/api"}
        ])))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-projects", json!({})).await;

    assert_eq!(
        output.text_content(),
        "# My Projects\n\nFound 2 project(s):\n\n\
         - **acme/web** (https://gitlab.example.com/acme/web)\n\
         - **acme/api** (https://gitlab.example.com/acme/api)"
    );
}

#[tokio::test]
async fn test_get_projects_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let output = run(&mock_server, "get-projects", json!({})).await;
    assert_eq!(output.text_content(), "No projects found");
}

#[tokio::test]
async fn test_create_issue_sends_comma_joined_labels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/acme%2Fweb/issues"))
        .and(body_json(json!({
            "title": "Crash on start",
            "labels": "bug,p1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 100, "iid": 12, "project_id": 42,
            "title": "Crash on start", "description": null, "state": "opened",
            "author": {"id": 7, "username": "alice", "name": "Alice Doe"},
            "labels": ["bug", "p1"],
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z",
            "web_url": "https://gitlab.example.com/acme/web/-/issues/12"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "create-issue",
        json!({"project_id": "acme/web", "title": "Crash on start", "labels": ["bug", "p1"]}),
    )
    .await;

    let value: Value = serde_json::from_str(&output.text_content()).unwrap();
    assert_eq!(value["iid"], 12);
}

#[tokio::test]
async fn test_create_repository() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects"))
        .and(body_json(json!({"name": "demo", "visibility": "private"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 88, "name": "demo", "path_with_namespace": "alice/demo",
            "web_url": "https://gitlab.example.com/alice/demo"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "create-repository",
        json!({"name": "demo", "visibility": "private"}),
    )
    .await;

    let value: Value = serde_json::from_str(&output.text_content()).unwrap();
    assert_eq!(value["path_with_namespace"], "alice/demo");
}

#[tokio::test]
async fn test_create_merge_request_omits_unset_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/acme%2Fweb/merge_requests"))
        .and(body_json(json!({
            "title": "Add login",
            "source_branch": "feature/login",
            "target_branch": "main",
            "draft": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(merge_request_json(7, "Add login")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = run(
        &mock_server,
        "create-merge-request",
        json!({
            "project_id": "acme/web",
            "title": "Add login",
            "source_branch": "feature/login",
            "target_branch": "main",
            "draft": true
        }),
    )
    .await;

    assert!(!output.is_error);
    let value: Value = serde_json::from_str(&output.text_content()).unwrap();
    assert_eq!(value["iid"], 7);
}

#[tokio::test]
async fn test_unknown_tool() {
    let mock_server = MockServer::start().await;
    let ctx = create_test_context(create_test_gitlab(&mock_server));

    let result = create_registry()
        .execute("delete-everything", &ctx, json!({}))
        .await;

    assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "delete-everything"));
}
