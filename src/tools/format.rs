//! Human-readable rendering of GitLab objects
//!
//! Merge request listings are returned to the model as markdown-ish text blocks,
//! one per merge request, each terminated by a `---` rule.

use crate::gitlab::{MergeRequest, PipelineSummary, Project};
use chrono::{DateTime, Utc};

/// Badge for the merge request state
pub fn status_icon(state: &str) -> &'static str {
    match state {
        "opened" => "🟢 Open",
        "merged" => "✅ Merged",
        _ => "❌ Closed",
    }
}

/// Badge for the latest pipeline, `⚪` when there is none
pub fn pipeline_icon(pipeline: Option<&PipelineSummary>) -> &'static str {
    match pipeline.map(|p| p.status.as_str()) {
        Some("success") => "✅",
        Some("failed") => "❌",
        Some("running") => "🟡",
        _ => "⚪",
    }
}

/// Render an RFC 3339 timestamp as `M/D/YYYY` in UTC
///
/// Values that do not parse are returned unchanged.
pub fn format_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Utc).format("%-m/%-d/%Y").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// The text block for a single merge request
pub fn format_merge_request(mr: &MergeRequest) -> String {
    let draft = if mr.draft { "📝 Draft" } else { "" };
    let wip = if mr.work_in_progress { "🚧 WIP" } else { "" };

    [
        format!(
            "{} {} **{}**",
            status_icon(&mr.state),
            pipeline_icon(mr.pipeline.as_ref()),
            mr.title
        ),
        format!("Project: {}", mr.project_path()),
        format!("Branch: {} → {}", mr.source_branch, mr.target_branch),
        format!("Author: {} (@{})", mr.author.name, mr.author.username),
        format!("Created: {}", format_date(&mr.created_at)),
        format!("Updated: {}", format_date(&mr.updated_at)),
        format!("URL: {}", mr.web_url),
        format!("Status: {}", mr.merge_status_label()),
        format!("{}{}", draft, wip),
        String::new(),
        "---".to_string(),
    ]
    .join("\n")
}

/// A titled listing of merge requests with its count line
pub fn format_merge_request_list(heading: &str, merge_requests: &[MergeRequest]) -> String {
    let blocks = merge_requests
        .iter()
        .map(format_merge_request)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# {}\n\nFound {} merge request(s):\n\n{}",
        heading,
        merge_requests.len(),
        blocks
    )
}

/// Bullet list of projects, or a fixed message when there are none
pub fn format_project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found".to_string();
    }

    let lines = projects
        .iter()
        .map(|p| format!("- **{}** ({})", p.path_with_namespace, p.web_url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# My Projects\n\nFound {} project(s):\n\n{}",
        projects.len(),
        lines
    )
}
