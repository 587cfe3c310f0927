//! Tool definitions
//!
//! This module contains all GitLab MCP tool implementations.

pub mod branches;
pub mod issues;
pub mod merge_requests;
pub mod projects;
pub mod repository;
pub mod users;

use crate::tools::ToolRegistry;

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut ToolRegistry) {
    merge_requests::register(registry);
    users::register(registry);
    projects::register(registry);
    repository::register(registry);
    branches::register(registry);
    issues::register(registry);
}
