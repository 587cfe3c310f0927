//! MCP server
//!
//! Wires the tool registry and GitLab client into an rmcp `ServerHandler`.

mod handler;

pub use handler::GitLabMcpHandler;
