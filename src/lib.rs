//! GitLab MCP Server
//!
//! A Model Context Protocol server that lets an assistant query and act on GitLab.
//!
//! ## Features
//!
//! - **Merge request tools**: your own merge requests, merge requests awaiting your
//!   review, and single merge request lookup, approval and updates
//! - **Repository tools**: file contents, commits, branches, trees, projects and forks
//! - **Typed client**: every GitLab response is decoded into a defined shape, and
//!   failures carry the operation that produced them
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Example Configuration
//!
//! ```toml
//! [gitlab]
//! url = "https://gitlab.com"
//! # token from GITLAB_TOKEN env var
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod server;
pub mod tools;
pub mod transport;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use server::GitLabMcpHandler;
