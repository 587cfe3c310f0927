//! GitLab API module
//!
//! Provides a typed client for interacting with the GitLab REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GitLabClient, Page};
pub use endpoints::{DEFAULT_REF, TreeOptions};
pub use types::*;
