//! Configuration module
//!
//! Handles loading and validating configuration from TOML files and environment variables.

pub mod loader;
pub mod types;

pub use loader::{GITLAB_TOKEN_ENV, GITLAB_URL_ENV, load_config, load_config_from_str};
pub use types::*;
