//! Authentication module
//!
//! Provides authentication for GitLab API access. The configured token is sent
//! as `Authorization: Bearer {token}` on every request.

pub mod provider;
pub mod token;

pub use provider::{AuthHeader, AuthProvider, BoxedAuthProvider};
pub use token::BearerTokenProvider;

use crate::config::GitLabConfig;
use crate::error::AuthError;

/// Create an auth provider from configuration
pub fn create_auth_provider(config: &GitLabConfig) -> Result<BoxedAuthProvider, AuthError> {
    if let Some(token) = &config.token {
        Ok(Box::new(BearerTokenProvider::new(token.expose_secret())?))
    } else {
        Ok(Box::new(BearerTokenProvider::from_env()?))
    }
}
