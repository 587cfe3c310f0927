//! Static bearer token authentication
//!
//! Forwards a GitLab personal, project or group access token as a bearer token.

use crate::auth::provider::{AuthHeader, AuthProvider};
use crate::config::GITLAB_TOKEN_ENV;
use crate::error::AuthError;
use crate::util::SecretString;
use async_trait::async_trait;

/// Bearer token authentication provider
#[derive(Debug, Clone)]
pub struct BearerTokenProvider {
    token: SecretString,
}

impl BearerTokenProvider {
    /// Create a new provider; blank tokens are rejected
    pub fn new(token: impl Into<String>) -> Result<Self, AuthError> {
        let token = SecretString::new(token);

        if token.is_blank() {
            return Err(AuthError::InvalidToken);
        }

        Ok(Self { token })
    }

    /// Create from the `GITLAB_TOKEN` environment variable
    pub fn from_env() -> Result<Self, AuthError> {
        match std::env::var(GITLAB_TOKEN_ENV) {
            Ok(token) if !token.is_empty() => Self::new(token),
            _ => Err(AuthError::NotConfigured),
        }
    }
}

#[async_trait]
impl AuthProvider for BearerTokenProvider {
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError> {
        Ok(AuthHeader::bearer(self.token.expose_secret()))
    }

    fn auth_type(&self) -> &'static str {
        "Bearer token"
    }
}
