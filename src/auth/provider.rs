//! Authentication provider trait
//!
//! Defines the seam through which the GitLab client obtains credentials.
//! Only static bearer tokens are supported today.

use crate::error::AuthError;
// async_trait required for dyn-compatibility with Box<dyn AuthProvider>
use async_trait::async_trait;

/// Authentication provider trait
///
/// Implementations provide authentication credentials for GitLab API requests.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get the header to attach to every request
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError>;

    /// Get a description of the auth method (for logging)
    fn auth_type(&self) -> &'static str;
}

/// Authentication header to use with requests
#[derive(Clone)]
pub struct AuthHeader {
    name: &'static str,
    value: String,
}

impl AuthHeader {
    /// `Authorization: Bearer {token}`
    pub fn bearer(token: &str) -> Self {
        Self {
            name: "Authorization",
            value: format!("Bearer {}", token),
        }
    }

    /// Get the header name
    pub fn header_name(&self) -> &'static str {
        self.name
    }

    /// Get the header value
    pub fn header_value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeader")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Box type alias for auth providers
pub type BoxedAuthProvider = Box<dyn AuthProvider>;
