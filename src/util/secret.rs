//! Redacted wrapper for the GitLab token.

use serde::Deserialize;
use std::fmt;

/// The GitLab token as loaded from configuration.
///
/// `Debug` prints `[REDACTED]`, so the token stays out of logged config and
/// `tracing` fields. Reading it takes an explicit `expose_secret()`.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Only the auth provider calls this, when building the `Authorization` header.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}
