//! Utility functions shared across the application.

mod secret;

pub use secret::SecretString;

use std::fmt::Display;

/// GitLab rejects `per_page` values above this
pub const MAX_PER_PAGE: u32 = 100;

/// Builder for URL query parameters.
///
/// Provides a fluent API for constructing query strings with proper URL encoding.
///
/// # Example
/// ```ignore
/// let query = QueryBuilder::new()
///     .param("scope", "created_by_me")
///     .optional("page", Some(2))
///     .optional("search", None::<&str>)
///     .build();
/// // Returns "?scope=created_by_me&page=2"
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter (always included).
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// Add an optional parameter (only included if Some).
    pub fn optional<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Add `key=true` when the flag is set; omit it otherwise.
    pub fn flag(self, key: &str, enabled: bool) -> Self {
        if enabled { self.param(key, true) } else { self }
    }

    /// Add a `per_page` value clamped to [`MAX_PER_PAGE`].
    pub fn per_page(self, per_page: Option<u32>) -> Self {
        self.optional("per_page", per_page.map(|p| p.min(MAX_PER_PAGE)))
    }

    /// Build the query string.
    ///
    /// Returns an empty string if no parameters were added,
    /// otherwise returns "?key1=value1&key2=value2...".
    pub fn build(self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}
