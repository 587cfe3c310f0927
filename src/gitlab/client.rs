//! GitLab API client
//!
//! Provides a typed HTTP client for interacting with the GitLab REST API.
//! This module holds the transport verbs; the per-endpoint operations live in
//! [`super::endpoints`].

use crate::auth::BoxedAuthProvider;
use crate::config::GitLabConfig;
use crate::error::{GitLabError, GitLabResult};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Header carrying the total number of items across all pages
const TOTAL_HEADER: &str = "x-total";

/// One page of a list endpoint
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Value of `X-Total`, when GitLab sent it
    pub total: Option<u64>,
}

/// GitLab API client
pub struct GitLabClient {
    http: Client,
    base_url: String,
    auth: BoxedAuthProvider,
    timeout_secs: u64,
}

impl GitLabClient {
    /// Create a new GitLab client from configuration
    pub fn new(config: &GitLabConfig, auth: BoxedAuthProvider) -> GitLabResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .default_headers(headers)
            .user_agent(format!("mcp-gitlab/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitLabError::Request)?;

        if !config.verify_ssl {
            warn!("TLS certificate verification is disabled for GitLab requests");
        }

        debug!(auth = auth.auth_type(), base_url = %config.api_url(), "Created GitLab client");

        Ok(Self {
            http,
            base_url: config.api_url(),
            auth,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add authentication to a request
    async fn authenticate(&self, request: RequestBuilder) -> GitLabResult<RequestBuilder> {
        let header = self.auth.get_auth_header().await.map_err(|e| {
            warn!(error = %e, "Could not obtain GitLab credentials");
            GitLabError::Unauthorized
        })?;

        Ok(request.header(header.header_name(), header.header_value()))
    }

    /// Send a request once and check its status
    async fn execute(&self, request: RequestBuilder) -> GitLabResult<Response> {
        let request = self.authenticate(request).await?;

        match request.send().await {
            Ok(response) => self.handle_response(response).await,
            Err(e) if e.is_timeout() => {
                warn!(timeout_secs = self.timeout_secs, "GitLab request timed out");
                Err(GitLabError::Timeout {
                    timeout_secs: self.timeout_secs,
                })
            }
            Err(e) => {
                warn!(error = %e, "GitLab request failed");
                Err(GitLabError::Request(e))
            }
        }
    }

    /// Handle API response
    async fn handle_response(&self, response: Response) -> GitLabResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "GitLab returned an error status");

        Err(GitLabError::from_response(
            status.as_u16(),
            &error_message(&body),
        ))
    }

    /// Decode a successful response body into `T`
    async fn decode<T: DeserializeOwned>(response: Response) -> GitLabResult<T> {
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Unexpected response shape from GitLab");
            GitLabError::MalformedResponse(e.to_string())
        })
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> GitLabResult<T> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;
        Self::decode(response).await
    }

    /// Make a GET request against a list endpoint, keeping the `X-Total` count
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get_page<T: DeserializeOwned>(&self, endpoint: &str) -> GitLabResult<Page<T>> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;

        let total = response
            .headers()
            .get(TOTAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let items = Self::decode(response).await?;
        Ok(Page { items, total })
    }

    /// Make a POST request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<T> {
        let request = self.http.post(self.url(endpoint)).json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// Make a POST request without a body, returning whatever GitLab answered
    ///
    /// An empty body becomes `null` and a non-JSON body a JSON string.
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn post_empty(&self, endpoint: &str) -> GitLabResult<Value> {
        let response = self.execute(self.http.post(self.url(endpoint))).await?;
        let bytes = response.bytes().await?;

        Ok(raw_body(&bytes))
    }

    /// Make a PUT request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<T> {
        let request = self.http.put(self.url(endpoint)).json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// URL-encode a project path for use in API endpoints
    pub fn encode_project(project: &str) -> String {
        urlencoding::encode(project).to_string()
    }
}

fn raw_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Pull the human-readable part out of a GitLab error body
///
/// GitLab answers errors with `{"message": ...}` or `{"error": ...}`; the message
/// may itself be an object of field errors. Anything else is returned verbatim.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    match value.get("message").or_else(|| value.get("error")) {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_project() {
        assert_eq!(
            GitLabClient::encode_project("group/project"),
            "group%2Fproject"
        );
        assert_eq!(
            GitLabClient::encode_project("group/subgroup/project"),
            "group%2Fsubgroup%2Fproject"
        );
        assert_eq!(GitLabClient::encode_project("123"), "123");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"404 Project Not Found"}"#),
            "404 Project Not Found"
        );
        assert_eq!(error_message(r#"{"error":"invalid_token"}"#), "invalid_token");
        assert_eq!(
            error_message(r#"{"message":{"title":["can't be blank"]}}"#),
            r#"{"title":["can't be blank"]}"#
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn test_raw_body_passthrough() {
        assert_eq!(raw_body(b""), Value::Null);
        assert_eq!(raw_body(b" \n"), Value::Null);
        assert_eq!(raw_body(br#"{"approved":true}"#)["approved"], true);
        assert_eq!(raw_body(b"Created"), Value::String("Created".into()));
    }
}
