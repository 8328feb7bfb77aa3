//
//  bitbucket-provider
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for Bitbucket API
//!
//! This module provides the core HTTP client the reconcilers use to talk to
//! Bitbucket Cloud. It handles authentication, request/response
//! serialization, error-body decoding and cursor pagination.
//!
//! ## Features
//!
//! - Authentication header injection (app password or bearer token)
//! - JSON serialization/deserialization, tolerant of empty bodies
//! - Error-message extraction from heterogeneous error shapes
//! - `next`-cursor pagination traversal
//! - Custom User-Agent header

use std::collections::HashSet;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::common::{ApiError, PaginatedResponse};
use crate::auth::AuthCredential;

/// Default Bitbucket Cloud API root.
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/2.0";

/// Error body returned when an OAuth token lacks the scopes an endpoint needs.
#[derive(Deserialize)]
struct ScopeErrorBody {
    error: ScopeError,
}

#[derive(Deserialize)]
struct ScopeError {
    #[serde(default)]
    message: String,
    detail: ScopeDetail,
}

#[derive(Deserialize)]
struct ScopeDetail {
    required: Vec<String>,
    #[serde(default)]
    granted: Vec<String>,
}

/// Extracts a human-readable message from a Bitbucket error body.
///
/// Bitbucket answers failures with several different shapes. They are tried
/// from most to least specific:
///
/// 1. Scope errors: `{"error": {"message": "..", "detail": {"required": [..], "granted": [..]}}}`
///    render as `"<message> Required: [..] Granted: [..]"`
/// 2. Cloud errors: `{"type": "error", "error": {"message": ".."}}`
/// 3. `{"error": {"detail": ".."}}`, `{"errors": [{"message": ".."}]}` and `{"message": ".."}`
/// 4. Anything else is returned verbatim
///
/// # Example
///
/// ```rust
/// use bitbucket_provider::api::client::extract_error_message;
///
/// let body = r#"{"type": "error", "error": {"message": "Bad request"}}"#;
/// assert_eq!(extract_error_message(body), "Bad request");
/// assert_eq!(extract_error_message("<html>502</html>"), "<html>502</html>");
/// ```
pub fn extract_error_message(body: &str) -> String {
    if let Ok(scope) = serde_json::from_str::<ScopeErrorBody>(body) {
        return format!(
            "{} Required: {:?} Granted: {:?}",
            scope.error.message, scope.error.detail.required, scope.error.detail.granted
        );
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        // Cloud format: {"type": "error", "error": {"message": "..."}}
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        // Alternative Cloud format: {"error": {"detail": "..."}}
        if let Some(detail) = json
            .get("error")
            .and_then(|e| e.get("detail"))
            .and_then(|m| m.as_str())
        {
            return detail.to_string();
        }

        // {"errors": [{"message": "..."}]}
        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    body.to_string()
}

/// Builds an API path from raw segments, percent-encoding each one.
///
/// User-supplied identifiers (workspace slugs, branch names, `{uuid}` values)
/// can contain characters that are not valid in a path segment; Bitbucket
/// expects them encoded. An empty trailing segment yields a trailing slash.
///
/// # Example
///
/// ```rust
/// use bitbucket_provider::api::client::api_path;
///
/// assert_eq!(
///     api_path(&["repositories", "acme", "widgets", "hooks", "{1234}"]),
///     "/repositories/acme/widgets/hooks/%7B1234%7D"
/// );
/// assert_eq!(api_path(&["a", "b", ""]), "/a/b/");
/// ```
pub fn api_path(segments: &[&str]) -> String {
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return format!("/{}", segments.join("/")),
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// The HTTP client for the Bitbucket Cloud REST API.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_provider::api::BitbucketClient;
/// use bitbucket_provider::auth::AuthCredential;
///
/// let client = BitbucketClient::cloud()?
///     .with_auth(AuthCredential::app_password("me", "app-password"));
/// # Ok::<(), bitbucket_provider::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// API root, without a trailing slash
    base_url: String,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl BitbucketClient {
    /// Creates a new client configured for Bitbucket Cloud.
    pub fn cloud() -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("bbp/{}", crate::VERSION))
                .build()?,
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: None,
        })
    }

    /// Points the client at a different API root.
    ///
    /// Used by tests against a mock server and for API proxies. A trailing
    /// slash is stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns the API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a path against the base URL. Absolute URLs (pagination
    /// cursors) are used unchanged.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Sends a request, turning any status of 400 or above into an [`ApiError`].
    async fn send(&self, mut request: RequestBuilder) -> Result<Response, ApiError> {
        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            debug!("Error response ({}): {}", status, text);
            return Err(ApiError::from_response(status, &text));
        }

        Ok(response)
    }

    /// Decodes a success body. An empty body (e.g. `204 No Content`) decodes
    /// as JSON `null`, so callers can ask for `()`, `Option<T>` or
    /// `serde_json::Value`.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        debug!("Response ({}): {}", status, text);

        if text.trim().is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_str("null")?);
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Makes an HTTP GET request to the specified path (or absolute URL).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The network request fails
    /// - The response status is not successful (2xx)
    /// - The response body cannot be deserialized to type `T`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.url(path))).await?;
        Self::decode(response).await
    }

    /// Like [`get`](Self::get), but a 404 yields `Ok(None)`.
    ///
    /// This is the shape every Read reconciler wants: a missing remote object
    /// is dropped from state rather than reported as a failure.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Collects every item of a paginated collection.
    ///
    /// Follows the absolute `next` URL of each page until it is absent or
    /// empty, or until it points back at a page already fetched. There is no
    /// retry: the first failing page aborts the traversal.
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut values = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(path.to_string());

        while let Some(url) = next {
            if !visited.insert(self.url(&url)) {
                warn!("Pagination loops back to {}, stopping", url);
                break;
            }
            let page: PaginatedResponse<T> = self.get(&url).await?;
            next = page.next_url().map(str::to_string);
            values.extend(page.values);
        }

        Ok(values)
    }

    /// Makes an HTTP POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::decode(response).await
    }

    /// Makes an HTTP PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.put(self.url(path)).json(body)).await?;
        Self::decode(response).await
    }

    /// Makes an HTTP PUT request without a body, discarding the response.
    pub async fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.http.put(self.url(path))).await?;
        Ok(())
    }

    /// Makes an HTTP DELETE request.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }
}
