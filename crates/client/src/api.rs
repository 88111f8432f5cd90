//! REST client for the publishing backend's metadata endpoints.
//!
//! Wraps `GET /api/{resource}` and `GET /api/{resource}/{id}` using
//! [`reqwest`], attaching the session bearer token when one is set.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;

use folio_core::credentials::BearerToken;
use folio_core::types::ResourceKind;

use crate::models::Document;
use crate::page::{parse_page, parse_single, Page};

/// HTTP client for one backend.
pub struct FolioApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<BearerToken>,
}

/// Filters for a list call. `None` fields are left to backend defaults.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Errors from the metadata API layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was JSON but in no shape we understand.
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

impl FolioApi {
    /// Create a client with its own connection pool.
    ///
    /// * `base_url` - backend origin, e.g. `https://api.example.org`.
    /// * `timeout`  - per-request budget for interactive calls.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        token: Option<BearerToken>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<BearerToken>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Fetch a single journal or submission.
    pub async fn get_entity(
        &self,
        resource: ResourceKind,
        id: &str,
    ) -> Result<Document, ClientError> {
        let url = format!(
            "{}/api/{}/{}",
            self.base_url,
            resource.path_segment(),
            urlencoding::encode(id.trim())
        );
        let body = self.get_json(&url, &[]).await?;
        Ok(parse_single(body)?)
    }

    /// Fetch one page of journals or submissions.
    pub async fn list_entities(
        &self,
        resource: ResourceKind,
        query: &ListQuery,
    ) -> Result<Page<Document>, ClientError> {
        let url = format!("{}/api/{}", self.base_url, resource.path_segment());

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.trim().to_string()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let body = self.get_json(&url, &params).await?;
        let page = parse_page(body)?;
        tracing::debug!(
            resource = %resource,
            count = page.items.len(),
            total = page.total,
            "Listed documents",
        );
        Ok(page)
    }

    // ---- private helpers ----

    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ClientError> {
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token.header_value());
        }

        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClientError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
