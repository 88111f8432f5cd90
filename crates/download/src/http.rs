//! [`Transport`] backed by [`reqwest`].
//!
//! Two clients are kept: a short-budget one for probes and a
//! long-budget one for document transfers, so a slow download never
//! eats into the time allowed for interactive calls.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, RANGE};
use reqwest::{redirect, Client, Response, StatusCode};

use folio_core::credentials::BearerToken;
use folio_core::outcome::FetchError;

use crate::config::ResolverConfig;
use crate::transport::{Probe, Transport};

pub struct HttpTransport {
    probe_client: Client,
    download_client: Client,
    max_download_bytes: u64,
}

impl HttpTransport {
    /// Build both clients from the resolver configuration.
    pub fn new(config: &ResolverConfig) -> Result<Self, reqwest::Error> {
        let probe_client = Client::builder()
            .timeout(config.api_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;
        let download_client = Client::builder()
            .timeout(config.download_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            probe_client,
            download_client,
            max_download_bytes: config.max_download_bytes,
        })
    }

    /// Fallback probe for servers that refuse `HEAD`: ask for the first
    /// byte only.
    async fn probe_with_range(&self, url: &str) -> Probe {
        match self
            .probe_client
            .get(url)
            .header(RANGE, "bytes=0-0")
            .send()
            .await
        {
            Ok(response) => match response.status() {
                StatusCode::OK | StatusCode::PARTIAL_CONTENT => classify_probe(&response),
                status => Probe::Unreachable(format!("HTTP {}", status.as_u16())),
            },
            Err(e) => Probe::Unreachable(map_error(e).to_string()),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, url: &str) -> Probe {
        let response = match self.probe_client.head(url).send().await {
            Ok(r) => r,
            Err(e) => return Probe::Unreachable(map_error(e).to_string()),
        };

        match response.status() {
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
                tracing::debug!(url, "HEAD not supported, probing with a ranged GET");
                self.probe_with_range(url).await
            }
            status if status.is_success() => classify_probe(&response),
            status => Probe::Unreachable(format!("HTTP {}", status.as_u16())),
        }
    }

    async fn fetch(&self, url: &str, token: Option<&BearerToken>) -> Result<Vec<u8>, FetchError> {
        let mut request = self.download_client.get(url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.header_value());
        }

        let mut response = request.send().await.map_err(map_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
            });
        }

        let limit = self.max_download_bytes;
        if declared_length(&response).is_some_and(|len| len > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_error)? {
            if (body.len() + chunk.len()) as u64 > limit {
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(FetchError::EmptyPayload);
        }

        tracing::debug!(url, bytes = body.len(), "Fetched document body");
        Ok(body)
    }
}

/// `Content-Length` as sent by the server. Read from the header because
/// the body of a `HEAD` response is always empty.
fn declared_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn classify_probe(response: &Response) -> Probe {
    match declared_length(response) {
        Some(0) => Probe::Unreachable("empty document".to_string()),
        _ => Probe::Reachable,
    }
}

fn map_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_redirect() {
        FetchError::TooManyRedirects
    } else {
        FetchError::Network(e.to_string())
    }
}
