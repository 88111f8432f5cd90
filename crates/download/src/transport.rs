//! Seam between the resolver and the network.

use async_trait::async_trait;

use folio_core::credentials::BearerToken;
use folio_core::outcome::FetchError;

/// Result of an existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Reachable,
    Unreachable(String),
}

/// Network operations the resolver needs.
///
/// [`HttpTransport`](crate::http::HttpTransport) is the production
/// implementation; tests substitute scripted doubles.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Cheap check that `url` can serve a non-empty document.
    async fn probe(&self, url: &str) -> Probe;

    /// Transfer the full body of `url`, attaching `token` as a bearer
    /// credential when given.
    async fn fetch(&self, url: &str, token: Option<&BearerToken>) -> Result<Vec<u8>, FetchError>;
}
