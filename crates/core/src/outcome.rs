//! Attempt errors and the result of a resolver walk.

use crate::candidates::CandidateSource;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single byte transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The transfer exceeded its time budget.
    #[error("Download timed out")]
    Timeout,

    /// The server answered 2xx with nothing in the body.
    #[error("Server returned an empty body")]
    EmptyPayload,

    /// Non-2xx status from the endpoint.
    #[error("Server returned HTTP {status}")]
    ServerError { status: u16 },

    /// Body exceeded the configured size cap.
    #[error("Body exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    /// Redirect chain longer than allowed.
    #[error("Too many redirects")]
    TooManyRedirects,

    /// Connection, DNS, TLS or other transport failure.
    #[error("Network error: {0}")]
    Network(String),
}

/// Why a candidate was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptError {
    /// Existence check said the URL cannot serve the file.
    #[error("Unreachable: {0}")]
    Unreachable(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The single source chosen for a request and the bytes it served.
///
/// Public sources are probed first and then fetched inside the walk,
/// so a success always carries the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub bytes: Vec<u8>,
    pub source_url: String,
    pub source: CandidateSource,
    /// Set when the bytes are the static fallback rather than the
    /// requested document.
    pub degraded: bool,
}

/// Result of walking the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success(ResolvedDocument),
    /// Every candidate failed.
    Failure {
        last_error: Option<AttemptError>,
        attempted_urls: Vec<String>,
    },
    /// The walk was stopped by its cancellation token.
    Cancelled { attempted_urls: Vec<String> },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success(_))
    }

    /// URLs that were actually tried, in order.
    pub fn attempted_urls(&self) -> Vec<&str> {
        match self {
            DownloadOutcome::Success(doc) => vec![doc.source_url.as_str()],
            DownloadOutcome::Failure { attempted_urls, .. }
            | DownloadOutcome::Cancelled { attempted_urls } => {
                attempted_urls.iter().map(String::as_str).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        assert_eq!(
            FetchError::ServerError { status: 502 }.to_string(),
            "Server returned HTTP 502"
        );
        assert_eq!(
            AttemptError::from(FetchError::EmptyPayload).to_string(),
            "Server returned an empty body"
        );
        assert_eq!(
            AttemptError::Unreachable("HTTP 404".into()).to_string(),
            "Unreachable: HTTP 404"
        );
    }

    #[test]
    fn failure_lists_attempts_in_order() {
        let outcome = DownloadOutcome::Failure {
            last_error: Some(FetchError::Timeout.into()),
            attempted_urls: vec!["a".into(), "b".into()],
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.attempted_urls(), vec!["a", "b"]);
    }
}
