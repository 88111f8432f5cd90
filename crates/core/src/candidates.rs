//! Ordered candidate URLs for a download request.
//!
//! Building the list is pure: no network calls, and identical inputs
//! always give an identical, identically ordered list.

use std::fmt;

use crate::request::DownloadRequest;
use crate::types::FileKind;

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// Which priority slot produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// URL supplied with the request (CDN / object storage).
    DirectHint,
    /// URL supplied with the request that points at the backend itself.
    BackendHint,
    /// `{backend}/direct-file/{resource}/{id}.{kind}`
    DirectFile,
    /// `{backend}/api/{resource}/{id}/download/{kind}`
    RestDownload,
    /// `{backend}/api/{resource}/{id}/direct-download/{kind}`
    LegacyDownload,
    /// Configured static document, DOCX only.
    StaticFallback,
}

impl CandidateSource {
    /// Public sources are probed before they are fetched and never see
    /// the credential; backend sources are fetched with it directly.
    pub fn is_public(self) -> bool {
        matches!(self, CandidateSource::DirectHint | CandidateSource::StaticFallback)
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandidateSource::DirectHint => "direct-hint",
            CandidateSource::BackendHint => "backend-hint",
            CandidateSource::DirectFile => "direct-file",
            CandidateSource::RestDownload => "rest-download",
            CandidateSource::LegacyDownload => "legacy-download",
            CandidateSource::StaticFallback => "static-fallback",
        };
        f.write_str(name)
    }
}

/// A single URL to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub source: CandidateSource,
}

impl Candidate {
    /// True for the static fallback: the result is a generic document,
    /// not the one the user asked for.
    pub fn is_degraded(&self) -> bool {
        self.source == CandidateSource::StaticFallback
    }
}

// ---------------------------------------------------------------------------
// CandidateList
// ---------------------------------------------------------------------------

/// Candidates in the order they must be attempted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateList {
    items: Vec<Candidate>,
}

impl CandidateList {
    /// Append unless the URL is already present.
    fn push(&mut self, url: String, source: CandidateSource) {
        if self.items.iter().any(|c| c.url == url) {
            return;
        }
        self.items.push(Candidate { url, source });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.items.iter()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.url.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the candidate list for `request`.
///
/// * `backend_base`       - backend origin, e.g. `https://api.example.org`.
///   A hint under this origin is treated as a backend candidate.
/// * `fallback_docx_url`  - optional static document appended last for
///   DOCX requests only.
pub fn build_candidates(
    request: &DownloadRequest,
    backend_base: &str,
    fallback_docx_url: Option<&str>,
) -> CandidateList {
    let base = backend_base.trim_end_matches('/');
    let resource = request.resource.path_segment();
    let id = urlencoding::encode(request.entity_id.trim());
    let kind = request.file_kind.extension();

    let mut list = CandidateList::default();

    if let Some(hint) = request.direct_url_hint.as_deref().map(str::trim) {
        if !hint.is_empty() {
            let source = if hint.starts_with(&format!("{base}/")) {
                CandidateSource::BackendHint
            } else {
                CandidateSource::DirectHint
            };
            list.push(hint.to_string(), source);
        }
    }

    list.push(
        format!("{base}/direct-file/{resource}/{id}.{kind}"),
        CandidateSource::DirectFile,
    );
    list.push(
        format!("{base}/api/{resource}/{id}/download/{kind}"),
        CandidateSource::RestDownload,
    );
    list.push(
        format!("{base}/api/{resource}/{id}/direct-download/{kind}"),
        CandidateSource::LegacyDownload,
    );

    if request.file_kind == FileKind::Docx {
        if let Some(fallback) = fallback_docx_url.map(str::trim).filter(|u| !u.is_empty()) {
            list.push(fallback.to_string(), CandidateSource::StaticFallback);
        }
    }

    list
}
