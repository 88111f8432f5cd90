//! The value object describing one user-initiated download.

use crate::error::CoreError;
use crate::types::{FileKind, ResourceKind};

/// One download the user asked for.
///
/// Created when the download is requested, consumed by a single
/// resolver walk and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Opaque backend identifier of the journal or submission.
    pub entity_id: String,
    /// Collection the entity lives in.
    pub resource: ResourceKind,
    /// Requested document format.
    pub file_kind: FileKind,
    /// Human-readable title, used to derive the saved filename.
    pub display_title: String,
    /// Pre-known public URL (e.g. a CDN URL stored on the entity).
    pub direct_url_hint: Option<String>,
}

impl DownloadRequest {
    /// Create a journal request with no URL hint.
    pub fn new(
        entity_id: impl Into<String>,
        file_kind: FileKind,
        display_title: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            resource: ResourceKind::Journals,
            file_kind,
            display_title: display_title.into(),
            direct_url_hint: None,
        }
    }

    pub fn with_resource(mut self, resource: ResourceKind) -> Self {
        self.resource = resource;
        self
    }

    /// Attach a direct URL hint. Blank strings are treated as absent.
    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.direct_url_hint = hint.filter(|h| !h.trim().is_empty());
        self
    }

    /// Reject requests the backend could never serve.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.entity_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Entity id must not be empty".to_string(),
            ));
        }
        if let Some(hint) = &self.direct_url_hint {
            if !hint.starts_with("http://") && !hint.starts_with("https://") {
                return Err(CoreError::Validation(format!(
                    "Direct URL hint must start with http:// or https://, got: '{hint}'"
                )));
            }
        }
        Ok(())
    }

    /// Filename the document is saved under: sanitized title plus the
    /// extension of the requested kind.
    ///
    /// A title with no usable characters falls back to
    /// `{resource}_{id}`.
    pub fn filename(&self) -> String {
        let stem = sanitize(&self.display_title);
        let stem = if stem.chars().all(|c| c == '_') {
            format!(
                "{}_{}",
                self.resource.singular(),
                sanitize(&self.entity_id)
            )
        } else {
            stem
        };
        format!("{stem}.{}", self.file_kind.extension())
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_` and
/// lowercase the result.
pub fn sanitize(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn only_safe(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    #[test]
    fn sanitize_strips_unsafe_characters() {
        let s = sanitize("My: Journal/Title?.pdf");
        assert!(only_safe(&s), "unexpected characters in {s}");
        assert_eq!(s, "my__journal_title__pdf");
    }

    #[test]
    fn sanitize_replaces_non_ascii() {
        assert!(only_safe(&sanitize("Ünïcödé – Ærøskøbing")));
    }

    #[test]
    fn filename_uses_title_and_extension() {
        let req = DownloadRequest::new("42", FileKind::Pdf, "Journal Title");
        assert_eq!(req.filename(), "journal_title.pdf");
    }

    #[test]
    fn filename_has_single_extension_separator() {
        let req = DownloadRequest::new("42", FileKind::Docx, "My: Journal/Title?.pdf");
        let name = req.filename();
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert!(only_safe(stem));
        assert_eq!(ext, "docx");
        assert_eq!(name.matches('.').count(), 1);
    }

    #[test]
    fn blank_title_falls_back_to_entity() {
        let req = DownloadRequest::new("abc-1", FileKind::Pdf, "  ???  ")
            .with_resource(ResourceKind::Submissions);
        assert_eq!(req.filename(), "submission_abc_1.pdf");
    }

    #[test]
    fn blank_hint_is_dropped() {
        let req = DownloadRequest::new("1", FileKind::Pdf, "t").with_hint(Some("   ".into()));
        assert_eq!(req.direct_url_hint, None);
    }

    #[test]
    fn validate_rejects_empty_id_and_bad_hint() {
        let empty = DownloadRequest::new(" ", FileKind::Pdf, "t");
        assert_matches!(empty.validate(), Err(CoreError::Validation(_)));

        let bad_hint =
            DownloadRequest::new("1", FileKind::Pdf, "t").with_hint(Some("ftp://x/doc.pdf".into()));
        assert_matches!(bad_hint.validate(), Err(CoreError::Validation(_)));

        let ok = DownloadRequest::new("1", FileKind::Pdf, "t")
            .with_hint(Some("https://cdn.example/doc.pdf".into()));
        assert!(ok.validate().is_ok());
    }
}
