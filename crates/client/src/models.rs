//! Metadata records returned by the backend.

use serde::{Deserialize, Deserializer};

use folio_core::request::DownloadRequest;
use folio_core::types::{FileKind, ResourceKind};

/// A journal or submission as far as downloads are concerned.
///
/// Unknown fields are ignored; only what is needed to pick a URL hint
/// and a filename is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub docx_url: Option<String>,
    /// Object-storage URL of the uploaded manuscript, any format.
    #[serde(default)]
    pub cloudinary_url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

impl Document {
    /// Stored public URL for `kind`, if the record has one.
    ///
    /// A kind-specific field wins; otherwise a generic storage URL is
    /// used only when its path ends in the right extension.
    pub fn known_url(&self, kind: FileKind) -> Option<String> {
        let specific = match kind {
            FileKind::Pdf => &self.pdf_url,
            FileKind::Docx => &self.docx_url,
        };

        non_blank(specific).or_else(|| {
            [&self.cloudinary_url, &self.file_url]
                .into_iter()
                .filter_map(non_blank)
                .find(|url| has_extension(url, kind.extension()))
        })
    }

    /// Build the download request for this record.
    pub fn to_request(&self, resource: ResourceKind, kind: FileKind) -> DownloadRequest {
        DownloadRequest::new(self.id.clone(), kind, self.title.clone())
            .with_resource(resource)
            .with_hint(self.known_url(kind))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn has_extension(url: &str, ext: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
