//! Small enums shared by requests, URL building and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// FileKind
// ---------------------------------------------------------------------------

/// Document format a user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    /// Extension without the leading dot; also the path segment the
    /// backend expects (`/download/pdf`).
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "docx" => Ok(FileKind::Docx),
            _ => Err(CoreError::UnknownVariant {
                kind: "file kind",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// Backend collection a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Journals,
    Submissions,
}

impl ResourceKind {
    /// Plural path segment used in every backend route.
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::Journals => "journals",
            ResourceKind::Submissions => "submissions",
        }
    }

    /// Singular form, used for wrapped detail responses and filenames.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Journals => "journal",
            ResourceKind::Submissions => "submission",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "journals" | "journal" => Ok(ResourceKind::Journals),
            "submissions" | "submission" => Ok(ResourceKind::Submissions),
            _ => Err(CoreError::UnknownVariant {
                kind: "resource",
                value: s.to_string(),
            }),
        }
    }
}
