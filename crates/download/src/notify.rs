//! User-facing notices.
//!
//! Only two things ever reach the user: a single failure notice once
//! every candidate is exhausted, and a warning that the saved document
//! is the generic fallback rather than the requested one.

use folio_core::types::FileKind;

pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DownloadFailed,
    FallbackDocument { requested: FileKind },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::DownloadFailed => DOWNLOAD_FAILED_MESSAGE.to_string(),
            Notice::FallbackDocument { requested } => format!(
                "The requested {} is unavailable. A generic fallback document was downloaded instead.",
                requested.extension().to_uppercase()
            ),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Emits notices through `tracing`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::DownloadFailed => tracing::error!("{}", notice.message()),
            Notice::FallbackDocument { .. } => tracing::warn!("{}", notice.message()),
        }
    }
}
