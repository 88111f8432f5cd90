//! End-to-end download: resolve a source, save it once, tell the user.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use folio_core::candidates::CandidateSource;
use folio_core::error::CoreError;
use folio_core::outcome::{AttemptError, DownloadOutcome};
use folio_core::request::DownloadRequest;

use crate::notify::{Notice, Notifier};
use crate::persist::{PersistError, Persister};
use crate::resolver::Resolver;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    InvalidRequest(#[from] CoreError),

    /// Every candidate failed. The only resolution error shown to users.
    #[error("All {attempts} download candidates failed")]
    Exhausted {
        attempts: usize,
        last_error: Option<AttemptError>,
    },

    #[error("Download cancelled")]
    Cancelled,

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Where the document was written.
    pub path: PathBuf,
    pub source: CandidateSource,
    pub source_url: String,
    /// The saved document is the generic fallback.
    pub degraded: bool,
}

pub struct Downloader {
    resolver: Resolver,
    persister: Arc<dyn Persister>,
    notifier: Arc<dyn Notifier>,
}

impl Downloader {
    pub fn new(
        resolver: Resolver,
        persister: Arc<dyn Persister>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            resolver,
            persister,
            notifier,
        }
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<Completed, DownloadError> {
        self.run(request, None).await
    }

    /// Cancelling stops the resolver walk. A cancelled download raises
    /// no notice.
    pub async fn download_with_cancel(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
    ) -> Result<Completed, DownloadError> {
        self.run(request, Some(cancel)).await
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<Completed, DownloadError> {
        if let Err(e) = request.validate() {
            tracing::warn!(entity_id = %request.entity_id, error = %e, "Rejected download request");
            self.notifier.notify(Notice::DownloadFailed);
            return Err(e.into());
        }

        let outcome = match cancel {
            Some(token) => self.resolver.resolve_with_cancel(request, token).await,
            None => self.resolver.resolve(request).await,
        };

        let document = match outcome {
            DownloadOutcome::Success(document) => document,
            DownloadOutcome::Failure {
                last_error,
                attempted_urls,
            } => {
                self.notifier.notify(Notice::DownloadFailed);
                return Err(DownloadError::Exhausted {
                    attempts: attempted_urls.len(),
                    last_error,
                });
            }
            DownloadOutcome::Cancelled { .. } => return Err(DownloadError::Cancelled),
        };

        let filename = request.filename();
        let path = match self.persister.persist(&document, &filename).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(
                    entity_id = %request.entity_id,
                    filename = %filename,
                    error = %e,
                    "Failed to save resolved document",
                );
                self.notifier.notify(Notice::DownloadFailed);
                return Err(e.into());
            }
        };

        if document.degraded {
            self.notifier.notify(Notice::FallbackDocument {
                requested: request.file_kind,
            });
        }

        Ok(Completed {
            path,
            source: document.source,
            source_url: document.source_url,
            degraded: document.degraded,
        })
    }
}
