//! Walks the candidate list until one source yields a document.
//!
//! The walk is strictly sequential: candidate `i + 1` is only touched
//! after candidate `i` failed, and the first success ends the walk.
//! Individual failures are logged here and folded into a single
//! [`DownloadOutcome::Failure`] once the list is exhausted.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use folio_core::candidates::{build_candidates, Candidate, CandidateList};
use folio_core::outcome::{AttemptError, DownloadOutcome, FetchError, ResolvedDocument};
use folio_core::request::DownloadRequest;

use crate::config::ResolverConfig;
use crate::transport::{Probe, Transport};

/// Position of a walk over the candidate list.
#[derive(Debug)]
enum State {
    Idle,
    Probing(usize),
    Fetching(usize),
    Succeeded(ResolvedDocument),
    Exhausted,
}

pub struct Resolver {
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(transport: Arc<dyn Transport>, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    /// Candidate list this resolver would walk for `request`.
    pub fn candidates(&self, request: &DownloadRequest) -> CandidateList {
        build_candidates(
            request,
            &self.config.backend_url,
            self.config.fallback_docx_url.as_deref(),
        )
    }

    /// Walk every candidate to completion.
    pub async fn resolve(&self, request: &DownloadRequest) -> DownloadOutcome {
        self.walk(request, None).await
    }

    /// Like [`resolve`](Self::resolve) but abandons the in-flight probe
    /// or fetch as soon as `cancel` fires.
    pub async fn resolve_with_cancel(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        self.walk(request, Some(cancel)).await
    }

    async fn walk(
        &self,
        request: &DownloadRequest,
        cancel: Option<&CancellationToken>,
    ) -> DownloadOutcome {
        let candidates = self.candidates(request);
        let mut attempted: Vec<String> = Vec::with_capacity(candidates.len());
        let mut last_error: Option<AttemptError> = None;
        let mut state = State::Idle;

        loop {
            state = match state {
                State::Idle => State::Probing(0),

                State::Probing(i) => match candidates.get(i) {
                    None => State::Exhausted,
                    Some(candidate) => {
                        attempted.push(candidate.url.clone());

                        // Backend endpoints answer with a clear status, so
                        // the fetch doubles as the probe.
                        if !candidate.source.is_public() {
                            State::Fetching(i)
                        } else {
                            match guarded(cancel, self.transport.probe(&candidate.url)).await {
                                None => return cancelled(request, attempted),
                                Some(Probe::Reachable) => State::Fetching(i),
                                Some(Probe::Unreachable(reason)) => {
                                    let err = AttemptError::Unreachable(reason);
                                    log_attempt_failure(i, candidate, &err);
                                    last_error = Some(err);
                                    State::Probing(i + 1)
                                }
                            }
                        }
                    }
                },

                State::Fetching(i) => match candidates.get(i) {
                    None => State::Exhausted,
                    Some(candidate) => {
                        let token = if candidate.source.is_public() {
                            None
                        } else {
                            self.config.token.as_ref()
                        };
                        let result =
                            guarded(cancel, self.transport.fetch(&candidate.url, token)).await;

                        match result {
                            None => return cancelled(request, attempted),
                            Some(Ok(bytes)) if !bytes.is_empty() => {
                                State::Succeeded(resolved(candidate, bytes))
                            }
                            Some(Ok(_)) => {
                                let err = AttemptError::Fetch(FetchError::EmptyPayload);
                                log_attempt_failure(i, candidate, &err);
                                last_error = Some(err);
                                State::Probing(i + 1)
                            }
                            Some(Err(e)) => {
                                let err = AttemptError::Fetch(e);
                                log_attempt_failure(i, candidate, &err);
                                last_error = Some(err);
                                State::Probing(i + 1)
                            }
                        }
                    }
                },

                State::Succeeded(document) => {
                    tracing::info!(
                        entity_id = %request.entity_id,
                        source = %document.source,
                        url = %document.source_url,
                        attempts = attempted.len(),
                        degraded = document.degraded,
                        "Resolved download source",
                    );
                    return DownloadOutcome::Success(document);
                }

                State::Exhausted => {
                    tracing::error!(
                        entity_id = %request.entity_id,
                        kind = %request.file_kind,
                        attempts = attempted.len(),
                        last_error = ?last_error,
                        "All download candidates failed",
                    );
                    return DownloadOutcome::Failure {
                        last_error,
                        attempted_urls: attempted,
                    };
                }
            };
        }
    }
}

/// Await `fut`, or return `None` if `cancel` fires first.
async fn guarded<F: Future>(cancel: Option<&CancellationToken>, fut: F) -> Option<F::Output> {
    match cancel {
        None => Some(fut.await),
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => None,
            out = fut => Some(out),
        },
    }
}

fn resolved(candidate: &Candidate, bytes: Vec<u8>) -> ResolvedDocument {
    ResolvedDocument {
        bytes,
        source_url: candidate.url.clone(),
        source: candidate.source,
        degraded: candidate.is_degraded(),
    }
}

fn cancelled(request: &DownloadRequest, attempted: Vec<String>) -> DownloadOutcome {
    tracing::info!(
        entity_id = %request.entity_id,
        attempts = attempted.len(),
        "Download resolution cancelled",
    );
    DownloadOutcome::Cancelled {
        attempted_urls: attempted,
    }
}

fn log_attempt_failure(index: usize, candidate: &Candidate, err: &AttemptError) {
    tracing::warn!(
        candidate = index + 1,
        source = %candidate.source,
        url = %candidate.url,
        error = %err,
        "Download candidate failed, trying next",
    );
}
