#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use folio_core::credentials::BearerToken;
use folio_core::outcome::{FetchError, ResolvedDocument};
use folio_download::config::ResolverConfig;
use folio_download::notify::{Notice, Notifier};
use folio_download::persist::{PersistError, Persister};
use folio_download::transport::{Probe, Transport};

pub const BACKEND: &str = "https://api.test";
pub const CDN_PDF: &str = "https://cdn.test/doc.pdf";
pub const FALLBACK_DOCX: &str = "https://static.test/generic.docx";
pub const PUBLIC_BYTES: &[u8] = b"public copy";

pub fn direct_file(id: &str, kind: &str) -> String {
    format!("{BACKEND}/direct-file/journals/{id}.{kind}")
}

pub fn rest_download(id: &str, kind: &str) -> String {
    format!("{BACKEND}/api/journals/{id}/download/{kind}")
}

pub fn legacy_download(id: &str, kind: &str) -> String {
    format!("{BACKEND}/api/journals/{id}/direct-download/{kind}")
}

/// Config pointing at [`BACKEND`], fallback configured.
pub fn test_config() -> ResolverConfig {
    ResolverConfig {
        backend_url: BACKEND.to_string(),
        fallback_docx_url: Some(FALLBACK_DOCX.to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// ScriptedTransport
// ---------------------------------------------------------------------------

/// Canned behaviour for one URL.
#[derive(Debug, Clone)]
pub enum Script {
    /// Probes fine and serves [`PUBLIC_BYTES`].
    Reachable,
    /// Probes fine, then the transfer itself fails.
    ReachableThenFail(FetchError),
    Bytes(Vec<u8>),
    Fail(FetchError),
    /// Never completes.
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Probe(String),
    Fetch { url: String, authorized: bool },
}

impl Call {
    pub fn url(&self) -> &str {
        match self {
            Call::Probe(url) => url,
            Call::Fetch { url, .. } => url,
        }
    }
}

/// Transport answering from a per-URL script. Unscripted URLs are
/// unreachable on probe and 404 on fetch.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, script: Script) -> Self {
        self.scripts.insert(url.into(), script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.url().to_string()).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn probe(&self, url: &str) -> Probe {
        self.calls.lock().unwrap().push(Call::Probe(url.to_string()));
        match self.scripts.get(url) {
            Some(Script::Reachable)
            | Some(Script::ReachableThenFail(_))
            | Some(Script::Bytes(_)) => Probe::Reachable,
            Some(Script::Hang) => std::future::pending().await,
            _ => Probe::Unreachable("HTTP 404".to_string()),
        }
    }

    async fn fetch(&self, url: &str, token: Option<&BearerToken>) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(Call::Fetch {
            url: url.to_string(),
            authorized: token.is_some(),
        });
        match self.scripts.get(url).cloned() {
            Some(Script::Bytes(bytes)) => Ok(bytes),
            Some(Script::Fail(e)) | Some(Script::ReachableThenFail(e)) => Err(e),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Reachable) => Ok(PUBLIC_BYTES.to_vec()),
            None => Err(FetchError::ServerError { status: 404 }),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingPersister / RecordingNotifier
// ---------------------------------------------------------------------------

/// In-memory stand-in for the browser save flow.
#[derive(Default)]
pub struct RecordingPersister {
    saves: Mutex<Vec<(ResolvedDocument, String)>>,
    fail: bool,
}

impl RecordingPersister {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saves(&self) -> Vec<(ResolvedDocument, String)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl Persister for RecordingPersister {
    async fn persist(
        &self,
        document: &ResolvedDocument,
        filename: &str,
    ) -> Result<PathBuf, PersistError> {
        self.saves
            .lock()
            .unwrap()
            .push((document.clone(), filename.to_string()));
        if self.fail {
            return Err(PersistError::Io(std::io::Error::other("disk full")));
        }
        Ok(PathBuf::from(filename))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Shared handles so tests can inspect doubles after handing them to a
/// `Downloader`.
pub struct Doubles {
    pub transport: Arc<ScriptedTransport>,
    pub persister: Arc<RecordingPersister>,
    pub notifier: Arc<RecordingNotifier>,
}

// ---------------------------------------------------------------------------
// In-process HTTP server
// ---------------------------------------------------------------------------

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
