//! `folio-fetch` -- download journal and submission documents.
//!
//! Looks up the record's title and stored CDN URL, then walks the
//! download candidates (CDN, direct-file proxy, REST, legacy REST,
//! optional DOCX fallback) and saves the first document that arrives.
//!
//! # Environment variables
//!
//! | Variable                      | Default                 | Description                          |
//! |-------------------------------|-------------------------|--------------------------------------|
//! | `FOLIO_BACKEND_URL`           | `http://localhost:5000` | Backend origin                       |
//! | `FOLIO_API_TOKEN`             | --                      | Bearer token for backend requests    |
//! | `FOLIO_API_TIMEOUT_SECS`      | `30`                    | Metadata and probe timeout           |
//! | `FOLIO_DOWNLOAD_TIMEOUT_SECS` | `120`                   | Per-candidate transfer timeout       |
//! | `FOLIO_MAX_REDIRECTS`         | `5`                     | Redirects followed per request       |
//! | `FOLIO_MAX_DOWNLOAD_BYTES`    | `268435456`             | Largest accepted document            |
//! | `FOLIO_FALLBACK_DOCX_URL`     | --                      | Generic DOCX served when all fail    |
//! | `FOLIO_DOWNLOAD_DIR`          | `.`                     | Where documents are written          |

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_client::api::{FolioApi, ListQuery};
use folio_core::request::DownloadRequest;
use folio_core::types::{FileKind, ResourceKind};
use folio_download::config::ResolverConfig;
use folio_download::downloader::Downloader;
use folio_download::http::HttpTransport;
use folio_download::notify::LogNotifier;
use folio_download::persist::DirectoryPersister;
use folio_download::resolver::Resolver;
use folio_download::transport::Transport;

#[derive(Parser)]
#[command(name = "folio-fetch", version, about = "Download journal documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download one document.
    Download {
        /// Journal or submission id.
        id: String,
        #[arg(long, default_value = "pdf")]
        kind: FileKind,
        #[arg(long, default_value = "journals")]
        resource: ResourceKind,
        /// Title used for the filename; looked up when omitted.
        #[arg(long)]
        title: Option<String>,
        /// Known public URL to try first; looked up when omitted.
        #[arg(long)]
        hint: Option<String>,
        /// Output directory (overrides `FOLIO_DOWNLOAD_DIR`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List journals or submissions.
    List {
        #[arg(long, default_value = "journals")]
        resource: ResourceKind,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_fetch=info,folio_download=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ResolverConfig::from_env().context("Invalid configuration")?;
    let api = FolioApi::new(
        config.backend_url.clone(),
        config.api_timeout,
        config.token.clone(),
    )
    .context("Failed to build API client")?;

    tracing::debug!(
        backend = %config.backend_url,
        token = ?config.token,
        "Loaded configuration",
    );

    match cli.command {
        Command::Download {
            id,
            kind,
            resource,
            title,
            hint,
            out,
        } => {
            let out_dir = out
                .or_else(|| std::env::var_os("FOLIO_DOWNLOAD_DIR").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            let request = build_request(&api, &id, resource, kind, title, hint).await;
            download(config, out_dir, request).await
        }
        Command::List {
            resource,
            search,
            page,
            limit,
        } => {
            let query = ListQuery {
                search,
                page,
                limit,
            };
            let page = api
                .list_entities(resource, &query)
                .await
                .with_context(|| format!("Failed to list {resource}"))?;

            for doc in &page.items {
                let formats: Vec<&str> = [FileKind::Pdf, FileKind::Docx]
                    .into_iter()
                    .filter(|k| doc.known_url(*k).is_some())
                    .map(FileKind::extension)
                    .collect();
                println!("{}\t{}\t[{}]", doc.id, doc.title, formats.join(","));
            }
            println!(
                "-- page {}/{} ({} total)",
                page.page, page.pages, page.total
            );
            Ok(())
        }
    }
}

/// Fill in title and hint from the backend unless both were given.
///
/// A failed lookup is not fatal: the backend download endpoints only
/// need the id.
async fn build_request(
    api: &FolioApi,
    id: &str,
    resource: ResourceKind,
    kind: FileKind,
    title: Option<String>,
    hint: Option<String>,
) -> DownloadRequest {
    if let (Some(title), Some(hint)) = (&title, &hint) {
        return DownloadRequest::new(id, kind, title.clone())
            .with_resource(resource)
            .with_hint(Some(hint.clone()));
    }

    match api.get_entity(resource, id).await {
        Ok(doc) => {
            let mut request = doc.to_request(resource, kind);
            if let Some(title) = title {
                request.display_title = title;
            }
            if hint.is_some() {
                request = request.with_hint(hint);
            }
            request
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Metadata lookup failed, using backend endpoints only");
            DownloadRequest::new(id, kind, title.unwrap_or_default())
                .with_resource(resource)
                .with_hint(hint)
        }
    }
}

async fn download(
    config: ResolverConfig,
    out_dir: PathBuf,
    request: DownloadRequest,
) -> anyhow::Result<()> {
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&config).context("Failed to build HTTP client")?);
    let resolver = Resolver::new(transport, config);
    let persister = Arc::new(DirectoryPersister::new(out_dir));
    let downloader = Downloader::new(resolver, persister, Arc::new(LogNotifier));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, abandoning download");
            on_signal.cancel();
        }
    });

    let done = downloader
        .download_with_cancel(&request, &cancel)
        .await
        .with_context(|| format!("Download of {} {} failed", request.resource, request.entity_id))?;

    println!("{}", done.path.display());
    Ok(())
}
