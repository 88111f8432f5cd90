//! Saving a resolved document somewhere the user can get at it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use folio_core::outcome::ResolvedDocument;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

/// Final step of a download: save the chosen document under
/// `filename` and return where it ended up. Called exactly once per
/// successful resolution.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn persist(
        &self,
        document: &ResolvedDocument,
        filename: &str,
    ) -> Result<PathBuf, PersistError>;
}

// ---------------------------------------------------------------------------
// DirectoryPersister
// ---------------------------------------------------------------------------

/// Writes documents into a local directory.
///
/// Each write goes to its own uniquely named `.part` file next to the
/// target, which is renamed into place once complete and removed if
/// anything fails. Concurrent saves of the same filename never share a
/// temporary file; the last rename wins.
pub struct DirectoryPersister {
    dir: PathBuf,
}

impl DirectoryPersister {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn write_atomically(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.dir.join(filename);
        let (file, partial) = temp_file(&self.dir, filename)?.into_parts();

        // `partial` deletes the file on drop, so every early return
        // below cleans up after itself.
        let mut file = tokio::fs::File::from_std(file);
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        partial.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}

fn temp_file(dir: &Path, filename: &str) -> std::io::Result<tempfile::NamedTempFile> {
    tempfile::Builder::new()
        .prefix(&format!(".{filename}."))
        .suffix(".part")
        .tempfile_in(dir)
}

#[async_trait]
impl Persister for DirectoryPersister {
    async fn persist(
        &self,
        document: &ResolvedDocument,
        filename: &str,
    ) -> Result<PathBuf, PersistError> {
        let path = self.write_atomically(filename, &document.bytes).await?;

        tracing::info!(
            path = %path.display(),
            source = %document.source,
            bytes = document.bytes.len(),
            degraded = document.degraded,
            "Document saved",
        );
        Ok(path)
    }
}
