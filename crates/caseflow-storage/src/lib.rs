use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// On-disk blob storage.
///
/// Each upload is stored as a single flat file at `{dir}/{file_id}`. Callers
/// only ever see the id, wrapped in an opaque `/files/{id}` reference; what
/// the blob means (case cover, work file, profile photo) is not this layer's
/// concern.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Blob storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    fn blob_path(&self, file_id: &str) -> PathBuf {
        self.dir.join(file_id)
    }

    /// Write a blob and return its SHA-256 checksum.
    pub async fn save(&self, file_id: &str, data: &[u8]) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let checksum = hex::encode(hasher.finalize());

        fs::write(self.blob_path(file_id), data).await?;
        Ok(checksum)
    }

    /// Open a stored blob for streaming. `None` if it was never stored.
    pub async fn open(&self, file_id: &str) -> Result<Option<fs::File>> {
        match fs::File::open(self.blob_path(file_id)).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
