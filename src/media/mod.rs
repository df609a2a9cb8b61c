/// Disk-backed blob store for uploaded cover images
///
/// All blobs live under a single configured namespace so create and update
/// paths address the same storage. Keys are relative paths like
/// "project_images/{uuid}.png" and are what project records persist.

use anyhow::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Namespace directory for project cover images
const IMAGE_NAMESPACE: &str = "project_images";

/// Path-addressed blob store rooted at the configured media directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    /// Base directory for all stored blobs
    media_dir: PathBuf,
}

impl MediaStore {
    /// Create a new store rooted at the given directory
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    /// Store a blob and return its key
    ///
    /// Keys are freshly generated per upload; the original extension is kept
    /// so the file can be served with a sensible content type later.
    pub async fn store(&self, original_filename: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.media_dir.join(IMAGE_NAMESPACE);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            anyhow::anyhow!("Failed to create media directory '{}': {}", dir.display(), e)
        })?;

        let key = match extension(original_filename) {
            Some(ext) => format!("{}/{}.{}", IMAGE_NAMESPACE, Uuid::new_v4(), ext),
            None => format!("{}/{}", IMAGE_NAMESPACE, Uuid::new_v4()),
        };
        let path = self.blob_path(&key)?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write blob '{}': {}", key, e))?;

        tracing::debug!("Stored blob {} ({} bytes)", key, bytes.len());

        Ok(key)
    }

    /// Delete a blob by key
    ///
    /// Missing blobs are a no-op: records may reference images that were
    /// already cleaned up, and delete must still succeed.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted blob {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::anyhow!("Failed to delete blob '{}': {}", key, e)),
        }
    }

    /// Check whether a blob exists under the given key
    pub async fn exists(&self, key: &str) -> bool {
        match self.blob_path(key) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Resolve a key to its on-disk path, rejecting traversal components
    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .split('/')
                .all(|part| !part.is_empty() && part != "." && part != "..");
        if !valid {
            return Err(anyhow::anyhow!("Invalid blob key: '{}'", key));
        }
        Ok(self.media_dir.join(key))
    }
}

/// Extract a usable file extension from an upload's original filename
fn extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|ext| ext.to_str())
}
