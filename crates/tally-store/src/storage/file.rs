//! # File Storage
//!
//! One JSON file per key in a data directory.
//!
//! ## Write Path
//! ```text
//! write("sales-storage", json)
//!      │
//!      ▼
//! <dir>/sales-storage.json.tmp   ← full document written + flushed
//!      │
//!      ▼  rename (atomic on the same filesystem)
//! <dir>/sales-storage.json
//! ```
//! A crash before the rename leaves the previous document in place.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::DocumentStorage;
use crate::error::{StoreError, StoreResult};

/// Documents stored as `<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` as the data directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file a key is stored in.
    ///
    /// Keys become file names, so anything that could escape the directory
    /// is rejected.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StoreError::Internal(format!(
                "storage key '{key}' must contain only letters, numbers, hyphens, and underscores"
            )));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl DocumentStorage for FileStorage {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path).await {
            Ok(document) => {
                debug!(path = %path.display(), "Read document");
                Ok(Some(document))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, key: &str, document: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir).await?;

        if let Err(err) = write_then_rename(&tmp, &path, document).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(err.into());
        }

        debug!(path = %path.display(), bytes = document.len(), "Wrote document");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

async fn write_then_rename(tmp: &Path, path: &Path, document: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(document.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp, path).await
}

// =============================================================================
// Unit Tests
// =============================================================================
