//! Local-directory storage backend
//!
//! Serves documents straight out of one configured directory. Only regular
//! files directly under the root are visible; the sanitizer guarantees every
//! resolved path stays inside it.

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::document::{DocumentItem, is_pdf_key, sort_newest_first};
use crate::error::StoreError;
use crate::key::{SafeKey, sanitize_key};
use crate::store::document_store::{DocumentStore, DocumentStream};

const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Filesystem-backed document store rooted at one directory
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    /// Create a store rooted at the given directory. Relative paths resolve
    /// against the working directory at use time.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &SafeKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

#[async_trait]
impl DocumentStore for LocalDirStore {
    async fn list_documents(&self) -> Result<Vec<DocumentItem>, StoreError> {
        let mut entries = fs::read_dir(&self.root).await.map_err(|e| {
            StoreError::Backend(format!(
                "failed to read document directory {}: {e}",
                self.root.display()
            ))
        })?;

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StoreError::Backend(format!("failed to read directory entry: {e}"))
        })? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!(path = %entry.path().display(), "skipping non-utf8 file name");
                continue;
            };

            if !is_pdf_key(&name) {
                continue;
            }

            // Unreadable entries are skipped, not fatal: one broken file must
            // not take the whole listing down.
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(file = %name, "skipping unreadable entry: {e}");
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let last_modified = metadata.modified().ok().map(OffsetDateTime::from);
            items.push(DocumentItem::new(name, metadata.len(), last_modified));
        }

        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn open_document(&self, key: &str) -> Result<DocumentStream, StoreError> {
        let key = sanitize_key(key)?;
        let path = self.document_path(&key);

        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
            _ => StoreError::Backend(format!("failed to open {}: {e}", path.display())),
        })?;

        let metadata = file.metadata().await.map_err(|e| {
            StoreError::Backend(format!("failed to stat {}: {e}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound(key.to_string()));
        }

        let stream = futures_util::stream::try_unfold(file, |mut file| async move {
            let mut buf = BytesMut::with_capacity(STREAM_CHUNK_SIZE);
            let read = file
                .read_buf(&mut buf)
                .await
                .map_err(|e| StoreError::Backend(format!("document read failed: {e}")))?;
            if read == 0 {
                Ok(None)
            } else {
                Ok(Some((buf.freeze(), file)))
            }
        });

        Ok(stream.boxed())
    }
}
