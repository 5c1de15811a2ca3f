//! Document storage capability trait and in-memory implementation
//!
//! The trait is the only surface the gateway sees; providers differ in where
//! bytes live, never in contract. The in-memory provider backs tests and
//! development setups.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use std::collections::HashMap;
use std::sync::Mutex;
use time::OffsetDateTime;

use crate::document::{DocumentItem, is_pdf_key, sort_newest_first};
use crate::error::StoreError;
use crate::key::sanitize_key;

/// Lazily-consumed document body. Providers hand chunks out as they arrive
/// so the gateway never buffers a whole document.
pub type DocumentStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// Abstraction over interchangeable document backends
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List PDF documents, newest first. An empty but reachable backend
    /// yields `Ok(vec![])`; an unreachable one yields `StoreError::Backend`.
    async fn list_documents(&self) -> Result<Vec<DocumentItem>, StoreError>;

    /// Open a byte stream for one document. The key is sanitized before any
    /// backend access; rejection surfaces as `InvalidKey`.
    async fn open_document(&self, key: &str) -> Result<DocumentStream, StoreError>;
}

#[derive(Debug, Clone)]
struct StoredDocument {
    data: Bytes,
    last_modified: Option<OffsetDateTime>,
}

/// In-memory storage implementation for testing and development
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a document without a modification time.
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.insert_with_modified(key, data, None);
    }

    /// Insert a document with a fixed modification time.
    pub fn insert_with_modified(
        &self,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        last_modified: Option<OffsetDateTime>,
    ) {
        let mut documents = self.documents.lock().unwrap();
        documents.insert(
            key.into(),
            StoredDocument {
                data: data.into(),
                last_modified,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.documents.lock().unwrap().clear();
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self) -> Result<Vec<DocumentItem>, StoreError> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;

        let mut items: Vec<DocumentItem> = documents
            .iter()
            .filter(|(key, _)| is_pdf_key(key))
            .map(|(key, doc)| DocumentItem::new(key.clone(), doc.data.len() as u64, doc.last_modified))
            .collect();

        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn open_document(&self, key: &str) -> Result<DocumentStream, StoreError> {
        let key = sanitize_key(key)?;

        let documents = self
            .documents
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;

        let document = documents
            .get(key.as_str())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        let data = document.data.clone();
        Ok(futures_util::stream::once(async move { Ok(data) }).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use time::macros::datetime;

    async fn collect(stream: DocumentStream) -> Vec<u8> {
        stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn lists_only_pdfs_newest_first() {
        let store = MemoryStore::new();
        store.insert_with_modified(
            "older.pdf",
            b"%PDF-old".as_slice(),
            Some(datetime!(2024-01-01 00:00 UTC)),
        );
        store.insert_with_modified(
            "newer.pdf",
            b"%PDF-new".as_slice(),
            Some(datetime!(2025-01-01 00:00 UTC)),
        );
        store.insert("undated.pdf", b"%PDF-undated".as_slice());
        store.insert("notes.txt", b"not a pdf".as_slice());

        let items = store.list_documents().await.unwrap();
        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["newer.pdf", "older.pdf", "undated.pdf"]);
    }

    #[tokio::test]
    async fn empty_store_lists_empty() {
        let store = MemoryStore::new();
        assert!(store.list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_returns_document_bytes() {
        let store = MemoryStore::new();
        store.insert("manual.pdf", b"%PDF-1.7 body".as_slice());

        let stream = store.open_document("manual.pdf").await.unwrap();
        assert_eq!(collect(stream).await, b"%PDF-1.7 body");
    }

    #[tokio::test]
    async fn open_missing_key_is_not_found() {
        let store = MemoryStore::new();
        match store.open_document("nope.pdf").await {
            Err(StoreError::NotFound(key)) => assert_eq!(key, "nope.pdf"),
            Err(other) => panic!("expected NotFound, got {other:?}"),
            Ok(_) => panic!("expected NotFound, got Ok(document stream)"),
        }
    }

    #[tokio::test]
    async fn open_rejects_unsafe_keys() {
        let store = MemoryStore::new();
        store.insert("manual.pdf", b"%PDF".as_slice());

        for raw in ["../manual.pdf", "dir/manual.pdf", "..", ""] {
            assert!(
                matches!(
                    store.open_document(raw).await,
                    Err(StoreError::InvalidKey(_))
                ),
                "expected InvalidKey for {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn every_listed_key_opens() {
        let store = MemoryStore::new();
        store.insert("a.pdf", b"%PDF-a".as_slice());
        store.insert("b.pdf", b"%PDF-b".as_slice());

        for item in store.list_documents().await.unwrap() {
            assert!(store.open_document(&item.key).await.is_ok());
        }
    }
}
