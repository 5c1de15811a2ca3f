//! # Paperview Store
//!
//! Interchangeable document storage backends for the paperview gateway:
//!
//! - **Object store**: any S3-compatible endpoint (AWS S3, Cloudflare R2,
//!   MinIO), behind the `s3` feature (on by default)
//! - **Local directory**: regular files directly under one configured root
//! - **In-memory**: for tests and development
//!
//! All backends sit behind the [`DocumentStore`] trait and share one key
//! sanitizer, so a key that would escape the filesystem root is rejected
//! before it reaches any backend.
//!
//! ## Example
//!
//! ```rust,no_run
//! use paperview_store::{DocumentStore, MemoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! store.insert("manual.pdf", b"%PDF-1.7 ...".as_slice());
//!
//! for item in store.list_documents().await? {
//!     println!("{} ({} bytes)", item.name, item.size);
//! }
//!
//! let stream = store.open_document("manual.pdf").await?;
//! # let _ = stream;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod key;
pub mod store;

pub use document::DocumentItem;
pub use error::StoreError;
pub use key::{SafeKey, sanitize_key};
pub use store::{DocumentStore, DocumentStream, LocalDirStore, MemoryStore};

#[cfg(feature = "s3")]
pub use store::{ObjectStoreConfig, ObjectStoreProvider};
