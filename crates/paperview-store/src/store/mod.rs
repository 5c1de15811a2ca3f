//! Storage provider implementations
//!
//! One capability trait, three providers: an S3-compatible object store, a
//! local directory, and an in-memory map for tests and development. The
//! backend is chosen once at process start; nothing outside the construction
//! point branches on the selection.

pub mod document_store;
pub mod local_dir;

pub use document_store::{DocumentStore, DocumentStream, MemoryStore};
pub use local_dir::LocalDirStore;

#[cfg(feature = "s3")]
pub mod object_store;

#[cfg(feature = "s3")]
pub use object_store::{ObjectStoreConfig, ObjectStoreProvider};
