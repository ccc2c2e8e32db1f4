//! Pixhive Storage Library
//!
//! Durable persistence for the upload pipeline: the local filesystem backend
//! (output sink), the collision-resistant filename generator, and the storage
//! adapter that turns an in-flight upload stream into stored renditions and
//! removes them again later.
//!
//! # Filename format
//!
//! Every logical upload gets one generated name, `{md5-hex}.{ext}`. For
//! responsive uploads the size tag is inserted before the extension:
//! `{md5-hex}_lg.{ext}`, `_md`, `_sm`. Filenames must be plain basenames;
//! anything containing a path separator or `..` is rejected by the backend.

pub mod adapter;
pub mod error;
pub mod filename;
pub mod local;

// Re-export commonly used types
pub use adapter::{CleanupPolicy, ImageStorage, IngestOutcome, RemoveOutcome};
pub use error::{StorageError, StorageResult};
pub use local::LocalStorage;
pub use pixhive_core::{StorageBackend, StoredFile};
