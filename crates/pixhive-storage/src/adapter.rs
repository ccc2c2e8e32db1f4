//! Storage adapter: the ingestion and deletion entrypoints.
//!
//! [`ImageStorage`] intercepts an in-flight upload stream, buffers it to
//! completion, decodes it, derives renditions through the transform engine,
//! and fans each rendition out into an independent write against the local
//! backend. Deletion reconstructs every path belonging to one logical upload
//! and unlinks each independently.

use crate::error::{StorageError, StorageResult};
use crate::filename;
use crate::local::LocalStorage;
use bytes::Bytes;
use futures::{future, Stream, StreamExt};
use pixhive_core::StoredFile;
use pixhive_processing::{
    compute_renditions, encode_rendition, RenditionTag, UploadFilter, UploadOptions,
};
use serde_json::Value;
use std::path::PathBuf;

/// What to do with already-flushed siblings when one rendition fails to
/// persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Keep flushed renditions and report failures per rendition.
    #[default]
    Keep,
    /// Delete flushed siblings and fail the whole ingestion.
    Rollback,
}

/// Per-rendition results of one ingestion.
///
/// Renditions persist independently: a failed write never cancels or rolls
/// back a sibling under [`CleanupPolicy::Keep`], so both lists can be
/// non-empty at once.
#[derive(Debug)]
pub struct IngestOutcome {
    pub stored: Vec<StoredFile>,
    pub failures: Vec<StorageError>,
}

impl IngestOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-path results of one removal.
#[derive(Debug, Default)]
pub struct RemoveOutcome {
    /// Filenames actually unlinked.
    pub deleted: Vec<String>,
    /// One error per path that could not be unlinked (including not-found).
    pub failures: Vec<StorageError>,
}

/// Storage adapter for image ingestion.
///
/// The resolved configuration and derived paths are fixed at construction
/// and read-only thereafter, so one instance is safe to share across
/// concurrent uploads without locking. Collisions between concurrent uploads
/// are avoided only by the filename generator's randomness.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    options: UploadOptions,
    filter: UploadFilter,
    backend: LocalStorage,
    cleanup: CleanupPolicy,
}

impl ImageStorage {
    /// Create an adapter from raw (unvalidated) upload options.
    ///
    /// Options are resolved once; when `responsive` is enabled both the
    /// destination directory and the base URL gain a `responsive` segment.
    /// The destination tree is created here, not per upload.
    pub async fn new(
        raw_options: Option<&Value>,
        base_dir: impl Into<PathBuf>,
        base_url: &str,
        allowed_content_types: Vec<String>,
    ) -> StorageResult<Self> {
        let options = UploadOptions::resolve(raw_options);

        let base_dir = base_dir.into();
        let (upload_path, upload_base_url) = if options.responsive {
            (
                base_dir.join("responsive"),
                format!("{}/responsive", base_url.trim_end_matches('/')),
            )
        } else {
            (base_dir, base_url.trim_end_matches('/').to_string())
        };

        let backend = LocalStorage::new(upload_path, upload_base_url).await?;

        Ok(Self {
            options,
            filter: UploadFilter::new(allowed_content_types),
            backend,
            cleanup: CleanupPolicy::default(),
        })
    }

    /// Override the partial-failure policy (defaults to [`CleanupPolicy::Keep`]).
    pub fn with_cleanup_policy(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// The resolved, immutable upload configuration.
    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// The stored-file record a given filename would have in this adapter's
    /// destination.
    pub fn record_for(&self, filename: &str) -> StoredFile {
        self.backend.record_for(filename)
    }

    /// Check whether a rendition exists in the destination.
    pub async fn exists(&self, filename: &str) -> StorageResult<bool> {
        self.backend.exists(filename).await
    }

    /// Ingest one upload field.
    ///
    /// The declared content type is checked against the allow-list before a
    /// single byte is buffered. The stream is then buffered to completion,
    /// decoded (a decode failure aborts before any filesystem write), and
    /// every rendition is encoded and written through its own sink. Sink
    /// completions are independent; see [`CleanupPolicy`] for what happens
    /// to flushed siblings when one write fails.
    pub async fn ingest<S>(&self, content_type: &str, stream: S) -> StorageResult<IngestOutcome>
    where
        S: Stream<Item = StorageResult<Bytes>> + Send,
    {
        self.filter.check(content_type)?;

        let buffer = buffer_stream(stream).await?;

        let image = image::load_from_memory(&buffer)
            .map_err(|e| StorageError::Decode(e.to_string()))?;

        tracing::debug!(
            size_bytes = buffer.len(),
            content_type = %content_type,
            "Upload buffered and decoded"
        );

        let renditions = compute_renditions(&image, &self.options);
        let upload_filename = filename::generate(self.options.output);

        let writes = renditions.into_iter().map(|(tag, rendition)| {
            let name = filename::for_rendition(&upload_filename, tag);
            let backend = self.backend.clone();
            let output = self.options.output;
            let quality = self.options.quality;
            async move {
                let data = encode_rendition(&rendition, output, quality).map_err(|e| {
                    StorageError::Encode {
                        filename: name.clone(),
                        message: e.to_string(),
                    }
                })?;
                backend.write(&name, &data).await
            }
        });

        let mut outcome = IngestOutcome {
            stored: Vec::new(),
            failures: Vec::new(),
        };
        for result in future::join_all(writes).await {
            match result {
                Ok(record) => outcome.stored.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Rendition write failed");
                    outcome.failures.push(e);
                }
            }
        }

        if self.cleanup == CleanupPolicy::Rollback && !outcome.is_complete() {
            for record in &outcome.stored {
                if let Err(e) = self.backend.delete(&record.filename).await {
                    tracing::warn!(
                        filename = %record.filename,
                        error = %e,
                        "Failed to roll back flushed rendition"
                    );
                }
            }
            return Err(outcome.failures.remove(0));
        }

        Ok(outcome)
    }

    /// Remove every rendition belonging to the logical upload behind one
    /// stored-file record.
    ///
    /// Non-responsive uploads have exactly one path. For responsive uploads
    /// the record's filename is parsed as `<stem>_<size>.<ext>` and all three
    /// sibling paths are reconstructed, even if the record only referenced
    /// one. A filename that does not match the pattern deletes nothing: the
    /// outcome carries zero deletions so callers can tell this apart from a
    /// successful removal.
    pub async fn remove(&self, record: &StoredFile) -> RemoveOutcome {
        if !self.options.responsive {
            return self.unlink_each(std::iter::once(record.filename.clone())).await;
        }

        let Some((stem, ext)) = filename::split_responsive(&record.filename) else {
            tracing::warn!(
                filename = %record.filename,
                "Responsive filename does not match <stem>_<size>.<ext>; nothing deleted"
            );
            return RemoveOutcome::default();
        };

        let names = RenditionTag::responsive_sizes().into_iter().map(|tag| {
            // responsive_sizes() suffixes are always present
            format!("{}_{}.{}", stem, tag.suffix().unwrap_or_default(), ext)
        });
        self.unlink_each(names).await
    }

    /// Remove exactly the renditions named by a persisted set of records,
    /// without any pattern-based reconstruction. Intended for callers that
    /// stored the full record list returned by [`ImageStorage::ingest`].
    pub async fn remove_all(&self, records: &[StoredFile]) -> RemoveOutcome {
        self.unlink_each(records.iter().map(|r| r.filename.clone())).await
    }

    /// Unlink each path independently; a failure for one path never aborts
    /// deletion of the others.
    async fn unlink_each(&self, names: impl Iterator<Item = String>) -> RemoveOutcome {
        let mut outcome = RemoveOutcome::default();
        for name in names {
            match self.backend.delete(&name).await {
                Ok(()) => outcome.deleted.push(name),
                Err(e) => {
                    tracing::warn!(filename = %name, error = %e, "Rendition delete failed");
                    outcome.failures.push(e);
                }
            }
        }
        outcome
    }
}

/// Buffer the whole upload into memory. There is no streaming decode path;
/// the full file must be resident before decoding.
async fn buffer_stream<S>(stream: S) -> StorageResult<Vec<u8>>
where
    S: Stream<Item = StorageResult<Bytes>> + Send,
{
    futures::pin_mut!(stream);
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}
