//! Image upload handler.

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::multipart::Field,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use futures::Stream;
use pixhive_core::{constants::MAX_FILES_PER_REQUEST, AppError, ErrorMetadata};
use pixhive_storage::{IngestOutcome, StorageError, StorageResult};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct StoredFileResponse {
    pub filename: String,
    pub url: String,
    pub storage: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<StoredFileResponse>,
    /// Client-safe messages for renditions that failed to persist.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Upload a single image.
///
/// Exactly one multipart field must carry the file, under the configured
/// field name. The field's byte stream is handed to the storage adapter,
/// which filters by content type before buffering, decodes, derives
/// renditions, and writes each one.
///
/// Returns 201 with one entry per stored rendition. Renditions that failed
/// to persist are reported alongside, without failing the request, as long
/// as at least one write succeeded.
pub async fn single_upload(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload_field = state.config.upload_field();
    let mut outcome: Option<IngestOutcome> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(upload_field) {
            continue;
        }

        if outcome.is_some() {
            return Err(AppError::BadRequest(format!(
                "At most {} file per request; send exactly one field named '{}'",
                MAX_FILES_PER_REQUEST, upload_field
            ))
            .into());
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::InvalidInput("Upload field is missing a content type".to_string())
            })?;

        outcome = Some(
            state
                .storage
                .ingest(&content_type, field_stream(field))
                .await?,
        );
    }

    let outcome = outcome.ok_or_else(|| {
        AppError::InvalidInput(format!("No file provided in field '{}'", upload_field))
    })?;

    if outcome.stored.is_empty() {
        // Every rendition write failed; surface the first failure.
        let err = outcome
            .failures
            .into_iter()
            .next()
            .map(HttpAppError::from)
            .unwrap_or_else(|| {
                HttpAppError(AppError::Internal("Upload produced no renditions".to_string()))
            });
        return Err(err);
    }

    tracing::info!(
        user_id = %auth.user.id,
        stored = outcome.stored.len(),
        failed = outcome.failures.len(),
        "Upload complete"
    );

    let files = outcome
        .stored
        .iter()
        .map(|record| StoredFileResponse {
            filename: record.filename.clone(),
            url: record.url(),
            storage: record.storage.to_string(),
        })
        .collect();

    let failures = outcome
        .failures
        .into_iter()
        .map(|e| HttpAppError::from(e).0.client_message())
        .collect();

    Ok((StatusCode::CREATED, Json(UploadResponse { files, failures })))
}

/// Adapt a multipart field into the chunk stream the storage adapter
/// ingests. No chunk is pulled until the adapter polls, so the content-type
/// filter runs before any of the body is read.
fn field_stream(field: Field<'_>) -> impl Stream<Item = StorageResult<Bytes>> + Send + '_ {
    futures::stream::try_unfold(field, |mut field| async move {
        match field.chunk().await {
            Ok(Some(chunk)) => Ok(Some((chunk, field))),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::Io(std::io::Error::other(e))),
        }
    })
}
