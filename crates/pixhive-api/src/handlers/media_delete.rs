//! Media deletion handler.

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use pixhive_core::{AppError, ErrorMetadata};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Delete every stored rendition belonging to one uploaded image.
///
/// For responsive uploads the sibling renditions are reconstructed from the
/// filename's size tag, so deleting any one variant removes all three.
/// Responds 404 when nothing was deleted, whether the file is missing or
/// the filename does not match any stored rendition.
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.storage.record_for(&filename);
    let outcome = state.storage.remove(&record).await;

    if outcome.deleted.is_empty() {
        return Err(match outcome.failures.into_iter().next() {
            Some(e) => HttpAppError::from(e),
            None => HttpAppError(AppError::NotFound(format!(
                "No stored renditions match {}",
                filename
            ))),
        });
    }

    tracing::info!(
        user_id = %auth.user.id,
        filename = %filename,
        deleted = outcome.deleted.len(),
        failed = outcome.failures.len(),
        "Media deleted"
    );

    let failures = outcome
        .failures
        .into_iter()
        .map(|e| HttpAppError::from(e).0.client_message())
        .collect();

    Ok(Json(DeleteResponse {
        deleted: outcome.deleted,
        failures,
    }))
}
