//! Credential issuance handlers.

use crate::auth::models::AuthUser;
use crate::auth::Credentials;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use pixhive_core::constants::{TEST_CLIENT_ID, TEST_SECRET_KEY};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct CredentialsResponse {
    pub client_id: String,
    pub secret_key: String,
}

/// Generate and persist a fresh credential pair for the authenticated user.
/// Previously issued credentials stop being the ones on record.
pub async fn get_keys(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let creds = Credentials::generate();
    state
        .users
        .set_credentials(auth.user.id, creds.client_id.clone(), creds.secret_key.clone())
        .await?;

    tracing::info!(user_id = %auth.user.id, "Issued new API credentials");

    Ok(Json(CredentialsResponse {
        client_id: creds.client_id,
        secret_key: creds.secret_key,
    }))
}

/// Fixed sandbox credentials, served without authentication.
pub async fn test_keys() -> impl IntoResponse {
    Json(CredentialsResponse {
        client_id: TEST_CLIENT_ID.to_string(),
        secret_key: TEST_SECRET_KEY.to_string(),
    })
}
