//! Signup and signin handlers.

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use pixhive_core::models::UserResponse;
use pixhive_core::{AppError, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    /// Optional; accounts without a password sign in with email alone.
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// Create a new account.
///
/// Email is the only required field. When a password is supplied it is
/// hashed before the user is persisted; the plaintext never leaves this
/// function.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let email = body.email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()).into());
    }

    let password_hash = match body.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(state.passwords.hash(password)?),
        None => None,
    };

    let user = state
        .users
        .create(User::new(email.to_string(), password_hash))
        .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange email (and password, if the account has one) for an access
/// token. The issued token is persisted so it supersedes any earlier one.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<SigninRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let email = body.email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()).into());
    }

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(hash) = &user.password_hash {
        let presented = body.password.as_deref().unwrap_or_default();
        if !state.passwords.verify(presented, hash)? {
            return Err(AppError::BadRequest("Invalid password".to_string()).into());
        }
    }

    let token = state.jwt.issue(&user)?;
    let user = state.users.set_access_token(user.id, token.clone()).await?;

    tracing::info!(user_id = %user.id, "User signed in");

    Ok(Json(SigninResponse {
        access_token: token,
        user: UserResponse::from(user),
    }))
}
