//! Bearer-token authentication middleware.
//!
//! Verifies the token's signature and expiry, loads the user behind it,
//! requires an enabled account with the standard user role, and checks the
//! presented token against the one persisted at signin. Issuing a new token
//! therefore revokes every earlier one for that account.

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pixhive_core::{AppError, UserRole, UserStatus};
use std::sync::Arc;

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token,
        Err(e) => return HttpAppError(e).into_response(),
    };

    let auth_user = match authenticate(&state, &token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Authentication failed");
            return HttpAppError(e).into_response();
        }
    };

    request.extensions_mut().insert(auth_user);
    next.run(request).await
}

fn bearer_token(request: &Request) -> Result<String, AppError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must be a Bearer token".to_string())
        })
}

async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let claims = state.jwt.verify(token)?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

    if user.status != UserStatus::Enabled {
        return Err(AppError::Unauthorized("Account is not active".to_string()));
    }

    // Only the standard user role may use token-authenticated endpoints.
    if user.role != UserRole::User {
        return Err(AppError::Unauthorized(
            "Account role is not permitted".to_string(),
        ));
    }

    // Only the most recently issued token is valid.
    if user.access_token.as_deref() != Some(token) {
        return Err(AppError::Unauthorized("Token has been revoked".to_string()));
    }

    Ok(AuthUser { user })
}
