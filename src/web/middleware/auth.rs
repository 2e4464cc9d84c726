//! # Authentication Middleware
//!
//! Bearer token checks for the session-protected routes. A missing token or
//! an unknown/deactivated user answers 401; a token that fails verification
//! answers 403.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::models::User;
use crate::web::auth::extract_bearer_token;
use crate::web::errors::ApiError;
use crate::web::state::AppState;

const TOKEN_REQUIRED: &str = "Access token required";
const INVALID_TOKEN: &str = "Invalid or expired token";
const UNKNOWN_USER: &str = "Invalid token or user not found";
const ADMIN_REQUIRED: &str = "Admin access required";

/// Validate the session token and load the active user into the request
/// extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::auth_error(TOKEN_REQUIRED))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::auth_error(TOKEN_REQUIRED))?;

    let token = extract_bearer_token(auth_str).map_err(|_| ApiError::auth_error(TOKEN_REQUIRED))?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        warn!(error = %e, "Session token rejected");
        ApiError::authorization_error(INVALID_TOKEN)
    })?;

    let user = state
        .users
        .find_active(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::auth_error(UNKNOWN_USER))?;

    debug!(user_id = %user.id, role = %user.role, "Authenticated request");

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admit only administrators; must run inside [`require_auth`]
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = request
        .extensions()
        .get::<User>()
        .map(User::is_admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(ApiError::authorization_error(ADMIN_REQUIRED));
    }

    Ok(next.run(request).await)
}
