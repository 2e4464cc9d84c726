//! # Session Handlers

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::web::errors::{ApiError, ApiResult};
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;

/// Login body; `email` also accepts a username
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    let token = state.authenticator.generate_token(&user).map_err(|e| {
        error!(error = %e, "Failed to issue session token");
        ApiError::Internal
    })?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user,
    })))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "user": user }))
}
