//! # User Handlers (admin)

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::CreateUser;
use crate::web::errors::ApiResult;
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub trading_account: Option<String>,
    pub username: Option<String>,
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let users = state.users.list().await?;
    Ok(Json(json!({ "data": users })))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<Json<Value>> {
    let created = state
        .users
        .create(
            CreateUser {
                name: request.name,
                email: request.email,
                phone: request.phone,
                trading_account: request.trading_account,
                username: request.username,
            },
            admin.id,
        )
        .await?;

    Ok(Json(json!({
        "message": "User created successfully",
        "data": created.user,
        "defaultPassword": created.default_password,
    })))
}
