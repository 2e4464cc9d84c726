use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::services::dashboard_stats;
use crate::web::errors::ApiResult;
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;

/// GET /api/stats/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    let stats = dashboard_stats(&state.db_pool, &user).await?;
    Ok(Json(json!({ "data": stats })))
}
