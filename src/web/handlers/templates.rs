//! # Template Handlers (admin)

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::CreateTemplate;
use crate::web::errors::ApiResult;
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub category: Option<String>,
    pub content: String,
    pub description: Option<String>,
}

/// GET /api/templates
pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let templates = state.templates.list().await?;
    Ok(Json(json!({ "data": templates })))
}

/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Json(request): Json<CreateTemplateRequest>,
) -> ApiResult<Json<Value>> {
    let template = state
        .templates
        .create(
            CreateTemplate {
                name: request.name,
                content: request.content,
                category: request.category,
                description: request.description,
            },
            admin.id,
        )
        .await?;

    Ok(Json(json!({
        "message": "Template created successfully",
        "data": template,
    })))
}
