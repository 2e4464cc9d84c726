//! # Contract Management Handlers
//!
//! Session-protected listing plus the admin-only create and link endpoints.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_id;
use crate::services::CreateContract;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;

const MISSING_FIELDS: &str = "Missing required fields";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateContractRequest {
    pub title: Option<String>,
    pub template_id: Option<String>,
    pub user_id: Option<String>,
    /// Number or numeric string
    pub amount: Option<Value>,
    pub variables: Option<Value>,
    pub content: Option<String>,
    #[serde(alias = "expiryDate")]
    pub expires_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub send_immediately: bool,
}

impl CreateContractRequest {
    fn into_create_contract(self) -> ApiResult<CreateContract> {
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;
        let template_id = self
            .template_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;
        let user_id = self
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;
        let amount = self
            .amount
            .filter(|amount| !amount.is_null())
            .ok_or_else(|| ApiError::bad_request(MISSING_FIELDS))?;

        Ok(CreateContract {
            title,
            template_id: parse_id(&template_id, "Invalid template ID")?,
            user_id: parse_id(&user_id, "Invalid user ID")?,
            amount: parse_amount(&amount)?,
            variables: self.variables,
            content: self.content,
            expires_at: self.expires_at,
            admin_notes: self.admin_notes,
            send_immediately: self.send_immediately,
        })
    }
}

fn parse_amount(amount: &Value) -> ApiResult<f64> {
    let parsed = match amount {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::bad_request("Amount must be a number"))
}

/// GET /api/contracts
pub async fn list_contracts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    let contracts = state.contracts.list(&user).await?;
    Ok(Json(json!({ "data": contracts })))
}

/// POST /api/contracts
pub async fn create_contract(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Json(request): Json<CreateContractRequest>,
) -> ApiResult<Json<Value>> {
    let created = state
        .contracts
        .create(request.into_create_contract()?, admin.id)
        .await?;

    Ok(Json(json!({
        "message": "Contract created successfully",
        "data": created.contract,
        "accessLink": created.access_link,
    })))
}

/// POST /api/contracts/:id/generate-link
pub async fn generate_link(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let contract_id = parse_id(&id, "Invalid contract ID")?;
    let link = state.contracts.generate_link(contract_id, admin.id).await?;

    Ok(Json(json!({
        "message": "Contract link generated successfully",
        "accessLink": link.access_link,
        "token": link.token,
        "status": link.status,
    })))
}
