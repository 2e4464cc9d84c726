//! # Contract Access Handlers
//!
//! Public endpoints reached through a contract's access link: read, sign and
//! download. No session is involved; the access token is the credential.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::parse_id;
use crate::pdf::PDF_CONTENT_TYPE;
use crate::services::{AccessedContract, SignatureSubmission};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::extractors::{ClientContext, RequestContext};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignContractRequest {
    pub signature_data: String,
    pub variables: Option<Value>,
}

/// GET /api/contracts/access/:token
pub async fn access_contract(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<Value>> {
    let accessed = state.contracts.access(&token, Utc::now()).await?;
    Ok(Json(json!({ "data": access_payload(accessed)? })))
}

/// POST /api/contracts/access/:token/sign
pub async fn sign_contract(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ClientContext(client): ClientContext,
    context: RequestContext,
    Json(request): Json<SignContractRequest>,
) -> ApiResult<Json<Value>> {
    let signed = state
        .contracts
        .sign(
            &token,
            SignatureSubmission {
                signature_data: request.signature_data,
                variables: request.variables,
            },
            client,
            Utc::now(),
        )
        .await?;

    info!(
        request_id = %context.request_id,
        contract_number = %signed.contract.contract_number,
        "Contract signed through access link"
    );

    Ok(Json(json!({
        "message": "Contract signed successfully",
        "pdfDownloadUrl": signed.pdf_download_url,
        "signedAt": signed.signed_at,
    })))
}

/// GET /api/contracts/download/:id
pub async fn download_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let contract_id = parse_id(&id, "Invalid contract ID")?;
    let document = state.contracts.download(contract_id).await?;

    Ok((
        [
            (CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response())
}

/// Contract fields plus the rendered body, the owner's contact details and
/// the template summary
fn access_payload(accessed: AccessedContract) -> ApiResult<Value> {
    let AccessedContract {
        contract,
        owner,
        template,
        content,
    } = accessed;

    let mut data = serde_json::to_value(&contract).map_err(|_| ApiError::Internal)?;
    if let Some(fields) = data.as_object_mut() {
        fields.insert("content".to_string(), Value::String(content));
        fields.insert(
            "user".to_string(),
            json!({
                "name": owner.name,
                "email": owner.email,
                "phone": owner.phone,
                "trading_account": owner.trading_account,
            }),
        );
        fields.insert(
            "template".to_string(),
            template
                .map(|t| json!({ "name": t.name, "variables": t.variables }))
                .unwrap_or(Value::Null),
        );
    }

    Ok(data)
}
