//! # Health Check Handler
//!
//! Database connectivity probe for load balancers and monitoring.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::database::health_check;
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HealthResponse {
    Healthy {
        status: &'static str,
        timestamp: String,
        database: &'static str,
        environment: String,
        version: &'static str,
    },
    Unhealthy {
        status: &'static str,
        timestamp: String,
        database: &'static str,
        error: String,
    },
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Response {
    let timestamp = Utc::now().to_rfc3339();

    match health_check(&state.db_pool).await {
        Ok(true) => (
            StatusCode::OK,
            Json(HealthResponse::Healthy {
                status: "healthy",
                timestamp,
                database: "connected",
                environment: state.environment.to_string(),
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
            .into_response(),
        Ok(false) => unhealthy(timestamp, "Unexpected health check result".to_string()),
        Err(e) => {
            error!(error = %e, "Database health check failed");
            unhealthy(timestamp, e.to_string())
        }
    }
}

fn unhealthy(timestamp: String, error: String) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse::Unhealthy {
            status: "unhealthy",
            timestamp,
            database: "disconnected",
            error,
        }),
    )
        .into_response()
}
