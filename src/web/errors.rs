//! # Web API Errors
//!
//! HTTP error type with status code mappings. Every error renders as
//! `{"error": {"code": ..., "message": ...}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::KontrakError;
use crate::pdf::PdfError;
use crate::state_machine::StateMachineError;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The resource existed but is no longer available
    #[error("Gone: {message}")]
    Gone { message: String },

    #[error("Too many requests")]
    TooManyRequests { retry_after_seconds: u64 },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Database operation failed: {operation}")]
    DatabaseError { operation: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationError { reason: String },

    #[error("Authorization failed: {reason}")]
    AuthorizationError { reason: String },

    #[error("Invalid UUID format: {uuid}")]
    InvalidUuid { uuid: String },

    #[error("Failed to generate document")]
    DocumentError,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn gone(message: impl Into<String>) -> Self {
        Self::Gone {
            message: message.into(),
        }
    }

    pub fn database_error(operation: impl Into<String>) -> Self {
        Self::DatabaseError {
            operation: operation.into(),
        }
    }

    pub fn auth_error(reason: impl Into<String>) -> Self {
        Self::AuthenticationError {
            reason: reason.into(),
        }
    }

    pub fn authorization_error(reason: impl Into<String>) -> Self {
        Self::AuthorizationError {
            reason: reason.into(),
        }
    }

    pub fn invalid_uuid(uuid: impl Into<String>) -> Self {
        Self::InvalidUuid { uuid: uuid.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } | Self::InvalidUuid { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Gone { .. } => StatusCode::GONE,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::AuthenticationError { .. } => StatusCode::UNAUTHORIZED,
            Self::AuthorizationError { .. } => StatusCode::FORBIDDEN,
            Self::DatabaseError { .. } | Self::DocumentError | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Conflict { .. } => "CONFLICT",
            Self::Gone { .. } => "GONE",
            Self::TooManyRequests { .. } => "RATE_LIMITED",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::DatabaseError { .. } => "DATABASE_ERROR",
            Self::AuthenticationError { .. } => "AUTHENTICATION_FAILED",
            Self::AuthorizationError { .. } => "AUTHORIZATION_FAILED",
            Self::InvalidUuid { .. } => "INVALID_UUID",
            Self::DocumentError => "DOCUMENT_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::BadRequest { message }
            | Self::Conflict { message }
            | Self::Gone { message }
            | Self::ServiceUnavailable { message } => message.clone(),
            Self::TooManyRequests { .. } => {
                "Too many requests from this IP, please try again later.".to_string()
            }
            Self::DatabaseError { operation } => operation.clone(),
            Self::AuthenticationError { reason } | Self::AuthorizationError { reason } => {
                reason.clone()
            }
            Self::InvalidUuid { uuid } => format!("Invalid identifier: {uuid}"),
            Self::DocumentError => "Failed to generate document".to_string(),
            Self::Internal => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.message()
            }
        }));

        if let ApiError::TooManyRequests {
            retry_after_seconds,
        } = &self
        {
            return (
                status_code,
                [(
                    axum::http::header::RETRY_AFTER,
                    retry_after_seconds.to_string(),
                )],
                body,
            )
                .into_response();
        }

        (status_code, body).into_response()
    }
}

impl From<KontrakError> for ApiError {
    fn from(err: KontrakError) -> Self {
        match err {
            KontrakError::ValidationError(message) => ApiError::bad_request(message),
            KontrakError::NotFound(message) => ApiError::not_found(message),
            KontrakError::AccessDenied(reason) => ApiError::authorization_error(reason),
            KontrakError::AuthenticationError(reason) => ApiError::auth_error(reason),
            KontrakError::Conflict(message) => ApiError::conflict(message),
            KontrakError::Expired => ApiError::gone("Contract has expired"),
            KontrakError::StateMachineError(e) => e.into(),
            KontrakError::DocumentError(e) => e.into(),
            KontrakError::DatabaseError(message) => {
                error!(error = %message, "Database operation failed");
                ApiError::database_error("Database operation failed")
            }
            KontrakError::ConfigurationError(message) | KontrakError::Internal(message) => {
                error!(error = %message, "Internal error");
                ApiError::Internal
            }
        }
    }
}

impl From<StateMachineError> for ApiError {
    fn from(err: StateMachineError) -> Self {
        match err {
            StateMachineError::AlreadySigned => ApiError::bad_request("Contract already signed"),
            StateMachineError::NotReadyForSigning { .. } => {
                ApiError::bad_request("Contract is not ready for signing")
            }
            StateMachineError::Expired => ApiError::gone("Contract has expired"),
            other @ StateMachineError::InvalidTransition { .. } => {
                ApiError::conflict(other.to_string())
            }
        }
    }
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        error!(error = %err, "Document generation failed");
        ApiError::DocumentError
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        KontrakError::from(err).into()
    }
}

impl From<uuid::Error> for ApiError {
    fn from(err: uuid::Error) -> Self {
        ApiError::invalid_uuid(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
