//! Error types for the Kontrak service.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::pdf::PdfError;
use crate::state_machine::StateMachineError;

#[derive(Debug, Error)]
pub enum KontrakError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Contract has expired")]
    Expired,
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Document generation error: {0}")]
    DocumentError(#[from] PdfError),
    #[error("State machine error: {0}")]
    StateMachineError(#[from] StateMachineError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KontrakError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<sqlx::Error> for KontrakError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => KontrakError::NotFound("record not found".to_string()),
            other => KontrakError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for KontrakError {
    fn from(error: serde_json::Error) -> Self {
        KontrakError::ValidationError(format!("JSON serialization error: {error}"))
    }
}

impl From<ConfigurationError> for KontrakError {
    fn from(error: ConfigurationError) -> Self {
        KontrakError::ConfigurationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for KontrakError {
    fn from(error: bcrypt::BcryptError) -> Self {
        KontrakError::Internal(format!("password hashing failed: {error}"))
    }
}

pub type Result<T> = std::result::Result<T, KontrakError>;
