//! # Web API Request Handlers
//!
//! HTTP request handlers grouped by resource.

pub mod access;
pub mod auth;
pub mod contracts;
pub mod health;
pub mod stats;
pub mod templates;
pub mod users;

use uuid::Uuid;

use crate::web::errors::ApiError;

/// Parse a path identifier, answering 400 with `message` when it is not a UUID
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(message))
}
