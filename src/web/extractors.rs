//! # Custom Axum Extractors
//!
//! The authenticated user, the caller's network origin and the request ID.

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use std::net::SocketAddr;

use crate::models::User;
use crate::services::ClientInfo;
use crate::web::errors::ApiError;
use crate::web::middleware::rate_limit::{client_key, UNKNOWN_CLIENT};
use crate::web::middleware::request_id::RequestId;
use crate::web::state::AppState;

/// User loaded by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::auth_error("Access token required"))
    }
}

/// IP address and user agent recorded in contract history
#[derive(Debug, Clone)]
pub struct ClientContext(pub ClientInfo);

#[async_trait]
impl FromRequestParts<AppState> for ClientContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let ip = client_key(
            &parts.headers,
            peer,
            state.config.rate_limiting.trust_forwarded_for,
        );

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(ClientContext(ClientInfo {
            ip_address: (ip != UNKNOWN_CLIENT).then_some(ip),
            user_agent,
        }))
    }
}

/// Request context for handlers
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(RequestContext { request_id })
    }
}
