//! # Rate Limiting Middleware
//!
//! Applies the per-client fixed window to every `/api/` request.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use tracing::warn;

use crate::services::RateLimitDecision;
use crate::web::errors::ApiError;
use crate::web::state::AppState;

const RATE_LIMITED_PREFIX: &str = "/api/";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const UNKNOWN_CLIENT: &str = "unknown";

pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.rate_limiter.is_enabled() || !request.uri().path().starts_with(RATE_LIMITED_PREFIX) {
        return Ok(next.run(request).await);
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(
        request.headers(),
        peer,
        state.config.rate_limiting.trust_forwarded_for,
    );

    match state.rate_limiter.check(&client) {
        RateLimitDecision::Allowed { .. } => Ok(next.run(request).await),
        RateLimitDecision::Limited { retry_after } => {
            warn!(client = %client, "Rate limit exceeded");
            Err(ApiError::TooManyRequests {
                retry_after_seconds: retry_after.as_secs().max(1),
            })
        }
    }
}

/// Identify the caller by socket peer address
///
/// With `trust_forwarded_for` the first `X-Forwarded-For` hop wins over the
/// peer; a client talking to the server directly can forge that header.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .filter(|_| trust_forwarded_for)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string);

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR_HEADER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_client_key_ignores_forwarded_for_by_default() {
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        for spoofed in ["203.0.113.7", "203.0.113.8", "10.9.8.7, 10.0.0.1"] {
            assert_eq!(client_key(&forwarded(spoofed), Some(peer), false), "127.0.0.1");
        }
    }

    #[test]
    fn test_client_key_uses_first_hop_behind_trusted_proxy() {
        let headers = forwarded("203.0.113.7, 10.0.0.1");
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");
        assert_eq!(client_key(&forwarded(" "), Some(peer), true), "127.0.0.1");
    }

    #[test]
    fn test_client_key_falls_back_to_peer() {
        let peer: SocketAddr = "192.168.1.20:5000".parse().unwrap();
        assert_eq!(client_key(&HeaderMap::new(), Some(peer), true), "192.168.1.20");
        assert_eq!(client_key(&HeaderMap::new(), None, false), UNKNOWN_CLIENT);
    }
}
