//! # Web API Module
//!
//! Axum-based REST API for issuing, delivering and signing contracts.
//!
//! - [`routes`] - Route groups by required access
//! - [`handlers`] - Request handlers per resource
//! - [`middleware`] - Request IDs, rate limiting, session checks
//! - [`state`] - Shared application state
//! - [`auth`] - Session token issue and validation
//! - [`errors`] - API error type and JSON error bodies

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use errors::ApiError;
use state::AppState;

/// Create the main Axum application with all routes and middleware
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// rate limiter and contract history can see the peer address.
pub fn create_app(app_state: AppState) -> Router {
    let request_timeout = app_state.config.server.request_timeout();
    let body_limit = app_state.config.server.max_request_size_bytes();

    let user_routes = routes::user_routes().layer(axum::middleware::from_fn_with_state(
        app_state.clone(),
        middleware::auth::require_auth,
    ));

    let admin_routes = routes::admin_routes()
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(routes::public_routes())
        .merge(user_routes)
        .merge(admin_routes)
        .fallback(endpoint_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit::enforce_rate_limit,
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_id::add_request_id,
        ))
        .layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}
