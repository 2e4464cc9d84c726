//! # Web API Route Definitions
//!
//! Routes are grouped by the access they require: public (health, login and
//! the access-link endpoints), any signed-in user, and administrators.

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Routes that need no session
///
/// - `/api/health` - Database connectivity probe
/// - `/api/auth/login` - Session token issue
/// - `/api/contracts/access/:token` - Read a contract through its access link
/// - `/api/contracts/access/:token/sign` - Sign through the access link
/// - `/api/contracts/download/:id` - PDF of a signed contract
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/contracts/access/:token",
            get(handlers::access::access_contract),
        )
        .route(
            "/api/contracts/access/:token/sign",
            post(handlers::access::sign_contract),
        )
        .route(
            "/api/contracts/download/:id",
            get(handlers::access::download_contract),
        )
}

/// Routes open to any signed-in user
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/contracts", get(handlers::contracts::list_contracts))
        .route("/api/stats/dashboard", get(handlers::stats::dashboard))
}

/// Routes restricted to administrators
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contracts", post(handlers::contracts::create_contract))
        .route(
            "/api/contracts/:id/generate-link",
            post(handlers::contracts::generate_link),
        )
        .route(
            "/api/templates",
            get(handlers::templates::list_templates).post(handlers::templates::create_template),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
}
