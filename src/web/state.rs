//! # Web API Application State
//!
//! Shared state handed to every handler: configuration, the database pool,
//! the session token authenticator, the rate limiter and the services.

use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::config::KontrakConfig;
use crate::error::{KontrakError, Result};
use crate::services::{ContractService, RateLimiter, TemplateService, UserService};
use crate::web::auth::JwtAuthenticator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<KontrakConfig>,

    /// Name of the active configuration environment, reported by `/api/health`
    pub environment: Arc<str>,

    pub db_pool: PgPool,

    pub authenticator: JwtAuthenticator,

    pub rate_limiter: RateLimiter,

    pub contracts: ContractService,
    pub users: UserService,
    pub templates: TemplateService,
}

impl AppState {
    pub fn new(config: KontrakConfig, environment: &str, db_pool: PgPool) -> Result<Self> {
        let authenticator = JwtAuthenticator::from_config(&config.auth)
            .map_err(|e| KontrakError::ConfigurationError(e.to_string()))?;
        let rate_limiter = RateLimiter::from_config(&config.rate_limiting);
        let contracts = ContractService::new(db_pool.clone(), &config)?;
        let users = UserService::new(db_pool.clone(), config.auth.clone());
        let templates = TemplateService::new(db_pool.clone());

        info!(
            environment = %environment,
            rate_limiting = rate_limiter.is_enabled(),
            "Web API application state created"
        );

        Ok(Self {
            config: Arc::new(config),
            environment: Arc::from(environment),
            db_pool,
            authenticator,
            rate_limiter,
            contracts,
            users,
            templates,
        })
    }
}
