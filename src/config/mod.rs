//! # Kontrak Configuration System
//!
//! Layered configuration for the contract service. Values come from
//! `config/base.yaml`, an optional `config/<environment>.yaml` override file and
//! environment variables, in that order of precedence (last wins).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kontrak_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let database_url = &manager.config().database.url;
//! let window = manager.config().rate_limiting.window();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Secret used when nothing else is configured. Rejected in production.
pub const DEVELOPMENT_JWT_SECRET: &str = "kontrak-development-secret";

/// Root configuration structure mirroring `config/base.yaml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KontrakConfig {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Database connection and pooling configuration
    pub database: DatabaseConfig,

    /// Token and password settings
    pub auth: AuthConfig,

    /// Per-client request limits
    pub rate_limiting: RateLimitConfig,

    /// Where access links point to
    pub frontend: FrontendConfig,

    /// Contract document rendering
    pub document: DocumentConfig,

    /// Initial data created on startup
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub request_timeout_ms: u64,
    pub max_request_size_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_ms: 30_000,
            max_request_size_mb: 10,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn max_request_size_bytes(&self) -> usize {
        self.max_request_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/kontrak_development".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 5,
            idle_timeout_seconds: 45,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_token_expiry_hours: u64,
    pub bcrypt_cost: u32,
    /// Password assigned to users created through the admin API
    pub default_user_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            jwt_token_expiry_hours: 24 * 7,
            bcrypt_cost: 12,
            default_user_password: "trader123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_seconds: u64,
    pub sweep_interval_seconds: u64,
    /// Upper bound on concurrently tracked client windows
    pub max_tracked_clients: usize,
    /// Key clients by the first `X-Forwarded-For` hop; only behind a proxy
    /// that overwrites the header
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_seconds: 15 * 60,
            sweep_interval_seconds: 60,
            max_tracked_clients: 10_000,
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            url: "https://kontrakdigital.com".to_string(),
        }
    }
}

impl FrontendConfig {
    /// Link handed to the signer for token-based access
    pub fn access_link(&self, access_token: &str) -> String {
        format!("{}/?token={access_token}", self.url.trim_end_matches('/'))
    }
}

/// Widest offset in use by any civil time zone
const MAX_UTC_OFFSET_HOURS: i32 = 14;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Offset applied to timestamps before they are printed (WIB is +7)
    pub utc_offset_hours: i32,
    pub author: String,
    pub creator: String,
    pub header_title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 7,
            author: "TradeStation Kontrak Digital".to_string(),
            creator: "TradeStation System".to_string(),
            header_title: "KONTRAK DIGITAL TRADESTATION".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn utc_offset(&self) -> ConfigResult<FixedOffset> {
        let invalid = || {
            ConfigurationError::invalid_value(
                "document.utc_offset_hours",
                self.utc_offset_hours.to_string(),
                "offset must be within -14..=14 hours",
            )
        };

        if !(-MAX_UTC_OFFSET_HOURS..=MAX_UTC_OFFSET_HOURS).contains(&self.utc_offset_hours) {
            return Err(invalid());
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_password: String,
    pub sample_user_email: String,
    pub sample_user_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_email: "admin@tradestation.com".to_string(),
            admin_password: "admin123".to_string(),
            sample_user_email: "hermanzal@trader.com".to_string(),
            sample_user_password: "trader123".to_string(),
        }
    }
}

impl KontrakConfig {
    /// Validate loaded values for the given environment
    pub fn validate(&self, environment: &str) -> ConfigResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "url",
                "database",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool must allow at least one connection",
            ));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "jwt_secret",
                "auth",
            ));
        }

        if environment == "production" && self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET {
            return Err(ConfigurationError::invalid_value(
                "auth.jwt_secret",
                "[development secret]",
                "a dedicated secret is required in production",
            ));
        }

        if self.rate_limiting.enabled
            && (self.rate_limiting.window_seconds == 0
                || self.rate_limiting.max_requests == 0
                || self.rate_limiting.max_tracked_clients == 0)
        {
            return Err(ConfigurationError::invalid_value(
                "rate_limiting",
                format!(
                    "{} requests / {}s",
                    self.rate_limiting.max_requests, self.rate_limiting.window_seconds
                ),
                "window, request budget and client capacity must be positive",
            ));
        }

        self.document.utc_offset()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid_outside_production() {
        let config = KontrakConfig::default();
        assert!(config.validate("development").is_ok());
        assert!(config.validate("test").is_ok());
    }

    #[test]
    fn test_production_rejects_development_secret() {
        let config = KontrakConfig::default();
        let err = config.validate("production").unwrap_err();
        assert!(err.to_string().contains("auth.jwt_secret"));
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let mut config = KontrakConfig::default();
        config.document.utc_offset_hours = 20;
        assert!(config.validate("development").is_err());

        config.document.utc_offset_hours = -15;
        assert!(config.validate("development").is_err());

        config.document.utc_offset_hours = i32::MAX;
        assert!(config.validate("development").is_err());
    }

    #[test]
    fn test_offset_bounds_are_inclusive() {
        let mut config = KontrakConfig::default();
        for hours in [-14, 0, 7, 14] {
            config.document.utc_offset_hours = hours;
            let offset = config.document.utc_offset().unwrap();
            assert_eq!(offset.local_minus_utc(), hours * 3600);
        }
    }

    #[test]
    fn test_zero_window_rejected_only_when_enabled() {
        let mut config = KontrakConfig::default();
        config.rate_limiting.window_seconds = 0;
        assert!(config.validate("development").is_err());

        config.rate_limiting.enabled = false;
        assert!(config.validate("development").is_ok());
    }

    #[test]
    fn test_access_link_trims_trailing_slash() {
        let frontend = FrontendConfig {
            url: "https://example.com/".to_string(),
        };
        assert_eq!(
            frontend.access_link("abc"),
            "https://example.com/?token=abc"
        );
    }
}
