//! # JWT Authentication
//!
//! HS256 bearer tokens issued at login and checked by the auth middleware.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::User;

/// JWT authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("JWT processing error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthFormat,
}

/// Claims carried by user session tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and validates session tokens with a shared secret
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: Duration,
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    /// Create authenticator from configuration
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::ConfigurationError(
                "JWT secret not configured".to_string(),
            ));
        }

        debug!(
            expiry_hours = config.jwt_token_expiry_hours,
            "JWT authenticator configured"
        );

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiry: Duration::hours(config.jwt_token_expiry_hours as i64),
        })
    }

    /// Generate a session token for a user
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = UserClaims {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_expiry).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to generate JWT token");
            AuthError::JwtError(e)
        })
    }

    /// Validate a session token
    pub fn validate_token(&self, token: &str) -> Result<UserClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        let token_data = decode::<UserClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "JWT token validation failed");
            AuthError::JwtError(e)
        })?;

        Ok(token_data.claims)
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthFormat)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthFormat);
    }

    Ok(token)
}
