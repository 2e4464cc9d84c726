//! Login and administration of user accounts.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::credentials::{default_trading_account, hash_password, verify_password};
use crate::config::AuthConfig;
use crate::error::{KontrakError, Result};
use crate::models::{NewUser, User, UserRole};

/// Admin request to register a trader
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub trading_account: Option<String>,
    pub username: Option<String>,
}

/// Newly registered user with the password it was given
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: User,
    pub default_password: String,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    auth: AuthConfig,
}

impl UserService {
    pub fn new(pool: PgPool, auth: AuthConfig) -> Self {
        Self { pool, auth }
    }

    /// Check credentials for an active account, identified by email or username
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<User> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(KontrakError::validation("Email and password required"));
        }

        let invalid = || KontrakError::AuthenticationError("Invalid credentials".to_string());

        let user = User::find_active_by_login(&self.pool, identifier)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(invalid());
        }

        User::record_login(&self.pool, user.id).await?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(User {
            last_login: Some(Utc::now()),
            ..user
        })
    }

    pub async fn find_active(&self, id: Uuid) -> Result<Option<User>> {
        Ok(User::find_active_by_id(&self.pool, id).await?)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(User::list_active(&self.pool).await?)
    }

    /// Register a trader with the configured default password
    pub async fn create(&self, request: CreateUser, created_by: Uuid) -> Result<CreatedUser> {
        let name = request.name.trim();
        let email = request.email.trim().to_lowercase();
        let phone = request.phone.trim();

        if name.is_empty() || email.is_empty() || phone.is_empty() {
            return Err(KontrakError::validation("Name, email, and phone are required"));
        }

        if User::email_exists(&self.pool, &email).await? {
            return Err(KontrakError::validation("Email already exists"));
        }

        let default_password = self.auth.default_user_password.clone();
        let password_hash = hash_password(default_password.clone(), self.auth.bcrypt_cost).await?;

        let trading_account = request
            .trading_account
            .map(|account| account.trim().to_string())
            .filter(|account| !account.is_empty())
            .unwrap_or_else(|| default_trading_account(Utc::now().timestamp_millis()));

        let user = User::create(
            &self.pool,
            NewUser {
                name: name.to_string(),
                email,
                username: request
                    .username
                    .map(|username| username.trim().to_lowercase())
                    .filter(|username| !username.is_empty()),
                password_hash,
                phone: phone.to_string(),
                trading_account,
                role: UserRole::User,
                balance: 0.0,
                created_by: Some(created_by),
            },
        )
        .await?;

        info!(user_id = %user.id, trading_account = %user.trading_account, "User created");

        Ok(CreatedUser {
            user,
            default_password,
        })
    }
}
