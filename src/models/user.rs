use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::fmt;
use uuid::Uuid;

/// Access level of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// User represents a trader or administrator
/// Maps to `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: String,
    pub trading_account: String,
    pub role: String,
    pub balance: f64,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New User for creation (without generated fields)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub phone: String,
    pub trading_account: String,
    pub role: UserRole,
    pub balance: f64,
    pub created_by: Option<Uuid>,
}

const USER_COLUMNS: &str = "id, name, email, username, password_hash, phone, trading_account, \
    role, balance, is_active, last_login, created_by, created_at, updated_at";

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin.as_str()
    }

    pub fn role(&self) -> UserRole {
        self.role.parse().unwrap_or(UserRole::User)
    }

    /// Create a new user
    pub async fn create(pool: &PgPool, new_user: NewUser) -> Result<User, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO users (id, name, email, username, password_hash, phone, trading_account,
                               role, balance, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_user.name)
            .bind(new_user.email)
            .bind(new_user.username)
            .bind(new_user.password_hash)
            .bind(new_user.phone)
            .bind(new_user.trading_account)
            .bind(new_user.role.as_str())
            .bind(new_user.balance)
            .bind(new_user.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by ID
    pub async fn find_active_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_active = TRUE");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by email or username (compared lowercased)
    pub async fn find_active_by_login(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE (email = $1 OR username = $1) AND is_active = TRUE
            LIMIT 1
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(identifier.trim().to_lowercase())
            .fetch_optional(pool)
            .await
    }

    /// Check whether an email is already registered
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Stamp the last successful login
    pub async fn record_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List active users, newest first
    pub async fn list_active(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active = TRUE ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&sql).fetch_all(pool).await
    }

    /// Count all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Herman Zaldivar".to_string(),
            email: "hermanzal@trader.com".to_string(),
            username: None,
            password_hash: "$2b$12$hash".to_string(),
            phone: "+62812-8888-9999".to_string(),
            trading_account: "TRD001".to_string(),
            role: role.to_string(),
            balance: 50_000_000.0,
            is_active: true,
            last_login: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_helpers() {
        assert!(sample_user("admin").is_admin());
        assert!(!sample_user("user").is_admin());
        assert_eq!(sample_user("unknown").role(), UserRole::User);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(sample_user("user")).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["tradingAccount"], "TRD001");
    }
}
