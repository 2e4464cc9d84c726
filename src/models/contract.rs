use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::rendering::{variables_from_json, ContractVariables};
use crate::state_machine::ContractStatus;

/// Contract issued to a user for signing
/// Maps to `contracts` table
///
/// `signature_data` is present exactly when the status is `signed` or
/// `completed`; the table enforces this with a check constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub title: String,
    pub contract_number: String,
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub content: String,
    pub amount: f64,
    pub status: String,
    pub variables: serde_json::Value,
    pub signature_data: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, default)]
    pub access_token: String,
    pub admin_notes: String,
    pub created_by: Option<Uuid>,
    pub sent_at: Option<DateTime<Utc>>,
    pub reminder_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New Contract for creation (without generated fields)
#[derive(Debug, Clone)]
pub struct NewContract {
    pub title: String,
    pub contract_number: String,
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub content: String,
    pub amount: f64,
    pub status: ContractStatus,
    pub variables: serde_json::Value,
    pub expires_at: Option<DateTime<Utc>>,
    pub access_token: String,
    pub admin_notes: String,
    pub created_by: Option<Uuid>,
}

/// Contract row joined with owner and template names for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub id: Uuid,
    pub title: String,
    pub contract_number: String,
    pub amount: f64,
    pub status: String,
    pub signed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub trading_account: Option<String>,
    pub template_id: Option<Uuid>,
    pub template_name: Option<String>,
}

/// Aggregate counts for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, FromRow)]
pub struct ContractCounts {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
    pub total_value: f64,
}

const CONTRACT_COLUMNS: &str = "id, title, contract_number, user_id, template_id, content, amount, \
    status, variables, signature_data, signed_at, expires_at, access_token, admin_notes, \
    created_by, sent_at, reminder_count, created_at, updated_at";

/// Listings never return more than this many rows
pub const LIST_LIMIT: i64 = 100;

impl Contract {
    /// Parsed lifecycle status
    pub fn status(&self) -> Result<ContractStatus, String> {
        self.status.parse()
    }

    /// Custom placeholder bindings as strings
    pub fn custom_variables(&self) -> ContractVariables {
        variables_from_json(&self.variables)
    }

    /// Create a new contract
    pub async fn create(pool: &PgPool, new_contract: NewContract) -> Result<Contract, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO contracts (id, title, contract_number, user_id, template_id,
                                   content, amount, status, variables, expires_at,
                                   access_token, admin_notes, created_by, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    CASE WHEN $8 = 'sent' THEN NOW() ELSE NULL END)
            RETURNING {CONTRACT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Contract>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_contract.title)
            .bind(new_contract.contract_number)
            .bind(new_contract.user_id)
            .bind(new_contract.template_id)
            .bind(new_contract.content)
            .bind(new_contract.amount)
            .bind(new_contract.status.as_str())
            .bind(new_contract.variables)
            .bind(new_contract.expires_at)
            .bind(new_contract.access_token)
            .bind(new_contract.admin_notes)
            .bind(new_contract.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a contract by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Contract>, sqlx::Error> {
        let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a contract by its access token
    pub async fn find_by_access_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE access_token = $1");
        sqlx::query_as::<_, Contract>(&sql)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a contract number is already taken
    pub async fn contract_number_exists(pool: &PgPool, number: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM contracts WHERE contract_number = $1)",
        )
        .bind(number)
        .fetch_one(pool)
        .await
    }

    /// Newest contracts first, optionally restricted to one owner
    pub async fn list_recent(
        pool: &PgPool,
        owner: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<ContractSummary>, sqlx::Error> {
        sqlx::query_as::<_, ContractSummary>(
            r#"
            SELECT c.id, c.title, c.contract_number, c.amount, c.status, c.signed_at,
                   c.expires_at, c.sent_at, c.created_at, c.user_id,
                   u.name AS user_name, u.email AS user_email, u.trading_account,
                   c.template_id, t.name AS template_name
            FROM contracts c
            LEFT JOIN users u ON u.id = c.user_id
            LEFT JOIN templates t ON t.id = c.template_id
            WHERE ($1::uuid IS NULL OR c.user_id = $1)
            ORDER BY c.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(limit.clamp(1, LIST_LIMIT))
        .fetch_all(pool)
        .await
    }

    /// Move a draft contract to `sent`; `None` when it was not a draft
    pub async fn mark_sent(pool: &PgPool, id: Uuid) -> Result<Option<Contract>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE contracts
            SET status = 'sent', sent_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING {CONTRACT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move an unsigned contract to `expired`; `None` when it was already settled
    pub async fn mark_expired(pool: &PgPool, id: Uuid) -> Result<Option<Contract>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE contracts
            SET status = 'expired', updated_at = NOW()
            WHERE id = $1 AND status IN ('draft', 'sent')
            RETURNING {CONTRACT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store the signature and merged variables in one conditional write
    ///
    /// Only a contract still in `sent` is updated, so concurrent signing
    /// attempts cannot both succeed. Returns `None` when the guard fails.
    pub async fn record_signature(
        pool: &PgPool,
        id: Uuid,
        signature_data: &str,
        variables: &serde_json::Value,
        signed_at: DateTime<Utc>,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE contracts
            SET status = 'signed', signature_data = $2, variables = $3, signed_at = $4,
                updated_at = NOW()
            WHERE id = $1 AND status = 'sent'
            RETURNING {CONTRACT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .bind(signature_data)
            .bind(variables)
            .bind(signed_at)
            .fetch_optional(pool)
            .await
    }

    /// Dashboard counters, optionally restricted to one owner
    pub async fn counts(pool: &PgPool, owner: Option<Uuid>) -> Result<ContractCounts, sqlx::Error> {
        sqlx::query_as::<_, ContractCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'sent') AS pending,
                   COUNT(*) FILTER (WHERE status IN ('signed', 'completed')) AS completed,
                   COALESCE(SUM(amount), 0)::float8 AS total_value
            FROM contracts
            WHERE ($1::uuid IS NULL OR user_id = $1)
            "#,
        )
        .bind(owner)
        .fetch_one(pool)
        .await
    }
}
