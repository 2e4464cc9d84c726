use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Audit record of a contract lifecycle action
/// Maps to `contract_history` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContractHistory {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub action: String,
    pub description: String,
    pub performed_by: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New ContractHistory entry
#[derive(Debug, Clone, Default)]
pub struct NewContractHistory {
    pub contract_id: Uuid,
    pub action: String,
    pub description: String,
    pub performed_by: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewContractHistory {
    pub fn new(
        contract_id: Uuid,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            contract_id,
            action: action.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn performed_by(mut self, user_id: Option<Uuid>) -> Self {
        self.performed_by = user_id;
        self
    }

    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

impl ContractHistory {
    /// Append a history entry
    pub async fn create(
        pool: &PgPool,
        entry: NewContractHistory,
    ) -> Result<ContractHistory, sqlx::Error> {
        sqlx::query_as::<_, ContractHistory>(
            r#"
            INSERT INTO contract_history (id, contract_id, action, description, performed_by,
                                          ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, contract_id, action, description, performed_by, ip_address,
                      user_agent, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.contract_id)
        .bind(entry.action)
        .bind(entry.description)
        .bind(entry.performed_by)
        .bind(entry.ip_address)
        .bind(entry.user_agent)
        .fetch_one(pool)
        .await
    }

    /// History of one contract, oldest first
    pub async fn list_for_contract(
        pool: &PgPool,
        contract_id: Uuid,
    ) -> Result<Vec<ContractHistory>, sqlx::Error> {
        sqlx::query_as::<_, ContractHistory>(
            r#"
            SELECT id, contract_id, action, description, performed_by, ip_address,
                   user_agent, created_at
            FROM contract_history
            WHERE contract_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(contract_id)
        .fetch_all(pool)
        .await
    }
}
