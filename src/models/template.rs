use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "general";

/// Contract template with `{{PLACEHOLDER}}` body text
/// Maps to `templates` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub content: String,
    pub category: String,
    /// Distinct placeholder names found in `content`
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New Template for creation (without generated fields)
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub content: String,
    pub category: String,
    pub variables: Vec<String>,
    pub created_by: Option<Uuid>,
}

const TEMPLATE_COLUMNS: &str = "id, name, description, content, category, variables, is_active, \
     created_by, created_at, updated_at";

impl Template {
    /// Create a new template
    pub async fn create(pool: &PgPool, new_template: NewTemplate) -> Result<Template, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO templates (id, name, description, content, category, variables, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Template>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_template.name)
            .bind(new_template.description)
            .bind(new_template.content)
            .bind(new_template.category)
            .bind(new_template.variables)
            .bind(new_template.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Template>, sqlx::Error> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active template by its name
    pub async fn find_active_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let sql = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE name = $1 AND is_active = TRUE LIMIT 1"
        );
        sqlx::query_as::<_, Template>(&sql)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List active templates, newest first
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let sql = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates \
             WHERE is_active = TRUE ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Template>(&sql).fetch_all(pool).await
    }
}
