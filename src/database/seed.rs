//! Initial data: an administrator, a sample trader and the default contract
//! template. Each record is created only when missing.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{AuthConfig, SeedConfig};
use crate::error::Result;
use crate::models::{NewUser, Template, User, UserRole};
use crate::services::credentials::hash_password;
use crate::services::CreateTemplate;

pub const DEFAULT_TEMPLATE_NAME: &str = "Perjanjian Layanan Kerja Sama Konsultasi Investasi";
pub const DEFAULT_TEMPLATE_CATEGORY: &str = "investment";
pub const DEFAULT_TEMPLATE_DESCRIPTION: &str = "Template lengkap untuk perjanjian konsultasi \
     investasi dengan PT. Konsultasi Profesional Indonesia";
pub const DEFAULT_TEMPLATE_CONTENT: &str = include_str!("../../seeds/default_template.md");

/// Records created by a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub sample_user_created: bool,
    pub template_created: bool,
}

pub async fn seed_initial_data(
    pool: &PgPool,
    seed: &SeedConfig,
    auth: &AuthConfig,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let admin = match User::find_active_by_login(pool, &seed.admin_email).await? {
        Some(admin) => admin,
        None => {
            report.admin_created = true;
            create_user(
                pool,
                NewUser {
                    name: "Admin TradeStation".to_string(),
                    email: seed.admin_email.to_lowercase(),
                    username: Some("admin".to_string()),
                    password_hash: hash_password(seed.admin_password.clone(), auth.bcrypt_cost)
                        .await?,
                    phone: "+62812-3456-7890".to_string(),
                    trading_account: "ADM001".to_string(),
                    role: UserRole::Admin,
                    balance: 0.0,
                    created_by: None,
                },
            )
            .await?
        }
    };

    if User::email_exists(pool, &seed.sample_user_email.to_lowercase()).await? {
        debug!("Sample user already present");
    } else {
        report.sample_user_created = true;
        create_user(
            pool,
            NewUser {
                name: "Herman Zaldivar".to_string(),
                email: seed.sample_user_email.to_lowercase(),
                username: Some("hermanzal".to_string()),
                password_hash: hash_password(seed.sample_user_password.clone(), auth.bcrypt_cost)
                    .await?,
                phone: "+62812-8888-9999".to_string(),
                trading_account: "TRD001".to_string(),
                role: UserRole::User,
                balance: 50_000_000.0,
                created_by: Some(admin.id),
            },
        )
        .await?;
    }

    if Template::find_active_by_name(pool, DEFAULT_TEMPLATE_NAME)
        .await?
        .is_none()
    {
        report.template_created = true;
        let template = Template::create(pool, default_template(Some(admin.id))?).await?;
        info!(template_id = %template.id, "Default template created");
    }

    info!(
        admin_created = report.admin_created,
        sample_user_created = report.sample_user_created,
        template_created = report.template_created,
        "Initial data setup completed"
    );

    Ok(report)
}

/// The default investment consulting template
pub fn default_template(created_by: Option<Uuid>) -> Result<crate::models::NewTemplate> {
    CreateTemplate {
        name: DEFAULT_TEMPLATE_NAME.to_string(),
        content: DEFAULT_TEMPLATE_CONTENT.to_string(),
        category: Some(DEFAULT_TEMPLATE_CATEGORY.to_string()),
        description: Some(DEFAULT_TEMPLATE_DESCRIPTION.to_string()),
    }
    .into_new_template(created_by)
}

async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User> {
    let user = User::create(pool, new_user).await?;
    info!(user_id = %user.id, role = %user.role, "Seeded user");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_variables() {
        let template = default_template(None).unwrap();
        assert_eq!(template.category, DEFAULT_TEMPLATE_CATEGORY);
        for name in ["USER_NAME", "TRADING_ID", "CONTRACT_NUMBER", "AMOUNT", "SIGNED_DATE"] {
            assert!(template.variables.iter().any(|v| v == name), "missing {name}");
        }
        assert!(template.content.starts_with("# Perjanjian Layanan"));
    }
}
