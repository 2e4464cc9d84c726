//! Administration of contract templates.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{KontrakError, Result};
use crate::models::{NewTemplate, Template, DEFAULT_CATEGORY};
use crate::rendering::extract_placeholders;

#[derive(Debug, Clone, Default)]
pub struct CreateTemplate {
    pub name: String,
    pub content: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl CreateTemplate {
    /// Trimmed record with the placeholder list derived from the body
    pub fn into_new_template(self, created_by: Option<Uuid>) -> Result<NewTemplate> {
        let name = self.name.trim().to_string();
        let content = self.content.trim().to_string();
        if name.is_empty() || content.is_empty() {
            return Err(KontrakError::validation("Name and content required"));
        }

        let category = self
            .category
            .map(|category| category.trim().to_string())
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(NewTemplate {
            variables: extract_placeholders(&content),
            name,
            content,
            category,
            description: self
                .description
                .map(|description| description.trim().to_string())
                .unwrap_or_default(),
            created_by,
        })
    }
}

#[derive(Clone)]
pub struct TemplateService {
    pool: PgPool,
}

impl TemplateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Template>> {
        Ok(Template::list_active(&self.pool).await?)
    }

    pub async fn create(&self, request: CreateTemplate, created_by: Uuid) -> Result<Template> {
        let new_template = request.into_new_template(Some(created_by))?;
        let template = Template::create(&self.pool, new_template).await?;
        info!(
            template_id = %template.id,
            variables = template.variables.len(),
            "Template created"
        );
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_derived_from_content() {
        let request = CreateTemplate {
            name: "  Perjanjian  ".to_string(),
            content: "{{USER_NAME}} {{AMOUNT}} {{USER_NAME}} {{lower}} {{LATE_FEE}}".to_string(),
            category: None,
            description: Some(" desc ".to_string()),
        };
        let new_template = request.into_new_template(None).unwrap();
        assert_eq!(new_template.name, "Perjanjian");
        assert_eq!(new_template.category, DEFAULT_CATEGORY);
        assert_eq!(new_template.description, "desc");
        assert_eq!(new_template.variables, vec!["USER_NAME", "AMOUNT", "LATE_FEE"]);
    }

    #[test]
    fn test_name_and_content_required() {
        let request = CreateTemplate {
            name: "Nama".to_string(),
            content: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            request.into_new_template(None),
            Err(KontrakError::ValidationError(_))
        ));
    }
}
