use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use uuid::Uuid;

use crate::models::{QuestionnaireResponse, Template};

/// Storage backend for templates and questionnaire responses
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
    /// Persist a new template
    async fn insert_template(&self, template: &Template) -> Result<()>;

    /// Get a template by ID
    async fn get_template(&self, id: Uuid) -> Result<Option<Template>>;

    /// List templates in creation order
    async fn list_templates(&self, skip: i64, limit: i64) -> Result<Vec<Template>>;

    /// Persist a questionnaire response. Fails if the template does not exist.
    async fn insert_questionnaire_response(&self, response: &QuestionnaireResponse) -> Result<()>;

    /// Get a questionnaire response by ID
    async fn get_questionnaire_response(&self, id: Uuid) -> Result<Option<QuestionnaireResponse>>;

    /// List responses submitted against a template, in creation order
    async fn list_questionnaire_responses(
        &self,
        template_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<QuestionnaireResponse>>;

    /// Test database connection
    async fn test_connection(&self) -> Result<()>;

    /// Return self as Any for downcasting
    fn as_any(&self) -> &dyn Any;
}
